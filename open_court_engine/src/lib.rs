pub mod time_grid;
pub mod plan;
pub mod groups;
pub mod schedule;
pub mod qualification;
pub mod bracket;

use std::collections::HashSet;

use log::info;
use open_court_entities::prelude::{
    Category, Match, Participant, TournamentCalendar, TournamentFormat,
};
use open_court_entities::domain::group::GroupLabel;
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;

use crate::groups::{assign_to_groups, GroupAssignError};
use crate::plan::{american, plan_format, AmericanConfig, PlanError, PlannedMatch};
use crate::schedule::{schedule, ScheduledPlan};
use crate::time_grid::{CapacityEstimate, TimeGrid};

pub use plan::SingleEliminationConfig;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    GroupAssignment(#[from] GroupAssignError),
    #[error(
        "the tournament window cannot fit {total_matches} matches (need {} minutes, have {})",
        estimate.total_time_needed_minutes,
        estimate.total_time_available_minutes
    )]
    TimeWindowInfeasible {
        total_matches: usize,
        /// Carries the suggested corrected duration, when one exists.
        estimate: CapacityEstimate,
    },
    #[error("{} matches did not fit on the time grid", overflow.len())]
    SchedulingOverflow {
        scheduled: Vec<Match>,
        overflow: Vec<PlannedMatch>,
    },
}

#[derive(Debug, Clone)]
pub struct CategoryPlan {
    /// Input participants, with group labels filled in where the format
    /// required an assignment.
    pub participants: Vec<Participant>,
    pub matches: Vec<Match>,
}

/// The whole pipeline for one category: group assignment where needed,
/// format planning, feasibility check, scheduling. Either returns a
/// complete, internally consistent plan or a diagnostic; it never commits
/// a partial schedule. Rescheduling means calling this again and replacing
/// everything previously generated for the category.
pub fn plan_category(
    category: &Category,
    participants: &[Participant],
    calendar: &TournamentCalendar,
    seed: Option<u64>,
) -> Result<CategoryPlan, EngineError> {
    let make_rng = || match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut rng = make_rng();

    let participants =
        if category.format.uses_groups() && participants.iter().any(|p| p.group.is_none()) {
            assign_to_groups(participants, category.num_groups, &mut rng)?
        } else {
            participants.to_vec()
        };

    let mut planned = plan_format(category, &participants, &mut rng)?;
    let grid = TimeGrid::new(calendar.clone());
    let mut estimate = grid.estimate_capacity(planned.len());

    if !estimate.feasible && category.format == TournamentFormat::AmericanRoundRobin {
        // A rotation format can shed rounds instead of failing outright.
        let matches_per_round = participants.len() / 4;
        let rounds_that_fit = if matches_per_round > 0 {
            (grid.slot_count() / matches_per_round) as u32
        } else {
            0
        };
        if rounds_that_fit >= 1 {
            let config = AmericanConfig {
                num_rounds: rounds_that_fit.min(AmericanConfig::default().num_rounds),
                ..AmericanConfig::default()
            };
            info!(
                "category {}: shortening rotation to {} rounds",
                category.name, config.num_rounds
            );
            let mut rng = make_rng();
            planned = american::plan(&participants, GroupLabel(0), &config, &mut rng)?;
            for (idx, m) in planned.iter_mut().enumerate() {
                m.sequence = idx as u32;
            }
            estimate = grid.estimate_capacity(planned.len());
        }
    }

    if !estimate.feasible {
        return Err(EngineError::TimeWindowInfeasible {
            total_matches: planned.len(),
            estimate,
        });
    }

    let ScheduledPlan { matches, overflow } = schedule(&planned, &grid, &HashSet::new());
    if !overflow.is_empty() {
        return Err(EngineError::SchedulingOverflow { scheduled: matches, overflow });
    }

    info!(
        "category {}: {} matches scheduled",
        category.name,
        matches.len()
    );
    Ok(CategoryPlan {
        participants,
        matches,
    })
}
