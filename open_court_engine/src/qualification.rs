use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;
use open_court_entities::prelude::{Category, GroupStanding, Match, Round, Uuid};
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub struct QualificationPlan {
    pub qualified_per_group: u32,
    pub extra_wildcards_needed: u32,
    /// Standings position (1-based) wildcards are drawn from, in every
    /// group. Never deeper.
    pub wildcard_source_position: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QualificationError {
    #[error("qualification found {available} of the {expected} participants the knockout stage needs")]
    Shortfall { expected: u32, available: u32 },
}

pub fn compute_qualification_plan(num_groups: u32, knockout_stage_size: u32) -> QualificationPlan {
    let qualified_per_group = knockout_stage_size / num_groups;
    QualificationPlan {
        qualified_per_group,
        extra_wildcards_needed: knockout_stage_size - qualified_per_group * num_groups,
        wildcard_source_position: qualified_per_group + 1,
    }
}

/// Same arithmetic, with the stage size resolved from the category (stages
/// count teams, or twice as many individuals).
pub fn plan_for_category(category: &Category) -> QualificationPlan {
    compute_qualification_plan(category.num_groups, category.knockout_seats())
}

/// The best-Nth-place candidates: one per group that reaches the source
/// position, ranked by the shared standings key.
pub fn select_wildcards(
    groups_standings: &[Vec<GroupStanding>],
    wildcard_source_position: u32,
    extra_wildcards_needed: u32,
) -> Vec<GroupStanding> {
    groups_standings
        .iter()
        .filter_map(|standings| standings.get(wildcard_source_position as usize - 1))
        .sorted_by_key(|s| Reverse(s.rank_key()))
        .take(extra_wildcards_needed as usize)
        .copied()
        .collect_vec()
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct QualifiedSet {
    /// Guaranteed qualifiers per group, best first, groups in label order.
    pub per_group: Vec<Vec<Uuid>>,
    /// Wildcards in their ranked order.
    pub wildcards: Vec<Uuid>,
}

impl QualifiedSet {
    /// Guaranteed qualifiers first, in group order, then wildcards.
    pub fn all(&self) -> Vec<Uuid> {
        self.per_group
            .iter()
            .flatten()
            .chain(self.wildcards.iter())
            .copied()
            .collect_vec()
    }
}

/// Resolves a qualification plan against actual standings. Safe to call
/// speculatively; nothing is cached between calls.
pub fn qualifiers(
    groups_standings: &[Vec<GroupStanding>],
    plan: &QualificationPlan,
    knockout_stage_size: u32,
) -> Result<QualifiedSet, QualificationError> {
    let per_group = groups_standings
        .iter()
        .map(|standings| {
            standings
                .iter()
                .take(plan.qualified_per_group as usize)
                .map(|s| s.participant)
                .collect_vec()
        })
        .collect_vec();

    let wildcards = select_wildcards(
        groups_standings,
        plan.wildcard_source_position,
        plan.extra_wildcards_needed,
    )
    .into_iter()
    .map(|s| s.participant)
    .collect_vec();

    let qualified = QualifiedSet {
        per_group,
        wildcards,
    };
    let available = qualified.all().len() as u32;
    if available != knockout_stage_size {
        return Err(QualificationError::Shortfall {
            expected: knockout_stage_size,
            available,
        });
    }
    Ok(qualified)
}

/// Final positions to write back once the knockout phase is played out:
/// the final decides 1 and 2, each placement match decides its position and
/// the next one, and everyone without a knockout result is ranked behind
/// the bracket by group-stage standing.
pub fn final_positions(
    knockout_matches: &[Match],
    groups_standings: &[Vec<GroupStanding>],
) -> HashMap<Uuid, u32> {
    let mut positions = HashMap::new();

    for m in knockout_matches {
        let (position_won, position_lost) = match m.round {
            Round::Final => (1, 2),
            Round::Placement { position } => (position as u32, position as u32 + 1),
            _ => continue,
        };
        let (Some(winner), Some(loser)) = (m.winner_side_idx(), m.loser_side_idx()) else {
            continue;
        };
        for p in m.sides[winner].participants() {
            positions.insert(p, position_won);
        }
        for p in m.sides[loser].participants() {
            positions.insert(p, position_lost);
        }
    }

    let next_position = positions.values().max().copied().unwrap_or(0) + 1;
    let unplaced = groups_standings
        .iter()
        .flatten()
        .filter(|s| !positions.contains_key(&s.participant))
        .sorted_by_key(|s| Reverse(s.rank_key()))
        .collect_vec();
    for (offset, standing) in unplaced.into_iter().enumerate() {
        positions.insert(standing.participant, next_position + offset as u32);
    }

    positions
}
