use std::collections::HashSet;

use itertools::Itertools;
use log::debug;
use open_court_entities::prelude::{Match, MatchScore, MatchStatus, Uuid};
use serde::{Serialize, Deserialize};

use crate::plan::PlannedMatch;
use crate::time_grid::{TimeGrid, TimeSlot};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Default)]
pub struct ScheduledPlan {
    pub matches: Vec<Match>,
    /// Matches the grid could not hold, in planning order.
    pub overflow: Vec<PlannedMatch>,
}

impl ScheduledPlan {
    /// The slots this plan occupies, for reserving them when a later phase
    /// is scheduled onto the same grid.
    pub fn consumed_slots(&self) -> HashSet<TimeSlot> {
        self.matches
            .iter()
            .filter_map(|m| {
                let at = m.scheduled_at?;
                Some(TimeSlot {
                    day: at.date(),
                    start: at.time(),
                    court: m.court?,
                })
            })
            .collect()
    }
}

pub(crate) fn to_scheduled_match(planned: PlannedMatch, slot: TimeSlot) -> Match {
    Match {
        round: planned.round,
        sequence: planned.sequence,
        scheduled_at: Some(slot.day.and_time(slot.start)),
        court: Some(slot.court),
        sides: planned.sides,
        status: MatchStatus::Scheduled,
        score: MatchScore::default(),
    }
}

fn next_fitting(
    pending: &[PlannedMatch],
    busy_now: &HashSet<Uuid>,
    played_previous_step: &HashSet<Uuid>,
) -> Option<usize> {
    let fits =
        |m: &PlannedMatch| m.participants().all(|p| !busy_now.contains(&p));
    let rested =
        |m: &PlannedMatch| m.participants().all(|p| !played_previous_step.contains(&p));

    pending
        .iter()
        .position(|m| fits(m) && rested(m))
        .or_else(|| pending.iter().position(fits))
}

/// First-fit bin packing of planned matches onto grid slots, in planning
/// order. A slot is skipped when reserved; a match is deferred while any of
/// its participants is already playing at that time, and — where another
/// pending match fits — while one of them played the immediately preceding
/// time step. Matches that do not fit anywhere end up in `overflow`.
pub fn schedule(
    planned: &[PlannedMatch],
    grid: &TimeGrid,
    reserved: &HashSet<TimeSlot>,
) -> ScheduledPlan {
    let mut pending = planned.to_vec();
    let mut matches = vec![];
    let mut played_previous_step: HashSet<Uuid> = HashSet::new();

    for (day, start) in grid.time_steps() {
        if pending.is_empty() {
            break;
        }
        let mut busy_now: HashSet<Uuid> = HashSet::new();
        for court in 1..=grid.court_count() {
            let slot = TimeSlot { day, start, court };
            if reserved.contains(&slot) {
                continue;
            }
            let Some(idx) = next_fitting(&pending, &busy_now, &played_previous_step) else {
                break;
            };
            let planned_match = pending.remove(idx);
            busy_now.extend(planned_match.participants());
            debug!(
                "match {} ({}) -> {} {} court {}",
                planned_match.sequence, planned_match.round, day, start, court
            );
            matches.push(to_scheduled_match(planned_match, slot));
        }
        played_previous_step = busy_now;
    }

    if !pending.is_empty() {
        debug!("{} matches did not fit on the grid", pending.len());
    }

    ScheduledPlan {
        matches,
        overflow: pending,
    }
}

/// No two matches on one court at one time, and no participant in two
/// matches at one time.
pub fn is_conflict_free(matches: &[Match]) -> bool {
    let slot_collision = matches
        .iter()
        .filter_map(|m| Some((m.scheduled_at?, m.court?)))
        .duplicates()
        .next()
        .is_some();
    if slot_collision {
        return false;
    }

    !matches
        .iter()
        .filter_map(|m| {
            m.scheduled_at
                .map(|at| m.sides.iter().flat_map(|s| s.participants()).map(move |p| (at, p)))
        })
        .flatten()
        .duplicates()
        .next()
        .is_some()
}
