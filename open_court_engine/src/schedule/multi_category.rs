use std::collections::HashSet;

use itertools::Itertools;
use log::debug;
use open_court_entities::prelude::{Match, Uuid};
use serde::{Serialize, Deserialize};

use crate::plan::PlannedMatch;
use crate::time_grid::{TimeGrid, TimeSlot};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct CategoryScheduleRequest {
    pub category_id: Uuid,
    pub matches: Vec<PlannedMatch>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct CategorySchedule {
    pub category_id: Uuid,
    pub matches: Vec<Match>,
    pub overflow: Vec<PlannedMatch>,
}

/// Interleaves several categories onto one shared grid. Each slot is offered
/// to the categories in rotating order, so no court sits idle while any
/// category still has a playable match; within a category the planner's
/// order (group phase before knockout) is preserved the same way the
/// single-category scheduler preserves it.
pub fn schedule_all(
    requests: &[CategoryScheduleRequest],
    grid: &TimeGrid,
    reserved: &HashSet<TimeSlot>,
) -> Vec<CategorySchedule> {
    let mut queues = requests
        .iter()
        .map(|r| r.matches.clone())
        .collect_vec();
    let mut results = requests
        .iter()
        .map(|r| CategorySchedule {
            category_id: r.category_id,
            matches: vec![],
            overflow: vec![],
        })
        .collect_vec();

    let mut played_previous_step: HashSet<Uuid> = HashSet::new();
    let mut rotation = 0usize;

    for (day, start) in grid.time_steps() {
        if queues.iter().all(|q| q.is_empty()) {
            break;
        }
        let mut busy_now: HashSet<Uuid> = HashSet::new();

        for court in 1..=grid.court_count() {
            let slot = TimeSlot { day, start, court };
            if reserved.contains(&slot) {
                continue;
            }

            let Some((category_idx, match_idx)) =
                pick_for_slot(&queues, rotation, &busy_now, &played_previous_step)
            else {
                continue;
            };

            let planned_match = queues[category_idx].remove(match_idx);
            busy_now.extend(planned_match.participants());
            debug!(
                "category {} match {} -> {} {} court {}",
                results[category_idx].category_id, planned_match.sequence, day, start, court
            );
            results[category_idx]
                .matches
                .push(super::scheduler::to_scheduled_match(planned_match, slot));
            rotation = category_idx + 1;
        }
        played_previous_step = busy_now;
    }

    for (queue, result) in queues.into_iter().zip(results.iter_mut()) {
        if !queue.is_empty() {
            debug!(
                "category {}: {} matches did not fit on the grid",
                result.category_id,
                queue.len()
            );
        }
        result.overflow = queue;
    }

    results
}

fn pick_for_slot(
    queues: &[Vec<PlannedMatch>],
    rotation: usize,
    busy_now: &HashSet<Uuid>,
    played_previous_step: &HashSet<Uuid>,
) -> Option<(usize, usize)> {
    let order = (0..queues.len()).map(|offset| (rotation + offset) % queues.len());

    let fits = |m: &PlannedMatch| m.participants().all(|p| !busy_now.contains(&p));
    let rested = |m: &PlannedMatch| m.participants().all(|p| !played_previous_step.contains(&p));

    for category_idx in order.clone() {
        if let Some(match_idx) = queues[category_idx]
            .iter()
            .position(|m| fits(m) && rested(m))
        {
            return Some((category_idx, match_idx));
        }
    }
    for category_idx in order {
        if let Some(match_idx) = queues[category_idx].iter().position(|m| fits(m)) {
            return Some((category_idx, match_idx));
        }
    }
    None
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use chrono::{NaiveDate, NaiveTime};
    use open_court_entities::prelude::{DayWindow, TournamentCalendar};
    use open_court_entities::domain::group::GroupLabel;

    use crate::plan::round_robin;
    use crate::schedule::scheduler::is_conflict_free;

    use super::*;

    fn grid(courts: u32) -> TimeGrid {
        let first_day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        TimeGrid::new(TournamentCalendar {
            first_day,
            last_day: first_day,
            default_window: DayWindow::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            ),
            overrides: HashMap::new(),
            match_duration_minutes: 55,
            court_count: courts,
        })
    }

    fn request(category_id: u128, first_member: u128, teams: u128) -> CategoryScheduleRequest {
        let members = (0..teams).map(|idx| Uuid::from_u128(first_member + idx)).collect_vec();
        let mut matches = round_robin::plan_group(&members, GroupLabel(0));
        for (idx, m) in matches.iter_mut().enumerate() {
            m.sequence = idx as u32;
        }
        CategoryScheduleRequest {
            category_id: Uuid::from_u128(category_id),
            matches,
        }
    }

    #[test]
    fn test_categories_share_the_grid_without_conflicts() {
        let requests = vec![request(1, 100, 4), request(2, 200, 4)];
        let results = schedule_all(&requests, &grid(2), &HashSet::new());

        assert!(results.iter().all(|r| r.overflow.is_empty()));
        let all: Vec<Match> = results.iter().flat_map(|r| r.matches.clone()).collect();
        assert_eq!(all.len(), 12);
        assert!(is_conflict_free(&all));
    }

    #[test]
    fn test_no_court_idles_while_another_category_can_play() {
        // Category 1 alone can only fill one court per step; category 2's
        // matches must take the second court from the first step on.
        let requests = vec![request(1, 100, 2), request(2, 200, 4)];
        let results = schedule_all(&requests, &grid(2), &HashSet::new());

        let first_step_time = results
            .iter()
            .flat_map(|r| r.matches.iter())
            .map(|m| m.scheduled_at.unwrap())
            .min()
            .unwrap();
        let first_step_matches = results
            .iter()
            .flat_map(|r| r.matches.iter())
            .filter(|m| m.scheduled_at == Some(first_step_time))
            .count();
        assert_eq!(first_step_matches, 2);
    }

    #[test]
    fn test_category_internal_order_is_preserved() {
        let requests = vec![request(1, 100, 4), request(2, 200, 4)];
        let results = schedule_all(&requests, &grid(1), &HashSet::new());

        for result in &results {
            let times = result
                .matches
                .iter()
                .sorted_by_key(|m| m.sequence)
                .map(|m| m.scheduled_at.unwrap())
                .collect_vec();
            // One court forces strict alternation between the two
            // categories, so each keeps its planner order.
            let mut sorted = times.clone();
            sorted.sort();
            assert_eq!(times, sorted);
        }
    }
}
