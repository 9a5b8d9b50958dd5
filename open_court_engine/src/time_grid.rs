use chrono::{Duration, NaiveDate, NaiveTime};
use log::debug;
use serde::{Serialize, Deserialize};

use open_court_entities::prelude::{TournamentCalendar, TRANSITION_BUFFER_MINUTES};

/// Durations below this are never suggested as a correction.
pub const MIN_MATCH_DURATION_MINUTES: u32 = 10;

#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Copy)]
pub struct TimeSlot {
    pub day: NaiveDate,
    pub start: NaiveTime,
    /// 1-based court index.
    pub court: u32,
}

/// All (day, start time, court) triples a tournament calendar offers.
/// Enumeration is lazy and restartable; callers may iterate as often as
/// they like without side effects.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    calendar: TournamentCalendar,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub struct CapacityEstimate {
    pub feasible: bool,
    pub total_time_needed_minutes: u64,
    pub total_time_available_minutes: u64,
    /// Largest match duration (the transition buffer comes on top) at which
    /// the same match count still fits; `None` when not even the minimal
    /// duration fits.
    pub suggested_duration_minutes: Option<u32>,
}

fn starts_in_window(window_minutes: u32, duration_minutes: u32) -> u32 {
    if duration_minutes == 0 || window_minutes < duration_minutes {
        return 0;
    }
    (window_minutes + TRANSITION_BUFFER_MINUTES) / (duration_minutes + TRANSITION_BUFFER_MINUTES)
}

impl TimeGrid {
    pub fn new(calendar: TournamentCalendar) -> Self {
        TimeGrid { calendar }
    }

    pub fn calendar(&self) -> &TournamentCalendar {
        &self.calendar
    }

    pub fn court_count(&self) -> u32 {
        self.calendar.court_count
    }

    /// Distinct start times, day by day, earliest first.
    pub fn time_steps(&self) -> impl Iterator<Item = (NaiveDate, NaiveTime)> + '_ {
        let duration = self.calendar.match_duration_minutes;
        self.calendar.days().flat_map(move |day| {
            let window = self.calendar.window_for(day);
            let starts = starts_in_window(window.minutes(), duration);
            (0..starts).map(move |idx| {
                let offset = idx * (duration + TRANSITION_BUFFER_MINUTES);
                (day, window.open + Duration::minutes(offset as i64))
            })
        })
    }

    /// Slots ordered time-ascending, court-parallel: every court of one
    /// start time before the next start time.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        let courts = self.calendar.court_count;
        self.time_steps().flat_map(move |(day, start)| {
            (1..=courts).map(move |court| TimeSlot { day, start, court })
        })
    }

    pub fn slot_count(&self) -> usize {
        self.capacity_at_duration(self.calendar.match_duration_minutes)
    }

    fn capacity_at_duration(&self, duration_minutes: u32) -> usize {
        self.calendar
            .days()
            .map(|day| {
                let window = self.calendar.window_for(day);
                starts_in_window(window.minutes(), duration_minutes) as usize
                    * self.calendar.court_count as usize
            })
            .sum()
    }

    pub fn estimate_capacity(&self, total_matches: usize) -> CapacityEstimate {
        let duration = self.calendar.match_duration_minutes;
        let feasible = self.capacity_at_duration(duration) >= total_matches;

        let total_time_available_minutes: u64 = self
            .calendar
            .days()
            .map(|day| self.calendar.window_for(day).minutes() as u64)
            .sum::<u64>()
            * self.calendar.court_count as u64;
        let total_time_needed_minutes =
            total_matches as u64 * (duration + TRANSITION_BUFFER_MINUTES) as u64;

        let longest_window = self
            .calendar
            .days()
            .map(|day| self.calendar.window_for(day).minutes())
            .max()
            .unwrap_or(0);

        let suggested_duration_minutes =
            if self.capacity_at_duration(MIN_MATCH_DURATION_MINUTES) < total_matches {
                None
            } else {
                let mut lo = MIN_MATCH_DURATION_MINUTES;
                let mut hi = longest_window.max(MIN_MATCH_DURATION_MINUTES);
                while lo < hi {
                    let mid = (lo + hi + 1) / 2;
                    if self.capacity_at_duration(mid) >= total_matches {
                        lo = mid;
                    } else {
                        hi = mid - 1;
                    }
                }
                Some(lo)
            };

        debug!(
            "capacity estimate for {} matches at {}min: feasible={}, suggestion={:?}",
            total_matches, duration, feasible, suggested_duration_minutes
        );

        CapacityEstimate {
            feasible,
            total_time_needed_minutes,
            total_time_available_minutes,
            suggested_duration_minutes,
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use itertools::Itertools;
    use open_court_entities::prelude::DayWindow;

    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn calendar(days: u64, courts: u32, duration: u32) -> TournamentCalendar {
        let first_day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        TournamentCalendar {
            first_day,
            last_day: first_day + Duration::days(days as i64 - 1),
            default_window: DayWindow::new(time(9, 0), time(13, 0)),
            overrides: HashMap::new(),
            match_duration_minutes: duration,
            court_count: courts,
        }
    }

    #[test]
    fn test_slots_are_time_ascending_and_court_parallel() {
        let grid = TimeGrid::new(calendar(1, 2, 55));
        let slots = grid.slots().collect_vec();

        // 240 minute window, 55 + 5 per match: four starts, two courts.
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0].start, time(9, 0));
        assert_eq!(slots[0].court, 1);
        assert_eq!(slots[1].start, time(9, 0));
        assert_eq!(slots[1].court, 2);
        assert_eq!(slots[2].start, time(10, 0));
        assert_eq!(slots.last().unwrap().start, time(12, 0));

        // Restartable: a second enumeration yields the same sequence.
        assert_eq!(grid.slots().collect_vec(), slots);
    }

    #[test]
    fn test_day_overrides_change_slot_yield() {
        let mut cal = calendar(2, 1, 55);
        let second_day = cal.first_day + Duration::days(1);
        cal.overrides
            .insert(second_day, DayWindow::new(time(9, 0), time(11, 0)));
        let grid = TimeGrid::new(cal);

        let per_day = grid
            .slots()
            .map(|s| s.day)
            .counts();
        assert_eq!(per_day[&grid.calendar().first_day], 4);
        assert_eq!(per_day[&second_day], 2);
    }

    #[test]
    fn test_estimate_capacity_suggestion_round_trips() {
        let cal = calendar(1, 1, 120);
        let grid = TimeGrid::new(cal.clone());

        // 240 minute window fits one 120 minute match plus change, not four.
        let estimate = grid.estimate_capacity(4);
        assert!(!estimate.feasible);
        let suggested = estimate.suggested_duration_minutes.unwrap();
        assert!(suggested < 120);

        let corrected = TimeGrid::new(cal.with_duration(suggested));
        assert!(corrected.estimate_capacity(4).feasible);
        // The suggestion is the largest workable duration.
        let larger = TimeGrid::new(cal.with_duration(suggested + 1));
        assert!(!larger.estimate_capacity(4).feasible);
    }

    #[test]
    fn test_estimate_capacity_reports_shortfall_when_hopeless() {
        let grid = TimeGrid::new(calendar(1, 1, 60));
        let estimate = grid.estimate_capacity(100);
        assert!(!estimate.feasible);
        assert_eq!(estimate.suggested_duration_minutes, None);
        assert!(estimate.total_time_needed_minutes > estimate.total_time_available_minutes);
    }

    #[test]
    fn test_zero_matches_is_always_feasible() {
        let grid = TimeGrid::new(calendar(1, 1, 60));
        assert!(grid.estimate_capacity(0).feasible);
    }
}
