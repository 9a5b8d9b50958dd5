use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Serialize, Deserialize};

/// Minutes between the end of one match and the start of the next on the
/// same court.
pub const TRANSITION_BUFFER_MINUTES: u32 = 5;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub struct DayWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        DayWindow { open, close }
    }

    pub fn minutes(&self) -> u32 {
        (self.close - self.open).num_minutes().max(0) as u32
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct TournamentCalendar {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub default_window: DayWindow,
    /// Days with opening hours different from the default.
    pub overrides: HashMap<NaiveDate, DayWindow>,
    pub match_duration_minutes: u32,
    pub court_count: u32,
}

impl TournamentCalendar {
    pub fn window_for(&self, day: NaiveDate) -> DayWindow {
        self.overrides.get(&day).copied().unwrap_or(self.default_window)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let mut day = self.first_day;
        std::iter::from_fn(move || {
            if day > self.last_day {
                return None;
            }
            let current = day;
            day += Duration::days(1);
            Some(current)
        })
    }

    pub fn with_duration(&self, match_duration_minutes: u32) -> Self {
        TournamentCalendar {
            match_duration_minutes,
            ..self.clone()
        }
    }
}
