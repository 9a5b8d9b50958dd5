use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::rounds::{MatchSide, Round};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Completed,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub struct SetScore {
    pub side_a: u32,
    pub side_b: u32,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Default)]
pub struct MatchScore {
    pub sets: Vec<SetScore>,
}

impl MatchScore {
    pub fn from_sets(sets: Vec<(u32, u32)>) -> Self {
        MatchScore {
            sets: sets
                .into_iter()
                .map(|(side_a, side_b)| SetScore { side_a, side_b })
                .collect(),
        }
    }

    pub fn games_for_side(&self, side_idx: usize) -> u32 {
        self.sets
            .iter()
            .map(|s| if side_idx == 0 { s.side_a } else { s.side_b })
            .sum()
    }

    pub fn sets_for_side(&self, side_idx: usize) -> u32 {
        self.sets
            .iter()
            .filter(|s| {
                if side_idx == 0 {
                    s.side_a > s.side_b
                } else {
                    s.side_b > s.side_a
                }
            })
            .count() as u32
    }
}

/// A timetable entry. Created in bulk by the scheduler with status
/// `scheduled` and a zeroed score; score and status are mutated externally
/// by gameplay.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Match {
    pub round: Round,
    pub sequence: u32,
    pub scheduled_at: Option<NaiveDateTime>,
    /// 1-based court index. Court names are the caller's concern.
    pub court: Option<u32>,
    pub sides: [MatchSide; 2],
    pub status: MatchStatus,
    pub score: MatchScore,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Index of the winning side of a completed match: more sets won,
    /// tie-broken by total games. `None` while undecidable.
    pub fn winner_side_idx(&self) -> Option<usize> {
        if !self.is_completed() {
            return None;
        }
        let sets_a = self.score.sets_for_side(0);
        let sets_b = self.score.sets_for_side(1);
        if sets_a != sets_b {
            return Some(if sets_a > sets_b { 0 } else { 1 });
        }
        let games_a = self.score.games_for_side(0);
        let games_b = self.score.games_for_side(1);
        if games_a != games_b {
            return Some(if games_a > games_b { 0 } else { 1 });
        }
        None
    }

    pub fn loser_side_idx(&self) -> Option<usize> {
        self.winner_side_idx().map(|w| 1 - w)
    }

    pub fn involves(&self, participant: Uuid) -> bool {
        self.sides.iter().any(|s| s.contains(participant))
    }

    pub fn to_insert_record(&self) -> MatchInsertRecord {
        MatchInsertRecord {
            round: self.round.to_string(),
            sequence: self.sequence,
            scheduled_at: self.scheduled_at,
            court: self.court,
            side_a: self.sides[0].seats().iter().map(|s| s.participant()).collect(),
            side_b: self.sides[1].seats().iter().map(|s| s.participant()).collect(),
            status: MatchStatus::Scheduled,
            score: MatchScore::default(),
        }
    }

    pub fn to_insert_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_insert_record())
    }
}

/// The shape the surrounding application bulk-inserts. Pending seats
/// serialize as `null` entries in the side arrays.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct MatchInsertRecord {
    pub round: String,
    pub sequence: u32,
    pub scheduled_at: Option<NaiveDateTime>,
    pub court: Option<u32>,
    pub side_a: Vec<Option<Uuid>>,
    pub side_b: Vec<Option<Uuid>>,
    pub status: MatchStatus,
    pub score: MatchScore,
}
