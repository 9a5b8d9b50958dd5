use std::fmt::Display;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::group::GroupLabel;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "type")]
pub enum Round {
    Group { group: GroupLabel },
    RoundOfSixteen,
    Quarterfinal,
    Semifinal,
    Final,
    /// Consolation match deciding a fixed final position (3rd, 5th, …).
    Placement { position: u8 },
    /// Semifinal of a consolation sub-bracket (e.g. `13th_semifinal`).
    PlacementSemifinal { position: u8 },
}

impl Round {
    pub fn is_group(&self) -> bool {
        matches!(self, Round::Group { .. })
    }

    pub fn is_knockout(&self) -> bool {
        !self.is_group()
    }

    pub fn is_placement(&self) -> bool {
        matches!(self, Round::Placement { .. } | Round::PlacementSemifinal { .. })
    }

    /// The main-bracket round reached from this one by winning, if any.
    pub fn next_main_round(&self) -> Option<Round> {
        match self {
            Round::RoundOfSixteen => Some(Round::Quarterfinal),
            Round::Quarterfinal => Some(Round::Semifinal),
            Round::Semifinal => Some(Round::Final),
            _ => None,
        }
    }

    /// First main-bracket round of a knockout phase with `seats` slots.
    pub fn entry_round_for_slots(slots: u32) -> Option<Round> {
        match slots {
            2 => Some(Round::Final),
            4 => Some(Round::Semifinal),
            8 => Some(Round::Quarterfinal),
            16 => Some(Round::RoundOfSixteen),
            _ => None,
        }
    }

    pub fn slots(&self) -> Option<u32> {
        match self {
            Round::Final => Some(2),
            Round::Semifinal => Some(4),
            Round::Quarterfinal => Some(8),
            Round::RoundOfSixteen => Some(16),
            _ => None,
        }
    }
}

fn ordinal(position: u8) -> String {
    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", position, suffix)
}

impl Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Round::Group { group } => write!(f, "group_{}", group.ascii_lowercase()),
            Round::RoundOfSixteen => write!(f, "round_of_16"),
            Round::Quarterfinal => write!(f, "quarterfinal"),
            Round::Semifinal => write!(f, "semifinal"),
            Round::Final => write!(f, "final"),
            Round::Placement { position } => write!(f, "{}_place", ordinal(*position)),
            Round::PlacementSemifinal { position } => {
                write!(f, "{}_semifinal", ordinal(*position))
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RoundParseError(pub String);

impl Display for RoundParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown round label: {}", self.0)
    }
}

impl std::error::Error for RoundParseError {}

impl FromStr for Round {
    type Err = RoundParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round_of_16" => return Ok(Round::RoundOfSixteen),
            "quarterfinal" => return Ok(Round::Quarterfinal),
            "semifinal" => return Ok(Round::Semifinal),
            "final" => return Ok(Round::Final),
            _ => {}
        }

        if let Some(letter) = s.strip_prefix("group_") {
            let mut chars = letter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_lowercase() => {
                    return Ok(Round::Group {
                        group: GroupLabel(c as u8 - b'a'),
                    })
                }
                _ => return Err(RoundParseError(s.to_string())),
            }
        }

        let parse_position = |stem: &str| -> Option<u8> {
            let digits: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
            let position: u8 = digits.parse().ok()?;
            (stem == ordinal(position)).then(|| position)
        };

        if let Some(stem) = s.strip_suffix("_place") {
            if let Some(position) = parse_position(stem) {
                return Ok(Round::Placement { position });
            }
        }
        if let Some(stem) = s.strip_suffix("_semifinal") {
            if let Some(position) = parse_position(stem) {
                return Ok(Round::PlacementSemifinal { position });
            }
        }

        Err(RoundParseError(s.to_string()))
    }
}

/// A bracket seat: known participant, or to be decided by qualification.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "type")]
pub enum Seat {
    Decided { participant: Uuid },
    Pending,
}

impl Seat {
    pub fn participant(&self) -> Option<Uuid> {
        match self {
            Seat::Decided { participant } => Some(*participant),
            Seat::Pending => None,
        }
    }
}

/// One side of a match: a team, or two individuals paired for this match.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum MatchSide {
    Team { seat: Seat },
    Pair { seats: [Seat; 2] },
}

impl MatchSide {
    pub fn team(participant: Uuid) -> Self {
        MatchSide::Team {
            seat: Seat::Decided { participant },
        }
    }

    pub fn pair(first: Uuid, second: Uuid) -> Self {
        MatchSide::Pair {
            seats: [
                Seat::Decided { participant: first },
                Seat::Decided { participant: second },
            ],
        }
    }

    pub fn pending_team() -> Self {
        MatchSide::Team { seat: Seat::Pending }
    }

    pub fn pending_pair() -> Self {
        MatchSide::Pair {
            seats: [Seat::Pending, Seat::Pending],
        }
    }

    pub fn seats(&self) -> &[Seat] {
        match self {
            MatchSide::Team { seat } => std::slice::from_ref(seat),
            MatchSide::Pair { seats } => seats,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.seats().iter().filter_map(|s| s.participant())
    }

    pub fn is_decided(&self) -> bool {
        self.seats().iter().all(|s| matches!(s, Seat::Decided { .. }))
    }

    pub fn contains(&self, participant: Uuid) -> bool {
        self.participants().any(|p| p == participant)
    }
}
