use open_court_entities::prelude::{Category, MatchSide, Participant, Round, TournamentFormat, Uuid};
use open_court_entities::domain::group::GroupLabel;
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use thiserror::Error;

pub mod single_elimination;
pub mod round_robin;
pub mod american;
pub mod groups;

pub use single_elimination::SingleEliminationConfig;
pub use american::AmericanConfig;

/// A match before any time or court is assigned. Knockout sides may still
/// be pending.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct PlannedMatch {
    pub round: Round,
    pub sequence: u32,
    pub sides: [MatchSide; 2],
}

impl PlannedMatch {
    pub fn new(round: Round, sides: [MatchSide; 2]) -> Self {
        PlannedMatch {
            round,
            sequence: 0,
            sides,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.sides.iter().flat_map(|s| s.participants())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("cannot plan with {available} participants, need at least {required}")]
    InsufficientParticipants { available: usize, required: usize },
    #[error("group {group} has {size} participants, needs at least {required} to fill the knockout stage")]
    InsufficientGroupSize {
        group: GroupLabel,
        size: usize,
        required: usize,
    },
    #[error("participant {0} has no group assignment")]
    MissingGroupAssignment(Uuid),
    #[error("no bracket shape for {size} slots")]
    UnsupportedBracketSize { size: u32 },
}

/// Round structure and match list for one category, before scheduling.
pub fn plan_format(
    category: &Category,
    participants: &[Participant],
    rng: &mut StdRng,
) -> Result<Vec<PlannedMatch>, PlanError> {
    let mut matches = match category.format {
        TournamentFormat::SingleElimination => {
            single_elimination::plan(participants, &SingleEliminationConfig::default())?
        }
        TournamentFormat::RoundRobin => round_robin::plan(participants, GroupLabel(0))?,
        TournamentFormat::AmericanRoundRobin => {
            american::plan(participants, GroupLabel(0), &AmericanConfig::default(), rng)?
        }
        TournamentFormat::GroupsKnockout | TournamentFormat::IndividualGroupsKnockout => {
            groups::plan(category, participants, rng)?
        }
    };

    for (idx, planned) in matches.iter_mut().enumerate() {
        planned.sequence = idx as u32;
    }
    Ok(matches)
}
