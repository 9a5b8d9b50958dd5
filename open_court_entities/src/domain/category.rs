use serde::{Serialize, Deserialize};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Category {
    pub uuid: Uuid,
    pub name: String,
    pub format: TournamentFormat,
    pub num_groups: u32,
    pub group_size_target: Option<u32>,
    pub knockout_stage: KnockoutStage,
    pub max_participants: Option<u32>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    SingleElimination,
    RoundRobin,
    /// Individual round robin with partners rotating every round.
    AmericanRoundRobin,
    GroupsKnockout,
    IndividualGroupsKnockout,
}

impl TournamentFormat {
    pub fn is_individual(&self) -> bool {
        matches!(
            self,
            TournamentFormat::AmericanRoundRobin | TournamentFormat::IndividualGroupsKnockout
        )
    }

    pub fn uses_groups(&self) -> bool {
        matches!(
            self,
            TournamentFormat::GroupsKnockout | TournamentFormat::IndividualGroupsKnockout
        )
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum KnockoutStage {
    Final,
    Semifinals,
    Quarterfinals,
    RoundOfSixteen,
}

impl KnockoutStage {
    /// Bracket seats when one seat is one team.
    pub fn team_seats(&self) -> u32 {
        match self {
            KnockoutStage::Final => 2,
            KnockoutStage::Semifinals => 4,
            KnockoutStage::Quarterfinals => 8,
            KnockoutStage::RoundOfSixteen => 16,
        }
    }

    /// Bracket seats when two individuals fill one bracket slot.
    pub fn individual_seats(&self) -> u32 {
        self.team_seats() * 2
    }

    pub fn seats(&self, individual: bool) -> u32 {
        if individual {
            self.individual_seats()
        } else {
            self.team_seats()
        }
    }
}

impl Category {
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Self {
        Category {
            uuid: Uuid::new_v4(),
            name: name.into(),
            format,
            num_groups: 1,
            group_size_target: None,
            knockout_stage: KnockoutStage::Semifinals,
            max_participants: None,
        }
    }

    pub fn with_groups(mut self, num_groups: u32) -> Self {
        self.num_groups = num_groups;
        self
    }

    pub fn with_knockout_stage(mut self, stage: KnockoutStage) -> Self {
        self.knockout_stage = stage;
        self
    }

    /// Seats in this category's knockout stage, in the unit the format pairs
    /// with (teams, or individuals for rotating-partner formats).
    pub fn knockout_seats(&self) -> u32 {
        self.knockout_stage.seats(self.format.is_individual())
    }
}
