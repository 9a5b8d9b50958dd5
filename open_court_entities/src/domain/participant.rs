use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::group::GroupLabel;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Participant {
    pub uuid: Uuid,
    pub name: String,
    pub seed: Option<u32>,
    pub group: Option<GroupLabel>,
    pub category_id: Option<Uuid>,
    pub kind: ParticipantKind,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum ParticipantKind {
    /// A fixed doubles pairing entering as one unit.
    Team { members: [Uuid; 2] },
    /// A single player; partners are assigned match by match.
    Individual { player: Uuid },
}

impl Participant {
    pub fn new_team(name: impl Into<String>, members: [Uuid; 2]) -> Self {
        Participant {
            uuid: Uuid::new_v4(),
            name: name.into(),
            seed: None,
            group: None,
            category_id: None,
            kind: ParticipantKind::Team { members },
        }
    }

    pub fn new_individual(name: impl Into<String>, player: Uuid) -> Self {
        Participant {
            uuid: Uuid::new_v4(),
            name: name.into(),
            seed: None,
            group: None,
            category_id: None,
            kind: ParticipantKind::Individual { player },
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_group(mut self, group: GroupLabel) -> Self {
        self.group = Some(group);
        self
    }

    pub fn is_individual(&self) -> bool {
        matches!(self.kind, ParticipantKind::Individual { .. })
    }
}
