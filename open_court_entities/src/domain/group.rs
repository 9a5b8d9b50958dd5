use std::fmt::Display;

use serde::{Serialize, Deserialize};

/// Zero-based group index, displayed as `A`, `B`, …
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Clone, Copy)]
#[serde(transparent)]
pub struct GroupLabel(pub u8);

impl GroupLabel {
    pub fn letter(&self) -> char {
        (b'A' + self.0) as char
    }

    pub fn ascii_lowercase(&self) -> char {
        self.letter().to_ascii_lowercase()
    }

    pub fn all(count: u8) -> impl Iterator<Item = GroupLabel> {
        (0..count).map(GroupLabel)
    }
}

impl Display for GroupLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
