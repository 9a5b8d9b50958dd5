use std::collections::HashMap;

use itertools::Itertools;
use log::debug;
use open_court_entities::prelude::{Participant, Uuid};
use open_court_entities::domain::group::GroupLabel;
use rand::{rngs::StdRng, seq::SliceRandom};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupAssignError {
    #[error("group count must be between 1 and 26")]
    InvalidGroupCount,
    #[error("{} participants are missing a group assignment", .0.len())]
    IncompleteAssignment(Vec<Uuid>),
    #[error("assignment references unknown participant {0}")]
    UnknownParticipant(Uuid),
}

/// Shuffle-then-deal: a seeded shuffle followed by dealing round-robin into
/// `group_count` labeled groups, so sizes differ by at most one. Returns the
/// participants in their input order with group labels set.
pub fn assign_to_groups(
    participants: &[Participant],
    group_count: u32,
    rng: &mut StdRng,
) -> Result<Vec<Participant>, GroupAssignError> {
    if group_count == 0 || group_count > 26 {
        return Err(GroupAssignError::InvalidGroupCount);
    }

    let mut dealing_order = participants.iter().map(|p| p.uuid).collect_vec();
    dealing_order.shuffle(rng);

    let assignment: HashMap<Uuid, GroupLabel> = dealing_order
        .into_iter()
        .enumerate()
        .map(|(idx, uuid)| (uuid, GroupLabel((idx % group_count as usize) as u8)))
        .collect();

    debug!(
        "dealt {} participants into {} groups",
        participants.len(),
        group_count
    );

    Ok(participants
        .iter()
        .map(|p| {
            let mut p = p.clone();
            p.group = assignment.get(&p.uuid).copied();
            p
        })
        .collect_vec())
}

/// Operator-supplied mapping. Every participant must be assigned exactly one
/// group; unknown ids in the mapping are rejected.
pub fn assign_manually(
    participants: &[Participant],
    mapping: &HashMap<Uuid, GroupLabel>,
) -> Result<Vec<Participant>, GroupAssignError> {
    if let Some(unknown) = mapping
        .keys()
        .find(|uuid| !participants.iter().any(|p| p.uuid == **uuid))
    {
        return Err(GroupAssignError::UnknownParticipant(*unknown));
    }

    let missing = participants
        .iter()
        .filter(|p| !mapping.contains_key(&p.uuid))
        .map(|p| p.uuid)
        .collect_vec();
    if !missing.is_empty() {
        return Err(GroupAssignError::IncompleteAssignment(missing));
    }

    Ok(participants
        .iter()
        .map(|p| {
            let mut p = p.clone();
            p.group = mapping.get(&p.uuid).copied();
            p
        })
        .collect_vec())
}
