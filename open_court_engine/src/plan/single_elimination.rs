use itertools::Itertools;
use open_court_entities::prelude::{MatchSide, Participant, Round, Uuid};

use super::{PlanError, PlannedMatch};

#[derive(Debug, Clone)]
pub struct SingleEliminationConfig {
    /// Synthesize a 3rd-place match between the semifinal losers.
    pub include_third_place: bool,
}

impl Default for SingleEliminationConfig {
    fn default() -> Self {
        SingleEliminationConfig {
            include_third_place: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Known(Uuid),
    Bye,
    Winner,
}

impl Slot {
    fn to_seat_side(self) -> MatchSide {
        match self {
            Slot::Known(participant) => MatchSide::team(participant),
            _ => MatchSide::pending_team(),
        }
    }
}

/// Standard bracket seed order: seed 1 at the top, seed 2 at the bottom,
/// recursively folding so the top seeds cannot meet before the last rounds.
fn bracket_seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let doubled = order.len() * 2;
        order = order
            .iter()
            .flat_map(|s| [*s, doubled + 1 - s])
            .collect_vec();
    }
    order
}

/// Power-of-two bracket with byes awarded to the highest seeds. Rounds are
/// labeled by depth; each main round's matches come before the next round's.
pub fn plan(
    participants: &[Participant],
    config: &SingleEliminationConfig,
) -> Result<Vec<PlannedMatch>, PlanError> {
    if participants.len() < 2 {
        return Err(PlanError::InsufficientParticipants {
            available: participants.len(),
            required: 2,
        });
    }

    // Seeded entries first (ascending), unseeded after in input order.
    let seeded = participants
        .iter()
        .enumerate()
        .sorted_by_key(|(idx, p)| (p.seed.unwrap_or(u32::MAX), *idx))
        .map(|(_, p)| p.uuid)
        .collect_vec();

    let bracket_size = seeded.len().next_power_of_two();
    let entry_round = Round::entry_round_for_slots(bracket_size as u32)
        .ok_or(PlanError::UnsupportedBracketSize {
            size: bracket_size as u32,
        })?;

    let mut slots = bracket_seed_order(bracket_size)
        .into_iter()
        .map(|seed| match seeded.get(seed - 1) {
            Some(uuid) => Slot::Known(*uuid),
            None => Slot::Bye,
        })
        .collect_vec();

    let mut matches = vec![];
    let mut round = Some(entry_round);
    while let Some(current_round) = round {
        let mut next_slots = vec![];
        for pair in slots.chunks(2) {
            match (pair[0], pair[1]) {
                (Slot::Known(advancing), Slot::Bye) | (Slot::Bye, Slot::Known(advancing)) => {
                    next_slots.push(Slot::Known(advancing));
                }
                (Slot::Bye, Slot::Bye) => next_slots.push(Slot::Bye),
                (home, away) => {
                    matches.push(PlannedMatch::new(
                        current_round,
                        [home.to_seat_side(), away.to_seat_side()],
                    ));
                    next_slots.push(Slot::Winner);
                }
            }
        }
        slots = next_slots;
        round = current_round.next_main_round();
    }

    if config.include_third_place && bracket_size >= 4 {
        matches.push(PlannedMatch::new(
            Round::Placement { position: 3 },
            [MatchSide::pending_team(), MatchSide::pending_team()],
        ));
    }

    Ok(matches)
}
