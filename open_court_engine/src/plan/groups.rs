use std::collections::BTreeMap;

use open_court_entities::prelude::{Category, MatchSide, Participant, Round, Uuid};
use open_court_entities::domain::group::GroupLabel;
use rand::rngs::StdRng;

use super::{american, round_robin, AmericanConfig, PlanError, PlannedMatch};

fn pending_side(individual: bool) -> MatchSide {
    if individual {
        MatchSide::pending_pair()
    } else {
        MatchSide::pending_team()
    }
}

/// Placeholder knockout phase for a bracket with `slots` main-bracket
/// slots (a slot is a team, or a to-be-paired duo of individuals): the
/// main rounds plus the consolation ladder that gives every knockout
/// entrant a final position.
pub fn knockout_placeholders(slots: u32, individual: bool) -> Result<Vec<PlannedMatch>, PlanError> {
    let entry_round =
        Round::entry_round_for_slots(slots).ok_or(PlanError::UnsupportedBracketSize { size: slots })?;

    let mut matches = vec![];
    let mut round = Some(entry_round);
    let mut current_slots = slots;
    while let Some(current_round) = round {
        for _ in 0..current_slots / 2 {
            matches.push(PlannedMatch::new(
                current_round,
                [pending_side(individual), pending_side(individual)],
            ));
        }
        round = current_round.next_main_round();
        current_slots /= 2;
    }

    let mut placement_rounds = vec![];
    if slots >= 4 {
        placement_rounds.push(Round::Placement { position: 3 });
    }
    if slots >= 8 {
        placement_rounds.push(Round::Placement { position: 5 });
        placement_rounds.push(Round::Placement { position: 7 });
    }
    if slots >= 16 {
        placement_rounds.push(Round::Placement { position: 9 });
        placement_rounds.push(Round::Placement { position: 11 });
        placement_rounds.push(Round::PlacementSemifinal { position: 13 });
        placement_rounds.push(Round::PlacementSemifinal { position: 13 });
        placement_rounds.push(Round::Placement { position: 13 });
        placement_rounds.push(Round::Placement { position: 15 });
    }
    for placement_round in placement_rounds {
        matches.push(PlannedMatch::new(
            placement_round,
            [pending_side(individual), pending_side(individual)],
        ));
    }

    Ok(matches)
}

/// Group-stage round robin per group followed by a placeholder knockout
/// phase sized by the category's knockout stage.
pub fn plan(
    category: &Category,
    participants: &[Participant],
    rng: &mut StdRng,
) -> Result<Vec<PlannedMatch>, PlanError> {
    let individual = category.format.is_individual();
    if participants.len() < 2 {
        return Err(PlanError::InsufficientParticipants {
            available: participants.len(),
            required: 2,
        });
    }

    let mut groups: BTreeMap<GroupLabel, Vec<Uuid>> = BTreeMap::new();
    for participant in participants {
        let group = participant
            .group
            .ok_or(PlanError::MissingGroupAssignment(participant.uuid))?;
        groups.entry(group).or_default().push(participant.uuid);
    }

    let seats = category.knockout_seats();
    let num_groups = groups.len() as u32;
    let min_per_group = ((seats + num_groups - 1) / num_groups) as usize;
    for (group, members) in &groups {
        if members.len() < min_per_group {
            return Err(PlanError::InsufficientGroupSize {
                group: *group,
                size: members.len(),
                required: min_per_group,
            });
        }
    }

    let mut matches = vec![];
    for (group, members) in &groups {
        if individual {
            matches.extend(american::plan_group(
                members,
                *group,
                &AmericanConfig::default(),
                rng,
            )?);
        } else {
            matches.extend(round_robin::plan_group(members, *group));
        }
    }

    // One knockout slot is one team, or one pair of individuals.
    let bracket_slots = category.knockout_stage.team_seats();
    matches.extend(knockout_placeholders(bracket_slots, individual)?);

    Ok(matches)
}
