use itertools::Itertools;
use open_court_entities::prelude::{MatchSide, Participant, Round, Uuid};
use open_court_entities::domain::group::GroupLabel;

use super::{PlanError, PlannedMatch};

/// Fixed-pairs round robin for one group via the circle method: the first
/// entry stays put, the rest rotate one position per round. Every unordered
/// pair meets exactly once; n teams play n-1 rounds (n rounds with a bye
/// when n is odd), floor(n/2) matches per round.
pub fn plan_group(members: &[Uuid], group: GroupLabel) -> Vec<PlannedMatch> {
    let mut circle: Vec<Option<Uuid>> = members.iter().copied().map(Some).collect();
    if circle.len() % 2 != 0 {
        circle.push(None);
    }
    let n = circle.len();
    if n < 2 {
        return vec![];
    }

    let mut matches = vec![];
    let mut rotating = circle[1..].to_vec();
    for _round in 0..n - 1 {
        let seats = std::iter::once(circle[0])
            .chain(rotating.iter().copied())
            .collect_vec();
        for i in 0..n / 2 {
            if let (Some(home), Some(away)) = (seats[i], seats[n - 1 - i]) {
                matches.push(PlannedMatch::new(
                    Round::Group { group },
                    [MatchSide::team(home), MatchSide::team(away)],
                ));
            }
        }
        rotating.rotate_right(1);
    }
    matches
}

pub fn plan(participants: &[Participant], group: GroupLabel) -> Result<Vec<PlannedMatch>, PlanError> {
    if participants.len() < 2 {
        return Err(PlanError::InsufficientParticipants {
            available: participants.len(),
            required: 2,
        });
    }
    let members = participants.iter().map(|p| p.uuid).collect_vec();
    Ok(plan_group(&members, group))
}
