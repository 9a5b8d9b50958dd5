use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;
use log::debug;
use open_court_entities::prelude::{GroupStanding, Match, MatchSide, Round, Seat, Uuid};
use rand::{rngs::StdRng, seq::SliceRandom};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingPolicy {
    /// Group A's Kth qualifier meets group B's (K+1)th and vice versa, so
    /// groupmates do not rematch immediately. Two groups, no wildcards.
    CrossSeed,
    /// Fisher-Yates shuffle, then sequential assignment into the bracket.
    Randomized,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BracketError {
    #[error("bracket entry round has {seats} seats, got {qualified} qualifiers")]
    WrongQualifierCount { seats: usize, qualified: usize },
    #[error("cross-seed pairing needs exactly two equally sized groups and no wildcards")]
    CrossSeedShapeMismatch,
    #[error("no knockout matches to populate")]
    NoEntryRound,
}

fn entry_round(matches: &[Match]) -> Option<Round> {
    matches
        .iter()
        .filter_map(|m| m.round.slots().map(|slots| (slots, m.round)))
        .max_by_key(|(slots, _)| *slots)
        .map(|(_, round)| round)
}

fn fill_sides(m: &mut Match, participants: &[Uuid]) {
    let mut remaining = participants.iter().copied();
    for side in m.sides.iter_mut() {
        *side = match side {
            MatchSide::Team { .. } => MatchSide::Team {
                seat: Seat::Decided {
                    participant: remaining.next().expect("seat fill underrun"),
                },
            },
            MatchSide::Pair { .. } => MatchSide::Pair {
                seats: [
                    Seat::Decided {
                        participant: remaining.next().expect("seat fill underrun"),
                    },
                    Seat::Decided {
                        participant: remaining.next().expect("seat fill underrun"),
                    },
                ],
            },
        };
    }
}

fn seats_per_match(m: &Match) -> usize {
    m.sides.iter().map(|s| s.seats().len()).sum()
}

/// Fills the entry round of a placeholder knockout phase with the
/// qualified participants. Later rounds and placement matches stay pending;
/// scheduling (time and court) is untouched.
pub fn populate_entry_round(
    matches: &mut [Match],
    qualified_per_group: &[Vec<Uuid>],
    wildcards: &[Uuid],
    policy: PairingPolicy,
    rng: &mut StdRng,
) -> Result<(), BracketError> {
    let entry = entry_round(matches).ok_or(BracketError::NoEntryRound)?;
    let mut entry_matches = matches
        .iter_mut()
        .filter(|m| m.round == entry)
        .collect_vec();

    let seats: usize = entry_matches.iter().map(|m| seats_per_match(m)).sum();
    let qualified_count =
        qualified_per_group.iter().map(|g| g.len()).sum::<usize>() + wildcards.len();
    if seats != qualified_count {
        return Err(BracketError::WrongQualifierCount {
            seats,
            qualified: qualified_count,
        });
    }

    let ordered = match policy {
        PairingPolicy::CrossSeed => {
            if qualified_per_group.len() != 2
                || qualified_per_group[0].len() != qualified_per_group[1].len()
                || !wildcards.is_empty()
            {
                return Err(BracketError::CrossSeedShapeMismatch);
            }
            let (group_a, group_b) = (&qualified_per_group[0], &qualified_per_group[1]);
            let depth = group_a.len();
            (0..depth)
                .flat_map(|k| [group_a[k], group_b[(k + 1) % depth]])
                .collect_vec()
        }
        PairingPolicy::Randomized => {
            let mut pool = qualified_per_group
                .iter()
                .flatten()
                .chain(wildcards.iter())
                .copied()
                .collect_vec();
            pool.shuffle(rng);
            pool
        }
    };

    let mut cursor = 0;
    for m in entry_matches.iter_mut() {
        let take = seats_per_match(m);
        fill_sides(m, &ordered[cursor..cursor + take]);
        cursor += take;
        debug!("populated {} match {}", m.round, m.sequence);
    }

    Ok(())
}

/// Seeds the consolation matches fed by a finished round: losers are
/// ordered by their group-stage standing and filled into the placement
/// matches best first, so consolation rounds stay seeded by demonstrated
/// strength.
pub fn populate_placement_round(
    matches: &mut [Match],
    completed_round: Round,
    groups_standings: &[Vec<GroupStanding>],
) {
    let standing_by_participant: HashMap<Uuid, GroupStanding> = groups_standings
        .iter()
        .flatten()
        .map(|s| (s.participant, *s))
        .collect();

    let loser_sides = matches
        .iter()
        .filter(|m| m.round == completed_round)
        .filter_map(|m| m.loser_side_idx().map(|idx| m.sides[idx].clone()))
        .sorted_by_key(|side| {
            Reverse(
                side.participants()
                    .filter_map(|p| standing_by_participant.get(&p).map(|s| s.rank_key()))
                    .max()
                    .unwrap_or((0, i64::MIN, 0)),
            )
        })
        .collect_vec();

    let targets: Vec<Round> = match completed_round {
        Round::Semifinal => vec![Round::Placement { position: 3 }],
        Round::Quarterfinal => vec![
            Round::Placement { position: 5 },
            Round::Placement { position: 7 },
        ],
        Round::RoundOfSixteen => vec![
            Round::Placement { position: 9 },
            Round::Placement { position: 11 },
            Round::PlacementSemifinal { position: 13 },
            Round::PlacementSemifinal { position: 13 },
        ],
        Round::PlacementSemifinal { position } => vec![Round::Placement { position }],
        _ => vec![],
    };

    let mut loser_sides = loser_sides.into_iter();
    for target in targets {
        for m in matches.iter_mut().filter(|m| m.round == target) {
            for side in m.sides.iter_mut() {
                if side.is_decided() {
                    continue;
                }
                if let Some(loser) = loser_sides.next() {
                    *side = loser;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use open_court_entities::prelude::{MatchScore, MatchStatus};
    use rand::SeedableRng;

    use crate::plan::groups::knockout_placeholders;

    use super::*;

    fn placeholder_matches(slots: u32, individual: bool) -> Vec<Match> {
        knockout_placeholders(slots, individual)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(idx, planned)| Match {
                round: planned.round,
                sequence: idx as u32,
                scheduled_at: None,
                court: None,
                sides: planned.sides,
                status: MatchStatus::Scheduled,
                score: MatchScore::default(),
            })
            .collect()
    }

    #[test]
    fn test_cross_seed_avoids_same_group_rematches() -> Result<(), anyhow::Error> {
        let mut matches = placeholder_matches(4, false);
        let group_a = vec![Uuid::from_u128(1), Uuid::from_u128(2)];
        let group_b = vec![Uuid::from_u128(11), Uuid::from_u128(12)];
        let mut rng = StdRng::seed_from_u64(0);

        populate_entry_round(
            &mut matches,
            &[group_a.clone(), group_b.clone()],
            &[],
            PairingPolicy::CrossSeed,
            &mut rng,
        )?;

        let semifinals = matches
            .iter()
            .filter(|m| m.round == Round::Semifinal)
            .collect_vec();
        assert_eq!(semifinals.len(), 2);
        for m in &semifinals {
            let sides = m.sides.iter().flat_map(|s| s.participants()).collect_vec();
            let from_a = sides.iter().filter(|p| group_a.contains(p)).count();
            assert_eq!(from_a, 1, "semifinal mixes the groups");
        }
        // A1 meets B2, B1 meets A2.
        assert!(semifinals[0].involves(Uuid::from_u128(1)));
        assert!(semifinals[0].involves(Uuid::from_u128(12)));
        assert!(semifinals[1].involves(Uuid::from_u128(2)));
        assert!(semifinals[1].involves(Uuid::from_u128(11)));
        Ok(())
    }

    #[test]
    fn test_cross_seed_rejects_other_shapes() {
        let mut matches = placeholder_matches(4, false);
        let mut rng = StdRng::seed_from_u64(0);
        let result = populate_entry_round(
            &mut matches,
            &[vec![Uuid::from_u128(1)], vec![Uuid::from_u128(2)]],
            &[Uuid::from_u128(3), Uuid::from_u128(4)],
            PairingPolicy::CrossSeed,
            &mut rng,
        );
        assert_eq!(result, Err(BracketError::CrossSeedShapeMismatch));
    }

    #[test]
    fn test_randomized_fills_individual_brackets_four_at_a_time() -> Result<(), anyhow::Error> {
        let mut matches = placeholder_matches(2, true);
        let qualified = (1..=4u128).map(Uuid::from_u128).collect_vec();
        let mut rng = StdRng::seed_from_u64(8);

        populate_entry_round(
            &mut matches,
            &[qualified.clone()],
            &[],
            PairingPolicy::Randomized,
            &mut rng,
        )?;

        let final_match = matches.iter().find(|m| m.round == Round::Final).unwrap();
        assert!(final_match.sides.iter().all(|s| s.is_decided()));
        let seated = final_match
            .sides
            .iter()
            .flat_map(|s| s.participants())
            .sorted()
            .collect_vec();
        assert_eq!(seated, qualified);
        Ok(())
    }

    #[test]
    fn test_wrong_qualifier_count_is_rejected() {
        let mut matches = placeholder_matches(4, false);
        let mut rng = StdRng::seed_from_u64(0);
        let result = populate_entry_round(
            &mut matches,
            &[vec![Uuid::from_u128(1), Uuid::from_u128(2)]],
            &[],
            PairingPolicy::Randomized,
            &mut rng,
        );
        assert_eq!(
            result,
            Err(BracketError::WrongQualifierCount {
                seats: 4,
                qualified: 2
            })
        );
    }

    #[test]
    fn test_placement_round_seeded_by_group_standing() -> Result<(), anyhow::Error> {
        let mut matches = placeholder_matches(8, false);

        // Complete the quarterfinals: losers are 2, 4, 6, 8.
        let quarterfinal_pairs = [(1u128, 2u128), (3, 4), (5, 6), (7, 8)];
        let mut quarterfinal_idx = 0;
        for m in matches.iter_mut().filter(|m| m.round == Round::Quarterfinal) {
            let (winner, loser) = quarterfinal_pairs[quarterfinal_idx];
            m.sides = [
                MatchSide::team(Uuid::from_u128(winner)),
                MatchSide::team(Uuid::from_u128(loser)),
            ];
            m.status = MatchStatus::Completed;
            m.score = MatchScore::from_sets(vec![(6, 3)]);
            quarterfinal_idx += 1;
        }

        let standings = vec![(2u128, 3u32), (4, 0), (6, 2), (8, 1)]
            .into_iter()
            .map(|(id, wins)| GroupStanding {
                participant: Uuid::from_u128(id),
                wins,
                games_won: wins * 6,
                games_lost: 6,
            })
            .collect_vec();

        populate_placement_round(&mut matches, Round::Quarterfinal, &[standings]);

        // Best two losers (2 and 6) contest 5th place, the others 7th.
        let fifth = matches
            .iter()
            .find(|m| m.round == Round::Placement { position: 5 })
            .unwrap();
        assert!(fifth.involves(Uuid::from_u128(2)));
        assert!(fifth.involves(Uuid::from_u128(6)));
        let seventh = matches
            .iter()
            .find(|m| m.round == Round::Placement { position: 7 })
            .unwrap();
        assert!(seventh.involves(Uuid::from_u128(8)));
        assert!(seventh.involves(Uuid::from_u128(4)));
        Ok(())
    }
}
