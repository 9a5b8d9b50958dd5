use std::collections::HashMap;

use itertools::Itertools;
use open_court_entities::prelude::{MatchSide, Participant, Round, Uuid};
use open_court_entities::domain::group::GroupLabel;
use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use super::{PlanError, PlannedMatch};

#[derive(Debug, Clone)]
pub struct AmericanConfig {
    pub num_rounds: u32,
    pub partner_repeat_severity: f64,
    pub opponent_repeat_severity: f64,
    pub randomization_scale: f64,
}

impl Default for AmericanConfig {
    fn default() -> Self {
        AmericanConfig {
            num_rounds: 7,
            partner_repeat_severity: 10.0,
            opponent_repeat_severity: 1.0,
            randomization_scale: 0.5,
        }
    }
}

fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    (a.min(b), a.max(b))
}

#[derive(Default)]
struct PairingHistory {
    partner_counts: HashMap<(Uuid, Uuid), u32>,
    opponent_counts: HashMap<(Uuid, Uuid), u32>,
    play_counts: HashMap<Uuid, u32>,
}

impl PairingHistory {
    fn partnered(&self, a: Uuid, b: Uuid) -> u32 {
        *self.partner_counts.get(&pair_key(a, b)).unwrap_or(&0)
    }

    fn opposed(&self, a: Uuid, b: Uuid) -> u32 {
        *self.opponent_counts.get(&pair_key(a, b)).unwrap_or(&0)
    }

    fn split_cost(&self, config: &AmericanConfig, split: &([Uuid; 2], [Uuid; 2])) -> f64 {
        let (home, away) = split;
        let partner_repeats = self.partnered(home[0], home[1]) + self.partnered(away[0], away[1]);
        let opponent_repeats: u32 = home
            .iter()
            .cartesian_product(away.iter())
            .map(|(a, b)| self.opposed(*a, *b))
            .sum();
        partner_repeats as f64 * config.partner_repeat_severity
            + opponent_repeats as f64 * config.opponent_repeat_severity
    }

    fn record(&mut self, split: &([Uuid; 2], [Uuid; 2])) {
        let (home, away) = split;
        *self.partner_counts.entry(pair_key(home[0], home[1])).or_insert(0) += 1;
        *self.partner_counts.entry(pair_key(away[0], away[1])).or_insert(0) += 1;
        for (a, b) in home.iter().cartesian_product(away.iter()) {
            *self.opponent_counts.entry(pair_key(*a, *b)).or_insert(0) += 1;
        }
        for player in home.iter().chain(away.iter()) {
            *self.play_counts.entry(*player).or_insert(0) += 1;
        }
    }
}

/// Rotating-partner ("American") doubles for one group of individuals:
/// every round groups players four to a match, choosing the partner split
/// with the fewest repeat partners and opponents so far. Players beyond
/// floor(n/4)*4 sit the round out; sit-outs rotate to whoever has played
/// most.
pub fn plan_group(
    members: &[Uuid],
    group: GroupLabel,
    config: &AmericanConfig,
    rng: &mut StdRng,
) -> Result<Vec<PlannedMatch>, PlanError> {
    if members.len() < 4 {
        return Err(PlanError::InsufficientParticipants {
            available: members.len(),
            required: 4,
        });
    }

    let matches_per_round = members.len() / 4;
    let mut history = PairingHistory::default();
    let mut matches = vec![];

    for _round in 0..config.num_rounds {
        let mut pool = members.to_vec();
        pool.shuffle(rng);
        // Least-played players first; the shuffle breaks ties.
        pool.sort_by_key(|p| *history.play_counts.get(p).unwrap_or(&0));
        let playing = &pool[..matches_per_round * 4];

        for court in playing.chunks(4) {
            let splits = [
                ([court[0], court[1]], [court[2], court[3]]),
                ([court[0], court[2]], [court[1], court[3]]),
                ([court[0], court[3]], [court[1], court[2]]),
            ];
            let (home, away) = splits
                .iter()
                .min_by_key(|split| {
                    OrderedFloat(
                        history.split_cost(config, split)
                            + rng.gen_range(0.0..config.randomization_scale),
                    )
                })
                .copied()
                .unwrap();

            history.record(&(home, away));
            matches.push(PlannedMatch::new(
                Round::Group { group },
                [
                    MatchSide::pair(home[0], home[1]),
                    MatchSide::pair(away[0], away[1]),
                ],
            ));
        }
    }

    Ok(matches)
}

pub fn plan(
    participants: &[Participant],
    group: GroupLabel,
    config: &AmericanConfig,
    rng: &mut StdRng,
) -> Result<Vec<PlannedMatch>, PlanError> {
    let members = participants.iter().map(|p| p.uuid).collect_vec();
    plan_group(&members, group, config, rng)
}
