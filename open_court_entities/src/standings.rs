use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::domain::matches::Match;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub struct GroupStanding {
    pub participant: Uuid,
    pub wins: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl GroupStanding {
    pub fn new(participant: Uuid) -> Self {
        GroupStanding {
            participant,
            wins: 0,
            games_won: 0,
            games_lost: 0,
        }
    }

    pub fn game_difference(&self) -> i64 {
        self.games_won as i64 - self.games_lost as i64
    }

    /// Shared ranking key: wins, then game difference, then games won.
    /// Every place standings are ordered (qualification, wildcards,
    /// consolation seeding) must sort by this key, descending.
    pub fn rank_key(&self) -> (u32, i64, u32) {
        (self.wins, self.game_difference(), self.games_won)
    }
}

/// Standings for one group, recomputed from scratch from completed matches.
/// Incomplete matches are ignored, not counted as losses. The result is
/// ordered best first; ties beyond all three criteria keep the order of
/// `group_participants`.
pub fn rank_group(completed_matches: &[Match], group_participants: &[Uuid]) -> Vec<GroupStanding> {
    let mut standings: HashMap<Uuid, GroupStanding> = group_participants
        .iter()
        .map(|p| (*p, GroupStanding::new(*p)))
        .collect();

    for m in completed_matches.iter().filter(|m| m.is_completed()) {
        let winner = m.winner_side_idx();
        for (side_idx, side) in m.sides.iter().enumerate() {
            let games_won = m.score.games_for_side(side_idx);
            let games_lost = m.score.games_for_side(1 - side_idx);
            for participant in side.participants() {
                let entry = match standings.get_mut(&participant) {
                    Some(entry) => entry,
                    None => continue,
                };
                entry.games_won += games_won;
                entry.games_lost += games_lost;
                if winner == Some(side_idx) {
                    entry.wins += 1;
                }
            }
        }
    }

    group_participants
        .iter()
        .filter_map(|p| standings.get(p).copied())
        .sorted_by_key(|s| Reverse(s.rank_key()))
        .collect_vec()
}
