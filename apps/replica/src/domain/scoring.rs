//! Round scoring and the append-only scoreboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::PlayerId;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: i32,
    pub bonus: i32,
}

impl Score {
    pub fn total(self) -> i32 {
        self.score.saturating_add(self.bonus)
    }
}

/// Score for one player at the end of `round`.
///
/// Exact bids earn `20` per trick (a zero bid earns `10 * round`) plus any
/// capture bonus. Missed bids lose `10` per trick of difference (a zero bid
/// loses `10 * round`) and forfeit the bonus.
pub fn round_score(bid: u32, took: u32, round: u32, bonus: i32) -> Score {
    let (bid, took, round) = (bid as i32, took as i32, round as i32);
    if bid == took {
        let score = if bid == 0 { round * 10 } else { bid * 20 };
        Score { score, bonus }
    } else {
        let score = if bid == 0 {
            -round * 10
        } else {
            -(bid - took).abs() * 10
        };
        Score { score, bonus: 0 }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundScores(BTreeMap<PlayerId, Score>);

impl RoundScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, player_id: PlayerId, score: Score) -> Self {
        self.0.insert(player_id, score);
        self
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<Score> {
        self.0.get(player_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &Score)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PlayerId, Score)> for RoundScores {
    fn from_iter<T: IntoIterator<Item = (PlayerId, Score)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered per-round results. Rounds are only ever appended.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard(Vec<RoundScores>);

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// New board with `round` appended; `self` is left untouched.
    pub fn appended(&self, round: RoundScores) -> Self {
        let mut rounds = self.0.clone();
        rounds.push(round);
        Self(rounds)
    }

    pub fn rounds(&self) -> &[RoundScores] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every round of `self` appears unchanged at the start of `other`.
    pub fn is_prefix_of(&self, other: &ScoreBoard) -> bool {
        other.0.starts_with(&self.0)
    }

    pub fn totals(&self) -> BTreeMap<PlayerId, i32> {
        let mut totals = BTreeMap::new();
        for round in &self.0 {
            for (player_id, score) in round.iter() {
                let total = totals.entry(player_id.clone()).or_insert(0i32);
                *total = total.saturating_add(score.total());
            }
        }
        totals
    }

    /// Highest aggregate; ties go to the smallest player id.
    pub fn leader(&self) -> Option<PlayerId> {
        self.totals()
            .into_iter()
            .fold(None, |best: Option<(PlayerId, i32)>, (id, total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((id, total)),
            })
            .map(|(id, _)| id)
    }
}
