//! Elo rating calculation

use crate::models::{ParticipantId, PlayedMatch, RankingStrategy};
use std::collections::HashMap;

/// Starting rating for participants without one
pub const DEFAULT_RATING: f64 = 1500.0;

/// K-factor for rating updates (higher = more volatile)
pub const K_FACTOR: f64 = 32.0;

/// Expected score of a player rated `rating` against `opponent` (0.5 for equal ratings)
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// New ratings after one game. `score` is the first player's result: 1 win, 0.5 draw, 0 loss.
pub fn rate_game(rating: f64, opponent: f64, score: f64) -> (f64, f64) {
    let change = K_FACTOR * (score - expected_score(rating, opponent));
    (rating + change, opponent - change)
}

/// Apply an executed two-slot match to a rating table. `ranking` only decides who won;
/// a higher rating is better either way. Returns false (and changes nothing) for matches
/// that are not rated: unexecuted or not a pair.
pub fn apply_match(
    ratings: &mut HashMap<ParticipantId, f64>,
    m: &PlayedMatch,
    ranking: RankingStrategy,
) -> bool {
    let Some(result) = &m.result else {
        return false;
    };
    if m.slots.len() != 2 {
        return false;
    }
    let (a, b) = (m.slots[0].id, m.slots[1].id);
    let rating_a = ratings.get(&a).copied().unwrap_or(DEFAULT_RATING);
    let rating_b = ratings.get(&b).copied().unwrap_or(DEFAULT_RATING);
    let (new_a, new_b) = rate_game(rating_a, rating_b, result.points(0, ranking));
    ratings.insert(a, new_a);
    ratings.insert(b, new_b);
    true
}
