//! Arithmetic shared by the search engines
//!
//! UCB1 arithmetic, conversions between evaluations, scores and per-side
//! rewards, and construction of the default seeded random source.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Side;

/// Upper confidence bound of a child with `visits` playouts summing to
/// `total_reward`, under a parent visited `parent_visits` times
///
/// ```text
/// mean + c * sqrt(ln(N) / n)
/// ```
///
/// An unvisited child is unbounded.
pub fn ucb1_value(
    total_reward: f64,
    visits: u64,
    parent_visits: u64,
    exploration_constant: f64,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let n = visits as f64;
    let spread = (parent_visits as f64).ln() / n;
    total_reward / n + exploration_constant * spread.sqrt()
}

/// Converts a score for side A in `[0, 1]` into the reward seen by `side`
pub fn reward_for(side: Side, score_for_a: f64) -> f64 {
    match side {
        Side::A => score_for_a,
        Side::B => 1.0 - score_for_a,
    }
}

/// Maps a static evaluation in `[-1, 1]` onto a score for A in `[0, 1]`
pub fn evaluation_to_score(evaluation: f64) -> f64 {
    ((evaluation.clamp(-1.0, 1.0)) + 1.0) / 2.0
}

/// Random source used when the caller does not inject one.
///
/// A fixed seed gives the same stream on every platform; `None` seeds from
/// the operating system.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
