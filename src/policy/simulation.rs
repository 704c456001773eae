//! Playouts: estimating a freshly expanded position
//!
//! Every policy returns a score for side A in `[0, 1]`.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::{
    game_state::{GameState, Heuristic},
    utils,
};

/// Scores a position for side A
pub trait SimulationPolicy<S: GameState>: Send + Sync {
    /// Plays out or evaluates `state` and returns A's score.
    ///
    /// All randomness must come from `rng`.
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> f64;
}

/// Uniformly random moves until the game ends
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> SimulationPolicy<S> for RandomPolicy {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> f64 {
        let mut current = state.clone();

        loop {
            let moves = current.available_moves();
            match moves.choose(&mut *rng) {
                Some(mv) => current.make_move_unchecked(mv),
                None => break,
            }
        }

        current.winner().score()
    }
}

/// No playout at all: non-terminal positions get a static evaluation,
/// terminal ones their real outcome
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    pub heuristic: Heuristic,
}

impl HeuristicPolicy {
    pub fn new(heuristic: Heuristic) -> Self {
        HeuristicPolicy { heuristic }
    }
}

impl<S: GameState> SimulationPolicy<S> for HeuristicPolicy {
    fn simulate(&self, state: &S, _rng: &mut dyn RngCore) -> f64 {
        let outcome = state.winner();
        if outcome.is_decided() {
            return outcome.score();
        }

        utils::evaluation_to_score(state.evaluate_position(self.heuristic))
    }
}

impl<S: GameState> SimulationPolicy<S> for Box<dyn SimulationPolicy<S>> {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> f64 {
        (**self).simulate(state, rng)
    }
}
