//! Depth-bounded minimax search with optional alpha-beta pruning
//!
//! Side A maximizes and side B minimizes the static evaluation. Among equally
//! valued successors the first in `legal_moves()` order is chosen, with or
//! without pruning: the root only replaces its best move on a strictly better
//! value, and a pruned subtree can only report a bound at or below (above for
//! B) the value already held.

use std::collections::HashMap;
use std::time::Instant;

use log::debug;

use crate::{
    board::Side,
    config::MinimaxConfig,
    game_state::{GameState, Heuristic},
    stats::SearchStatistics,
    GameError, Result,
};

const ENGINE: &str = "minimax";

/// Result of a minimax search
#[derive(Debug, Clone)]
pub struct MinimaxDecision<S> {
    /// The chosen successor state
    pub state: S,
    /// Minimax value of the chosen successor, from A's perspective
    pub value: f64,
    /// Counters gathered during the search
    pub statistics: SearchStatistics,
}

/// The minimax engine
#[derive(Debug, Clone, Default)]
pub struct Minimax {
    config: MinimaxConfig,
}

impl Minimax {
    /// Creates an engine with the given configuration
    pub fn new(config: MinimaxConfig) -> Self {
        Minimax { config }
    }

    /// Returns the engine configuration
    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    /// Chooses the best successor of `state`.
    ///
    /// Fails with [`GameError::TerminalState`] if `state` has no legal moves.
    pub fn choose_move<S: GameState>(&self, state: &S) -> Result<S> {
        self.search(state).map(|decision| decision.state)
    }

    /// Searches `state` and returns the decision with its value and statistics
    pub fn search<S: GameState>(&self, state: &S) -> Result<MinimaxDecision<S>> {
        let start = Instant::now();
        let mut children = state.legal_moves();
        if children.is_empty() {
            return Err(GameError::TerminalState {
                engine: ENGINE.to_string(),
                key: state.key(),
            });
        }

        let child_depth = self.config.depth.saturating_sub(1);
        let maximizing = state.to_move() == Side::A;
        let (values, mut statistics) = self.root_values(&children, child_depth, maximizing);

        let mut best_index = 0;
        for (i, &value) in values.iter().enumerate().skip(1) {
            if improves(maximizing, value, values[best_index]) {
                best_index = i;
            }
        }

        statistics.total_time = start.elapsed();
        statistics.max_depth = self.config.depth;

        let value = values[best_index];
        let chosen = children.swap_remove(best_index);

        debug!(
            "minimax chose {:?} with value {:.3} (depth {}, {} nodes, {} cutoffs)",
            chosen.previous_move(),
            value,
            self.config.depth,
            statistics.nodes_evaluated,
            statistics.cutoffs
        );

        Ok(MinimaxDecision {
            state: chosen,
            value,
            statistics,
        })
    }

    /// Minimax value of `state` searched to `depth` plies
    pub fn evaluate<S: GameState>(&self, state: &S, depth: usize) -> f64 {
        let mut search = Search::new(&self.config);
        search.value(state, depth, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Values of the root's children. Sequential search narrows the window
    /// with each child, which may leave non-improving children as bounds.
    #[cfg(not(feature = "parallel"))]
    fn root_values<S: GameState>(
        &self,
        children: &[S],
        depth: usize,
        maximizing: bool,
    ) -> (Vec<f64>, SearchStatistics) {
        let mut search = Search::new(&self.config);
        let mut values = Vec::with_capacity(children.len());
        let mut alpha = f64::NEG_INFINITY;
        let mut beta = f64::INFINITY;

        for child in children {
            let value = search.value(child, depth, alpha, beta);
            if self.config.pruning {
                if maximizing {
                    alpha = alpha.max(value);
                } else {
                    beta = beta.min(value);
                }
            }
            values.push(value);
        }

        (values, search.statistics)
    }

    /// Values of the root's children, each searched with a full window on
    /// the rayon pool
    #[cfg(feature = "parallel")]
    fn root_values<S: GameState>(
        &self,
        children: &[S],
        depth: usize,
        _maximizing: bool,
    ) -> (Vec<f64>, SearchStatistics) {
        use rayon::prelude::*;

        let results: Vec<(f64, SearchStatistics)> = children
            .par_iter()
            .map(|child| {
                let mut search = Search::new(&self.config);
                let value = search.value(child, depth, f64::NEG_INFINITY, f64::INFINITY);
                (value, search.statistics)
            })
            .collect();

        let mut statistics = SearchStatistics::new();
        let values = results
            .into_iter()
            .map(|(value, worker)| {
                statistics.merge(&worker);
                value
            })
            .collect();
        (values, statistics)
    }
}

/// True if `candidate` is strictly better than `best` for the side to move
fn improves(maximizing: bool, candidate: f64, best: f64) -> bool {
    if maximizing {
        candidate > best
    } else {
        candidate < best
    }
}

/// State of one recursive search
struct Search {
    heuristic: Heuristic,
    pruning: bool,
    cache: Option<HashMap<(String, usize), f64>>,
    statistics: SearchStatistics,
}

impl Search {
    fn new(config: &MinimaxConfig) -> Self {
        Search {
            heuristic: config.heuristic,
            pruning: config.pruning,
            cache: config.transpositions.then(HashMap::new),
            statistics: SearchStatistics::new(),
        }
    }

    /// Fail-soft alpha-beta. With pruning disabled the window is ignored and
    /// every value is exact.
    fn value<S: GameState>(&mut self, state: &S, depth: usize, alpha: f64, beta: f64) -> f64 {
        self.statistics.nodes_evaluated += 1;

        if depth == 0 {
            return state.evaluate_position(self.heuristic);
        }
        let children = state.legal_moves();
        if children.is_empty() {
            return state.evaluate_position(self.heuristic);
        }

        let cache_key = self.cache.as_ref().map(|_| (state.key(), depth));
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(&value) = cache.get(key) {
                self.statistics.cache_hits += 1;
                return value;
            }
        }

        let maximizing = state.to_move() == Side::A;
        let (mut alpha, mut beta) = (alpha, beta);
        let (alpha_in, beta_in) = (alpha, beta);
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for child in &children {
            let value = self.value(child, depth - 1, alpha, beta);
            if improves(maximizing, value, best) {
                best = value;
            }
            if self.pruning {
                if maximizing {
                    alpha = alpha.max(best);
                } else {
                    beta = beta.min(best);
                }
                if alpha >= beta {
                    self.statistics.cutoffs += 1;
                    break;
                }
            }
        }

        // Only values strictly inside the incoming window are exact
        let exact = !self.pruning || (best > alpha_in && best < beta_in);
        if let (Some(cache), Some(key), true) = (&mut self.cache, cache_key, exact) {
            cache.insert(key, best);
        }

        best
    }
}
