//! Players: anything that picks the next state of a game
//!
//! Automated players wrap one of the engines; [`HumanPlayer`] defers to an
//! external [`MoveSource`] and validates what it supplies.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{MCTSConfig, MinimaxConfig},
    game_state::GameState,
    mcts::MCTS,
    minimax::Minimax,
    utils, GameError, Result,
};

/// Trait for move selection
pub trait Player<S: GameState> {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Returns the chosen successor of `state`.
    ///
    /// Fails with [`GameError::TerminalState`] if the game is over.
    fn choose_move(&mut self, state: &S) -> Result<S>;

    /// Probability-weighted choice over the successors of `state`.
    ///
    /// The default puts all weight on [`choose_move`](Player::choose_move).
    fn move_distribution(&mut self, state: &S) -> Result<Vec<(S, f64)>> {
        let chosen = self.choose_move(state)?;
        Ok(state
            .legal_moves()
            .into_iter()
            .map(|next| {
                let weight = if next == chosen { 1.0 } else { 0.0 };
                (next, weight)
            })
            .collect())
    }
}

/// Picks uniformly among the legal moves
pub struct RandomPlayer<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl RandomPlayer<ChaCha8Rng> {
    /// Random player with a reproducible stream
    pub fn seeded(seed: u64) -> Self {
        RandomPlayer {
            rng: utils::seeded_rng(Some(seed)),
        }
    }
}

impl<R: Rng> RandomPlayer<R> {
    /// Random player drawing from `rng`
    pub fn new(rng: R) -> Self {
        RandomPlayer { rng }
    }
}

impl<S: GameState, R: Rng> Player<S> for RandomPlayer<R> {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, state: &S) -> Result<S> {
        state
            .legal_moves()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| GameError::TerminalState {
                engine: "random".to_string(),
                key: state.key(),
            })
    }

    fn move_distribution(&mut self, state: &S) -> Result<Vec<(S, f64)>> {
        let successors = state.legal_moves();
        if successors.is_empty() {
            return Err(GameError::TerminalState {
                engine: "random".to_string(),
                key: state.key(),
            });
        }
        let weight = 1.0 / successors.len() as f64;
        Ok(successors.into_iter().map(|next| (next, weight)).collect())
    }
}

/// Plays the minimax-optimal move at a fixed depth
#[derive(Debug, Clone, Default)]
pub struct MinimaxPlayer {
    engine: Minimax,
}

impl MinimaxPlayer {
    /// Creates a minimax player
    pub fn new(config: MinimaxConfig) -> Self {
        MinimaxPlayer {
            engine: Minimax::new(config),
        }
    }
}

impl<S: GameState> Player<S> for MinimaxPlayer {
    fn name(&self) -> &str {
        "minimax"
    }

    fn choose_move(&mut self, state: &S) -> Result<S> {
        self.engine.choose_move(state)
    }
}

/// Runs a fresh Monte Carlo tree search for every move
pub struct MCTSPlayer<R: RngCore = ChaCha8Rng> {
    config: MCTSConfig,
    rng: R,
}

impl MCTSPlayer<ChaCha8Rng> {
    /// Creates an MCTS player seeded from `config.seed`
    pub fn new(config: MCTSConfig) -> Self {
        let rng = utils::seeded_rng(config.seed);
        MCTSPlayer { config, rng }
    }
}

impl<R: RngCore> MCTSPlayer<R> {
    /// Creates an MCTS player drawing randomness from `rng`
    pub fn with_rng(config: MCTSConfig, rng: R) -> Self {
        MCTSPlayer { config, rng }
    }
}

impl<S: GameState + 'static, R: RngCore> Player<S> for MCTSPlayer<R> {
    fn name(&self) -> &str {
        "mcts"
    }

    fn choose_move(&mut self, state: &S) -> Result<S> {
        let mut mcts = MCTS::with_rng(state.clone(), self.config.clone(), &mut self.rng);
        mcts.search()
    }

    fn move_distribution(&mut self, state: &S) -> Result<Vec<(S, f64)>> {
        let mut mcts = MCTS::with_rng(state.clone(), self.config.clone(), &mut self.rng);
        mcts.search()?;
        Ok(mcts.move_distribution())
    }
}

/// External supplier of human moves
pub trait MoveSource<S: GameState> {
    /// Returns the move to play, or `None` when the session is closed
    fn request_move(&mut self, state: &S, legal: &[S]) -> Option<S::Move>;

    /// Called when a supplied move was rejected; the move is then requested again
    fn report_illegal(&mut self, _mv: &S::Move, _error: &GameError) {}
}

impl<S, F> MoveSource<S> for F
where
    S: GameState,
    F: FnMut(&S, &[S]) -> Option<S::Move>,
{
    fn request_move(&mut self, state: &S, legal: &[S]) -> Option<S::Move> {
        self(state, legal)
    }
}

/// A player whose moves come from a [`MoveSource`]
pub struct HumanPlayer<I> {
    name: String,
    source: I,
}

impl<I> HumanPlayer<I> {
    /// Creates a human player reading moves from `source`
    pub fn new(name: impl Into<String>, source: I) -> Self {
        HumanPlayer {
            name: name.into(),
            source,
        }
    }

    /// The underlying move source
    pub fn source(&self) -> &I {
        &self.source
    }
}

impl<S: GameState, I: MoveSource<S>> Player<S> for HumanPlayer<I> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, state: &S) -> Result<S> {
        let legal = state.legal_moves();
        if legal.is_empty() {
            return Err(GameError::TerminalState {
                engine: self.name.clone(),
                key: state.key(),
            });
        }

        loop {
            let mv = self
                .source
                .request_move(state, &legal)
                .ok_or_else(|| GameError::Cancelled {
                    engine: self.name.clone(),
                })?;

            let mut next = state.clone();
            match next.make_move(&mv) {
                Ok(()) => {
                    debug!("{} played {:?}", self.name, mv);
                    return Ok(next);
                }
                Err(error) => {
                    warn!("{} submitted an illegal move: {}", self.name, error);
                    self.source.report_illegal(&mv, &error);
                }
            }
        }
    }
}
