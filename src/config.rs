//! Engine and match settings
//!
//! [`Settings`] carries every tunable of a match and derives the per-engine
//! [`MCTSConfig`] and [`MinimaxConfig`] from them.

use std::time::Duration;

use rand_chacha::ChaCha8Rng;

use crate::{
    game_state::Heuristic,
    games::{ConnectFour, TicTacToe},
    utils, GameError, Result,
};

/// How MCTS turns root statistics into a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Robust child: the most visited root child
    MostVisits,

    /// The root child with the best mean reward
    HighestValue,
}

/// MCTS budgets and tuning
///
/// ```
/// use boardplay::{MCTSConfig, config::BestChildCriteria};
/// use std::time::Duration;
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_max_iterations(10_000)
///     .with_max_time(Duration::from_secs(5))
///     .with_seed(7)
///     .with_best_child_criteria(BestChildCriteria::MostVisits);
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// UCB1 exploration weight, `sqrt(2)` by default
    pub exploration_constant: f64,

    /// Iteration budget for one search
    pub max_iterations: usize,

    /// Wall-clock bound for one search, checked between iterations
    pub max_time: Option<Duration>,

    /// Final move choice
    pub best_child_criteria: BestChildCriteria,

    /// Seed for the playout random source; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: 1.414,
            max_iterations: 10_000,
            max_time: None,
            best_child_criteria: BestChildCriteria::MostVisits,
            seed: None,
        }
    }
}

impl MCTSConfig {
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Bounds each search by wall-clock time as well as iterations
    pub fn with_max_time(mut self, duration: Duration) -> Self {
        self.max_time = Some(duration);
        self
    }

    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Fixes the playout random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects budgets and constants the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GameError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(GameError::InvalidConfiguration(format!(
                "exploration constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}

/// Configuration for the minimax engine
///
/// ```
/// use boardplay::{Heuristic, MinimaxConfig};
///
/// let config = MinimaxConfig::default()
///     .with_depth(6)
///     .with_heuristic(Heuristic::OpenLines)
///     .with_pruning(true);
/// assert_eq!(config.depth, 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxConfig {
    /// Plies to search before the static heuristic substitutes for expansion
    pub depth: usize,

    /// Static evaluation applied at the depth bound
    pub heuristic: Heuristic,

    /// Use alpha-beta pruning. Never changes the selected move.
    pub pruning: bool,

    /// Cache exact subtree values by canonical key and remaining depth
    pub transpositions: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            depth: 4,
            heuristic: Heuristic::Outcome,
            pruning: true,
            transpositions: false,
        }
    }
}

impl MinimaxConfig {
    /// Sets the search depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the static evaluation heuristic
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Enables or disables alpha-beta pruning
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Enables or disables the transposition cache
    pub fn with_transpositions(mut self, transpositions: bool) -> Self {
        self.transpositions = transpositions;
        self
    }
}

/// The full set of tunables for a match: engine budgets, heuristic, board
/// geometry and the random seed
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Minimax search depth
    pub depth: usize,
    /// MCTS iteration budget
    pub iterations: usize,
    /// Static evaluation heuristic
    pub heuristic: Heuristic,
    /// Board rows
    pub board_rows: usize,
    /// Board columns
    pub board_cols: usize,
    /// Pieces in a row needed to win
    pub win_length: usize,
    /// Random seed shared by the stochastic engines
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            depth: 9,
            iterations: 10_000,
            heuristic: Heuristic::Outcome,
            board_rows: 3,
            board_cols: 3,
            win_length: 3,
            seed: None,
        }
    }
}

impl Settings {
    /// Defaults for standard Connect Four
    pub fn connect_four() -> Self {
        Settings {
            depth: 5,
            heuristic: Heuristic::OpenLines,
            board_rows: 6,
            board_cols: 7,
            win_length: 4,
            ..Settings::default()
        }
    }

    /// Sets the board geometry
    pub fn with_board(mut self, rows: usize, cols: usize, win_length: usize) -> Self {
        self.board_rows = rows;
        self.board_cols = cols;
        self.win_length = win_length;
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every tunable
    pub fn validate(&self) -> Result<()> {
        if self.board_rows == 0 || self.board_cols == 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "board dimension {}x{} must be positive",
                self.board_rows, self.board_cols
            )));
        }
        if self.win_length == 0 || self.win_length > self.board_rows.max(self.board_cols) {
            return Err(GameError::InvalidConfiguration(format!(
                "win length {} does not fit a {}x{} board",
                self.win_length, self.board_rows, self.board_cols
            )));
        }
        self.mcts_config().validate()
    }

    /// Minimax configuration derived from these settings
    pub fn minimax_config(&self) -> MinimaxConfig {
        MinimaxConfig::default()
            .with_depth(self.depth)
            .with_heuristic(self.heuristic)
    }

    /// MCTS configuration derived from these settings
    pub fn mcts_config(&self) -> MCTSConfig {
        MCTSConfig {
            max_iterations: self.iterations,
            seed: self.seed,
            ..MCTSConfig::default()
        }
    }

    /// Random source for players and engines, fixed when a seed is configured
    pub fn rng(&self) -> ChaCha8Rng {
        utils::seeded_rng(self.seed)
    }

    /// Empty tic-tac-toe board with the configured geometry
    pub fn tictactoe(&self) -> Result<TicTacToe> {
        self.validate()?;
        TicTacToe::with_size(self.board_rows, self.board_cols, self.win_length)
    }

    /// Empty Connect Four board with the configured geometry
    pub fn connect_four_board(&self) -> Result<ConnectFour> {
        self.validate()?;
        ConnectFour::with_size(self.board_rows, self.board_cols, self.win_length)
    }
}
