//! # boardplay
//!
//! A framework for two-player, perfect-information, turn-based board games,
//! with engines that choose moves: a uniform random player, depth-bounded
//! minimax with alpha-beta pruning, and Monte Carlo Tree Search.
//!
//! ## Features
//!
//! - One [`GameState`] contract implemented by interchangeable rule sets
//!   ([`TicTacToe`], [`ConnectFour`])
//! - Deterministic minimax: alpha-beta never changes the chosen move
//! - MCTS over an arena tree with pluggable selection, simulation and
//!   backpropagation policies
//! - Injected random sources, so every engine is reproducible under a seed
//! - A [`GameController`] that alternates players and records the history
//!
//! ## Basic Usage
//!
//! ```
//! use boardplay::{
//!     GameController, GameState, MinimaxConfig, MinimaxPlayer, Outcome, RandomPlayer, TicTacToe,
//! };
//!
//! let controller = GameController::new(
//!     TicTacToe::new(),
//!     Box::new(MinimaxPlayer::new(MinimaxConfig::default().with_depth(9))),
//!     Box::new(RandomPlayer::seeded(42)),
//! );
//!
//! let record = controller.play().unwrap();
//! assert_ne!(record.outcome, Outcome::BWins);
//! assert!(record.history.last().unwrap().is_terminal());
//! ```
//!
//! ## Searching a position directly
//!
//! ```
//! use boardplay::{GameState, MCTS, MCTSConfig, TicTacToe};
//!
//! // X to move completes the main diagonal
//! let state = TicTacToe::from_key("ttt:3:X:XO./.X./O..").unwrap();
//! let config = MCTSConfig::default().with_max_iterations(2_000).with_seed(1);
//!
//! let mut mcts = MCTS::new(state, config);
//! let next = mcts.search().unwrap();
//! assert_eq!(next.previous_move(), Some(8));
//! println!("{}", mcts.get_statistics().summary());
//! ```
//!
//! ## How MCTS Works
//!
//! 1. **Selection**: descend from the root through fully expanded nodes with
//!    a selection policy (UCB1 by default).
//! 2. **Expansion**: add the next unexplored successor as a child.
//! 3. **Simulation**: play the game out from the new node (uniformly random
//!    moves by default).
//! 4. **Backpropagation**: credit the result to every node on the path, each
//!    from the perspective of the side that moved into it.
//!
//! After the budget is spent the most visited child of the root is played.

pub mod board;
pub mod config;
pub mod controller;
pub mod game_state;
pub mod games;
pub mod mcts;
pub mod minimax;
pub mod player;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use board::{Board, Cell, Side};
pub use config::{MCTSConfig, MinimaxConfig, Settings};
pub use controller::{GameController, GameRecord, History, Replay};
pub use game_state::{GameState, Heuristic, Move, Outcome};
pub use games::{ConnectFour, TicTacToe};
pub use mcts::MCTS;
pub use minimax::{Minimax, MinimaxDecision};
pub use player::{HumanPlayer, MCTSPlayer, MinimaxPlayer, MoveSource, Player, RandomPlayer};
pub use policy::{BackpropagationPolicy, SelectionPolicy, SimulationPolicy};
pub use stats::SearchStatistics;
pub use tree::{MCTSNode, NodeId, SearchTree};

/// Error types for games and engines
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// A move that the rules forbid, or an engine returning a state that is
    /// not a legal successor
    #[error("{engine}: illegal move {mv} in state {key}")]
    IllegalMove {
        engine: String,
        key: String,
        mv: String,
    },

    /// A move was requested on a finished game
    #[error("{engine}: no legal moves in terminal state {key}")]
    TerminalState { engine: String, key: String },

    /// Board data that no legal game can reach
    #[error("Malformed state: {0}")]
    MalformedState(String),

    /// The move source closed before supplying a move
    #[error("{engine}: move input cancelled")]
    Cancelled { engine: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for game and engine operations
pub type Result<T> = std::result::Result<T, GameError>;
