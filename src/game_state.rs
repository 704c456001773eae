//! Traits defining the game state contract shared by every variant and engine.
//!
//! The [`GameState`] trait is the capability set every rule set provides. Search
//! engines only ever talk to a game through it, so variants are interchangeable
//! and selected at construction time.

use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::board::{Board, Side};
use crate::{GameError, Result};

/// Trait for move identifiers
///
/// Moves are plain identifiers (a cell index, a column). They carry no state of
/// their own; a move only has meaning relative to the state it is applied to.
pub trait Move: Clone + Debug + PartialEq + Send + Sync {
    /// Returns a unique identifier for this move
    fn id(&self) -> usize;
}

impl Move for usize {
    fn id(&self) -> usize {
        *self
    }
}

/// Terminal classification of a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    AWins,
    BWins,
    Draw,
    Undetermined,
}

impl Outcome {
    /// Outcome in which `side` has won
    pub fn win_for(side: Side) -> Outcome {
        match side {
            Side::A => Outcome::AWins,
            Side::B => Outcome::BWins,
        }
    }

    /// Returns the winning side, if any
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::AWins => Some(Side::A),
            Outcome::BWins => Some(Side::B),
            Outcome::Draw | Outcome::Undetermined => None,
        }
    }

    /// True for every outcome except [`Outcome::Undetermined`]
    pub fn is_decided(self) -> bool {
        self != Outcome::Undetermined
    }

    /// Score for side A in `[0, 1]`: win 1, draw 0.5, loss 0.
    ///
    /// An undetermined game scores as a draw.
    pub fn score(self) -> f64 {
        match self {
            Outcome::AWins => 1.0,
            Outcome::BWins => 0.0,
            Outcome::Draw | Outcome::Undetermined => 0.5,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AWins => write!(f, "A wins"),
            Outcome::BWins => write!(f, "B wins"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Identifier of a static evaluation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    /// +1 if A has won, -1 if B has won, 0 otherwise
    #[default]
    Outcome,
    /// Decided games score like [`Heuristic::Outcome`]; otherwise the balance
    /// of alignment windows still open for each side, strictly inside (-1, 1)
    OpenLines,
}

impl Heuristic {
    /// Numeric identifier of this heuristic
    pub fn id(self) -> u32 {
        match self {
            Heuristic::Outcome => 0,
            Heuristic::OpenLines => 1,
        }
    }
}

impl FromStr for Heuristic {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "outcome" => Ok(Heuristic::Outcome),
            "1" | "open-lines" | "open_lines" | "openlines" => Ok(Heuristic::OpenLines),
            other => Err(GameError::InvalidConfiguration(format!(
                "unknown heuristic {:?}",
                other
            ))),
        }
    }
}

/// Trait defining the game state interface required by every engine
///
/// A state is a snapshot: a grid of cells, the side to move and the move that
/// produced it. `Clone` is the deep copy; no two states ever share mutable
/// board storage. `PartialEq` is state equality and must agree with [`key`].
///
/// [`key`]: GameState::key
pub trait GameState: Clone + Debug + PartialEq + Send + Sync {
    /// The type of move identifiers in this game
    type Move: Move;

    /// Moves that are legal from this state, in a fixed enumeration order.
    ///
    /// Empty iff the state is terminal.
    fn available_moves(&self) -> Vec<Self::Move>;

    /// Returns true if `mv` may be played from this state
    fn is_legal(&self, mv: &Self::Move) -> bool;

    /// Applies a move the caller guarantees to be legal.
    ///
    /// Implementations may `debug_assert!` legality; in release builds an
    /// illegal move leaves the state unspecified.
    fn make_move_unchecked(&mut self, mv: &Self::Move);

    /// Side whose turn it is
    fn to_move(&self) -> Side;

    /// The move that produced this state, `None` for an initial state
    fn previous_move(&self) -> Option<Self::Move>;

    /// Terminal classification.
    ///
    /// [`Outcome::Undetermined`] iff [`available_moves`](GameState::available_moves)
    /// would be non-empty.
    fn winner(&self) -> Outcome;

    /// Static utility estimate from A's perspective: positive favors A,
    /// negative favors B, zero is neutral. Deterministic for a given state
    /// and heuristic.
    fn evaluate_position(&self, heuristic: Heuristic) -> f64;

    /// Grid used for rendering and feature extraction
    fn board(&self) -> &Board;

    /// Canonical string key, unique per distinct (board, side to move)
    fn key(&self) -> String;

    /// Applies a move after checking its legality.
    ///
    /// On failure the state is left unchanged.
    fn make_move(&mut self, mv: &Self::Move) -> Result<()> {
        if !self.is_legal(mv) {
            return Err(GameError::IllegalMove {
                engine: String::from("rules"),
                key: self.key(),
                mv: format!("{:?}", mv),
            });
        }
        self.make_move_unchecked(mv);
        Ok(())
    }

    /// Every state reachable by one legal move, in the order of
    /// [`available_moves`](GameState::available_moves). Each successor is an
    /// independent copy.
    fn legal_moves(&self) -> Vec<Self> {
        self.available_moves()
            .iter()
            .map(|mv| {
                let mut next = self.clone();
                next.make_move_unchecked(mv);
                next
            })
            .collect()
    }

    /// Returns true if the game is over
    fn is_terminal(&self) -> bool {
        self.winner().is_decided()
    }
}
