//! Turn-by-turn orchestration of a game between two players
//!
//! The controller asks the player whose turn it is for a successor, checks
//! that the successor is one of the legal ones, and appends it to the
//! history until the game is decided.

use std::ops::Index;

use log::{debug, info};

use crate::{
    board::Side,
    game_state::{GameState, Outcome},
    player::Player,
    GameError, Result,
};

/// Runs one game from an initial state to its end
pub struct GameController<S: GameState> {
    player_a: Box<dyn Player<S>>,
    player_b: Box<dyn Player<S>>,
    history: Vec<S>,
}

impl<S: GameState> GameController<S> {
    /// Creates a controller. `player_a` moves whenever side A is to move.
    pub fn new(
        initial: S,
        player_a: Box<dyn Player<S>>,
        player_b: Box<dyn Player<S>>,
    ) -> Self {
        GameController {
            player_a,
            player_b,
            history: vec![initial],
        }
    }

    /// The latest state
    pub fn current(&self) -> &S {
        // The history always holds at least the initial state
        &self.history[self.history.len() - 1]
    }

    /// States so far, starting with the initial state
    pub fn history(&self) -> &[S] {
        &self.history
    }

    /// Classification of the current state
    pub fn outcome(&self) -> Outcome {
        self.current().winner()
    }

    /// Plays one move. Returns the outcome after the move.
    ///
    /// Calling this on a finished game is a
    /// [`TerminalState`](GameError::TerminalState) error.
    pub fn step(&mut self) -> Result<Outcome> {
        let state = self.current().clone();
        let player = match state.to_move() {
            Side::A => &mut self.player_a,
            Side::B => &mut self.player_b,
        };

        let legal = state.legal_moves();
        if legal.is_empty() {
            return Err(GameError::TerminalState {
                engine: player.name().to_string(),
                key: state.key(),
            });
        }

        let next = player.choose_move(&state)?;
        if !legal.contains(&next) {
            return Err(GameError::IllegalMove {
                engine: player.name().to_string(),
                key: state.key(),
                mv: format!("{:?}", next.previous_move()),
            });
        }

        debug!(
            "{} ({:?}) played {:?}",
            player.name(),
            state.to_move(),
            next.previous_move()
        );

        self.history.push(next);
        Ok(self.outcome())
    }

    /// Plays until the game is decided and returns the record
    pub fn play(mut self) -> Result<GameRecord<S>> {
        info!(
            "starting game: {} (A) vs {} (B)",
            self.player_a.name(),
            self.player_b.name()
        );

        let mut outcome = self.outcome();
        while !outcome.is_decided() {
            outcome = self.step()?;
        }

        info!("game over after {} moves: {}", self.history.len() - 1, outcome);

        Ok(GameRecord {
            history: History {
                states: self.history,
            },
            outcome,
        })
    }
}

/// The result of one controller run
#[derive(Debug, Clone)]
pub struct GameRecord<S> {
    /// Every state of the game, initial state first
    pub history: History<S>,
    /// Terminal classification of the last state
    pub outcome: Outcome,
}

/// Finished, ordered sequence of game states
#[derive(Debug, Clone, PartialEq)]
pub struct History<S> {
    states: Vec<S>,
}

impl<S> History<S> {
    /// Number of states, including the initial one
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True if the history holds no states
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State at `index`, if any
    pub fn get(&self, index: usize) -> Option<&S> {
        self.states.get(index)
    }

    /// First state
    pub fn first(&self) -> Option<&S> {
        self.states.first()
    }

    /// Final state
    pub fn last(&self) -> Option<&S> {
        self.states.last()
    }

    /// Iterates over the states in play order
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.states.iter()
    }

    /// All states as a slice
    pub fn as_slice(&self) -> &[S] {
        &self.states
    }

    /// A cursor positioned at the initial state
    pub fn replay(&self) -> Replay<'_, S> {
        Replay {
            states: &self.states,
            position: 0,
        }
    }
}

impl<S> Index<usize> for History<S> {
    type Output = S;

    fn index(&self, index: usize) -> &S {
        &self.states[index]
    }
}

impl<'a, S> IntoIterator for &'a History<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

/// Step-forward/step-back navigation over a history
#[derive(Debug, Clone)]
pub struct Replay<'a, S> {
    states: &'a [S],
    position: usize,
}

impl<'a, S> Replay<'a, S> {
    /// Index of the current state
    pub fn position(&self) -> usize {
        self.position
    }

    /// The state under the cursor
    pub fn current(&self) -> Option<&'a S> {
        self.states.get(self.position)
    }

    /// Moves one state forward, stopping at the last one
    pub fn forward(&mut self) -> Option<&'a S> {
        if self.position + 1 < self.states.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Moves one state back, stopping at the first one
    pub fn back(&mut self) -> Option<&'a S> {
        self.position = self.position.saturating_sub(1);
        self.current()
    }

    /// Jumps to `position`, clamped to the history
    pub fn seek(&mut self, position: usize) -> Option<&'a S> {
        self.position = position.min(self.states.len().saturating_sub(1));
        self.current()
    }
}
