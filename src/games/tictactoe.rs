//! Tic-tac-toe generalised to an m×n board with k in a row to win.

use std::fmt;

use crate::{
    board::{Board, Cell, Side},
    game_state::{GameState, Heuristic, Outcome},
    GameError, Result,
};

const KEY_PREFIX: &str = "ttt";

/// A tic-tac-toe position. Moves are flat cell indices.
#[derive(Debug, Clone)]
pub struct TicTacToe {
    board: Board,
    win_length: usize,
    to_move: Side,
    previous_move: Option<usize>,
}

impl TicTacToe {
    /// Empty classic 3×3 board, three in a row
    pub fn new() -> Self {
        TicTacToe {
            board: Board::blank(3, 3),
            win_length: 3,
            to_move: Side::A,
            previous_move: None,
        }
    }

    /// Empty board of the given size
    pub fn with_size(rows: usize, cols: usize, win_length: usize) -> Result<Self> {
        let board = Board::new(rows, cols)?;
        check_win_length(&board, win_length)?;
        Ok(TicTacToe {
            board,
            win_length,
            to_move: Side::A,
            previous_move: None,
        })
    }

    /// Builds a position from raw board data.
    ///
    /// Rejects boards whose piece counts contradict `to_move` and boards no
    /// game can reach, such as both sides holding a line.
    pub fn from_board(board: Board, win_length: usize, to_move: Side) -> Result<Self> {
        check_win_length(&board, win_length)?;
        board.validate_turn(to_move)?;
        board.validate_lines(win_length)?;

        Ok(TicTacToe {
            board,
            win_length,
            to_move,
            previous_move: None,
        })
    }

    /// Parses a canonical key produced by [`GameState::key`]
    pub fn from_key(key: &str) -> Result<Self> {
        let malformed = || GameError::MalformedState(format!("bad tic-tac-toe key {:?}", key));

        let mut parts = key.splitn(4, ':');
        if parts.next() != Some(KEY_PREFIX) {
            return Err(malformed());
        }
        let win_length = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(malformed)?;
        let to_move = parts
            .next()
            .and_then(|s| s.chars().next())
            .and_then(Side::from_symbol)
            .ok_or_else(malformed)?;
        let board = Board::parse_rows(parts.next().ok_or_else(malformed)?)?;

        TicTacToe::from_board(board, win_length, to_move)
    }

    /// Number of pieces in a row needed to win
    pub fn win_length(&self) -> usize {
        self.win_length
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

fn check_win_length(board: &Board, win_length: usize) -> Result<()> {
    if win_length == 0 || win_length > board.rows().max(board.cols()) {
        return Err(GameError::InvalidConfiguration(format!(
            "win length {} does not fit a {}x{} board",
            win_length,
            board.rows(),
            board.cols()
        )));
    }
    Ok(())
}

impl PartialEq for TicTacToe {
    fn eq(&self, other: &Self) -> bool {
        self.win_length == other.win_length
            && self.to_move == other.to_move
            && self.board == other.board
    }
}

impl GameState for TicTacToe {
    type Move = usize;

    fn available_moves(&self) -> Vec<usize> {
        if self.winner().is_decided() {
            return Vec::new();
        }
        self.board
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    fn is_legal(&self, mv: &usize) -> bool {
        self.board.cells().get(*mv) == Some(&Cell::Empty) && !self.winner().is_decided()
    }

    fn make_move_unchecked(&mut self, mv: &usize) {
        debug_assert!(self.is_legal(mv), "illegal move {} on {}", mv, self.key());
        self.board.set(*mv, self.to_move.cell());
        self.to_move = self.to_move.opponent();
        self.previous_move = Some(*mv);
    }

    fn to_move(&self) -> Side {
        self.to_move
    }

    fn previous_move(&self) -> Option<usize> {
        self.previous_move
    }

    fn winner(&self) -> Outcome {
        if let Some(side) = self.board.aligned(self.win_length) {
            Outcome::win_for(side)
        } else if self.board.is_full() {
            Outcome::Draw
        } else {
            Outcome::Undetermined
        }
    }

    fn evaluate_position(&self, heuristic: Heuristic) -> f64 {
        match self.winner() {
            Outcome::AWins => 1.0,
            Outcome::BWins => -1.0,
            Outcome::Draw => 0.0,
            Outcome::Undetermined => match heuristic {
                Heuristic::Outcome => 0.0,
                Heuristic::OpenLines => self.board.open_line_balance(self.win_length),
            },
        }
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            KEY_PREFIX,
            self.win_length,
            self.to_move.symbol(),
            self.board.key()
        )
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.winner() {
            Outcome::Undetermined => writeln!(f, "{} to move", self.to_move.symbol()),
            outcome => writeln!(f, "Game over: {}", outcome),
        }
    }
}
