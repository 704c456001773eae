//! Connect Four: pieces drop to the lowest empty row of a column.
//!
//! Row 0 is the top of the board. A game is won by `connect` pieces in a row
//! horizontally, vertically or diagonally; a full board with no such line is
//! a draw.

use std::fmt;

use crate::{
    board::{Board, Cell, Side},
    game_state::{GameState, Heuristic, Outcome},
    GameError, Result,
};

const KEY_PREFIX: &str = "c4";

/// A Connect Four position. Moves are column indices.
#[derive(Debug, Clone)]
pub struct ConnectFour {
    board: Board,
    connect: usize,
    to_move: Side,
    previous_move: Option<usize>,
}

impl ConnectFour {
    /// Standard empty board: 6 rows, 7 columns, four in a row
    pub fn new() -> Self {
        ConnectFour {
            board: Board::blank(6, 7),
            connect: 4,
            to_move: Side::A,
            previous_move: None,
        }
    }

    /// Empty board of the given size
    pub fn with_size(rows: usize, cols: usize, connect: usize) -> Result<Self> {
        let board = Board::new(rows, cols)?;
        check_connect(&board, connect)?;
        Ok(ConnectFour {
            board,
            connect,
            to_move: Side::A,
            previous_move: None,
        })
    }

    /// Builds a position from raw board data, rejecting floating pieces,
    /// inconsistent turn flags and play continuing after a win
    pub fn from_board(board: Board, connect: usize, to_move: Side) -> Result<Self> {
        check_connect(&board, connect)?;
        board.validate_turn(to_move)?;
        board.validate_lines(connect)?;

        for col in 0..board.cols() {
            let mut seen_piece = false;
            for row in 0..board.rows() {
                match board.get(row, col) {
                    Some(Cell::Empty) if seen_piece => {
                        return Err(GameError::MalformedState(format!(
                            "floating piece above empty cell ({}, {})",
                            row, col
                        )));
                    }
                    Some(Cell::Empty) | None => {}
                    Some(_) => seen_piece = true,
                }
            }
        }

        Ok(ConnectFour {
            board,
            connect,
            to_move,
            previous_move: None,
        })
    }

    /// Parses a canonical key produced by [`GameState::key`]
    pub fn from_key(key: &str) -> Result<Self> {
        let malformed = || GameError::MalformedState(format!("bad connect-four key {:?}", key));

        let mut parts = key.splitn(4, ':');
        if parts.next() != Some(KEY_PREFIX) {
            return Err(malformed());
        }
        let connect = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(malformed)?;
        let to_move = parts
            .next()
            .and_then(|s| s.chars().next())
            .and_then(Side::from_symbol)
            .ok_or_else(malformed)?;
        let board = Board::parse_rows(parts.next().ok_or_else(malformed)?)?;

        ConnectFour::from_board(board, connect, to_move)
    }

    /// Number of pieces in a row needed to win
    pub fn connect(&self) -> usize {
        self.connect
    }

    /// Lowest empty row in `col`
    fn landing_row(&self, col: usize) -> Option<usize> {
        (0..self.board.rows())
            .rev()
            .find(|&row| self.board.get(row, col) == Some(Cell::Empty))
    }
}

impl Default for ConnectFour {
    fn default() -> Self {
        Self::new()
    }
}

fn check_connect(board: &Board, connect: usize) -> Result<()> {
    if connect == 0 || connect > board.rows().max(board.cols()) {
        return Err(GameError::InvalidConfiguration(format!(
            "cannot connect {} on a {}x{} board",
            connect,
            board.rows(),
            board.cols()
        )));
    }
    Ok(())
}

impl PartialEq for ConnectFour {
    fn eq(&self, other: &Self) -> bool {
        self.connect == other.connect && self.to_move == other.to_move && self.board == other.board
    }
}

impl GameState for ConnectFour {
    type Move = usize;

    fn available_moves(&self) -> Vec<usize> {
        if self.winner().is_decided() {
            return Vec::new();
        }
        (0..self.board.cols())
            .filter(|&col| self.board.get(0, col) == Some(Cell::Empty))
            .collect()
    }

    fn is_legal(&self, mv: &usize) -> bool {
        self.board.get(0, *mv) == Some(Cell::Empty) && !self.winner().is_decided()
    }

    fn make_move_unchecked(&mut self, mv: &usize) {
        debug_assert!(self.is_legal(mv), "illegal move {} on {}", mv, self.key());
        if let Some(row) = self.landing_row(*mv) {
            let index = self.board.index(row, *mv);
            self.board.set(index, self.to_move.cell());
        }
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
        if let Some(side) = self.board.aligned(self.connect) {
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
                Heuristic::OpenLines => self.board.open_line_balance(self.connect),
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
            self.connect,
            self.to_move.symbol(),
            self.board.key()
        )
    }
}

impl fmt::Display for ConnectFour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.winner() {
            Outcome::Undetermined => writeln!(f, "{} to move", self.to_move.symbol()),
            outcome => writeln!(f, "Game over: {}", outcome),
        }
    }
}
