//! Grid storage shared by the board-game variants
//!
//! A [`Board`] is a flat, row-major buffer of [`Cell`]s. Cloning a board is a
//! single allocation and copy, so branching a search never aliases a sibling's
//! cells.

use std::fmt;

use crate::{GameError, Result};

/// One of the two sides in a game. `A` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the other side
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Returns the cell value this side places
    pub fn cell(self) -> Cell {
        match self {
            Side::A => Cell::A,
            Side::B => Cell::B,
        }
    }

    /// Single-character tag used in canonical keys
    pub fn symbol(self) -> char {
        self.cell().symbol()
    }

    /// Parses a side from its canonical tag
    pub fn from_symbol(symbol: char) -> Option<Side> {
        match Cell::from_symbol(symbol)? {
            Cell::A => Some(Side::A),
            Cell::B => Some(Side::B),
            Cell::Empty => None,
        }
    }
}

/// Content of a single board square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    A,
    B,
}

impl Cell {
    /// Canonical symbol for rendering and keys
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::A => 'X',
            Cell::B => 'O',
        }
    }

    /// Inverse of [`Cell::symbol`]
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Empty),
            'X' => Some(Cell::A),
            'O' => Some(Cell::B),
            _ => None,
        }
    }

    /// Returns the owning side, or `None` for an empty cell
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::A => Some(Side::A),
            Cell::B => Some(Side::B),
        }
    }

    /// Numeric value used by [`Board::vector_representation`]
    pub fn value(self) -> f32 {
        match self {
            Cell::Empty => 0.0,
            Cell::A => 1.0,
            Cell::B => -1.0,
        }
    }
}

/// A rectangular grid of cells stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::MalformedState(format!(
                "board dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        Ok(Board::blank(rows, cols))
    }

    /// Empty board for dimensions already known to be positive
    pub(crate) fn blank(rows: usize, cols: usize) -> Self {
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Builds a board from row-major cells, rejecting a buffer of the wrong size
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Self> {
        let board = Board::new(rows, cols)?;
        if cells.len() != rows * cols {
            return Err(GameError::MalformedState(format!(
                "expected {} cells for a {}x{} board, got {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(Board { cells, ..board })
    }

    /// Parses rows of canonical symbols separated by `/`, e.g. `"X.O/.X./..O"`
    pub fn parse_rows(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.split('/').collect();
        let cols = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(rows.len() * cols);

        for (r, row) in rows.iter().enumerate() {
            if row.chars().count() != cols {
                return Err(GameError::MalformedState(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.chars().count(),
                    cols
                )));
            }
            for symbol in row.chars() {
                let cell = Cell::from_symbol(symbol).ok_or_else(|| {
                    GameError::MalformedState(format!("invalid cell symbol {:?}", symbol))
                })?;
                cells.push(cell);
            }
        }

        Board::from_cells(rows.len(), cols, cells)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts a (row, column) pair to a flat index
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Returns the cell at (row, column), or `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// Overwrites the cell at a flat index
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the board.
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Returns true when no cell is empty
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Flattened board values: A = 1, B = -1, empty = 0
    pub fn vector_representation(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.value()).collect()
    }

    /// Checks that the piece counts are consistent with `to_move`, A moving first
    pub fn validate_turn(&self, to_move: Side) -> Result<()> {
        let a = self.count(Cell::A);
        let b = self.count(Cell::B);
        let expected = if a == b {
            Side::A
        } else if a == b + 1 {
            Side::B
        } else {
            return Err(GameError::MalformedState(format!(
                "impossible piece counts: {} for A, {} for B",
                a, b
            )));
        };
        if expected != to_move {
            return Err(GameError::MalformedState(format!(
                "turn flag says {:?} to move but piece counts imply {:?}",
                to_move, expected
            )));
        }
        Ok(())
    }

    /// Straight windows of `length` cells (rows, columns and both diagonals),
    /// each given as its first index and the flat stride between cells
    fn windows(&self, length: usize) -> impl Iterator<Item = (usize, isize)> + '_ {
        static DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        let span = length as isize - 1;
        let (rows, cols) = (self.rows as isize, self.cols as isize);

        (0..rows)
            .flat_map(move |row| (0..cols).map(move |col| (row, col)))
            .flat_map(move |(row, col)| {
                DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
                    let (end_row, end_col) = (row + dr * span, col + dc * span);
                    let inside = length > 0
                        && (0..rows).contains(&end_row)
                        && (0..cols).contains(&end_col);
                    inside.then(|| ((row * cols + col) as usize, dr * cols + dc))
                })
            })
    }

    /// Every straight window of `length` cells as lists of flat indices
    pub fn line_windows(&self, length: usize) -> Vec<Vec<usize>> {
        self.windows(length)
            .map(|(start, stride)| {
                (0..length as isize)
                    .map(|step| (start as isize + stride * step) as usize)
                    .collect()
            })
            .collect()
    }

    fn window_cells(
        &self,
        start: usize,
        stride: isize,
        length: usize,
    ) -> impl Iterator<Item = Cell> + '_ {
        (0..length as isize).map(move |step| self.cells[(start as isize + stride * step) as usize])
    }

    /// Returns the side owning a complete line of `length`, if any
    pub fn aligned(&self, length: usize) -> Option<Side> {
        self.windows(length).find_map(|(start, stride)| {
            let first = self.cells[start];
            let side = first.side()?;
            self.window_cells(start, stride, length)
                .all(|cell| cell == first)
                .then_some(side)
        })
    }

    /// True if `side` owns a complete line of `length`
    pub fn has_line(&self, side: Side, length: usize) -> bool {
        let cell = side.cell();
        self.windows(length)
            .any(|(start, stride)| self.window_cells(start, stride, length).all(|c| c == cell))
    }

    /// Rejects positions no game can reach once a line of `length` exists:
    /// both sides aligned, or a piece played after the winning move
    pub fn validate_lines(&self, length: usize) -> Result<()> {
        let a = self.count(Cell::A);
        let b = self.count(Cell::B);
        match (self.has_line(Side::A, length), self.has_line(Side::B, length)) {
            (true, true) => Err(GameError::MalformedState(format!(
                "both sides have {} in a row",
                length
            ))),
            (true, false) if a != b + 1 => Err(GameError::MalformedState(format!(
                "A has {} in a row but B moved afterwards",
                length
            ))),
            (false, true) if a != b => Err(GameError::MalformedState(format!(
                "B has {} in a row but A moved afterwards",
                length
            ))),
            _ => Ok(()),
        }
    }

    /// Open-window balance: windows holding only A pieces minus windows holding
    /// only B pieces, scaled into the open interval (-1, 1)
    pub fn open_line_balance(&self, length: usize) -> f64 {
        let mut balance = 0i64;
        let mut total = 0usize;

        for (start, stride) in self.windows(length) {
            total += 1;
            let mut owners = self.window_cells(start, stride, length).filter_map(Cell::side);
            if let Some(first) = owners.next() {
                if owners.all(|side| side == first) {
                    balance += if first == Side::A { 1 } else { -1 };
                }
            }
        }

        balance as f64 / (total as f64 + 1.0)
    }

    /// Row-major canonical text: one string per row joined by `/`
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.cells.len() + self.rows);
        for (r, row) in self.cells.chunks(self.cols).enumerate() {
            if r > 0 {
                key.push('/');
            }
            key.extend(row.iter().map(|c| c.symbol()));
        }
        key
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..self.cols {
            write!(f, "{} ", col)?;
        }
        writeln!(f)?;
        for (r, row) in self.cells.chunks(self.cols).enumerate() {
            write!(f, "{} ", r)?;
            for cell in row {
                write!(f, "{} ", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
