//! This crate is the engine behind a timed crossword game. It provides no UI itself,
//! but see `gridtui` for an example of how you can use it to produce a crossword app.
//!
//! A [Puzzle] is the immutable definition: a solution grid plus numbered Across and
//! Down clues. A [Session] holds everything that changes while somebody is solving:
//! their entries, the active cell, the current [Direction] and the [GameState].
//! Every operation takes both explicitly; there is no global state.

use Direction::{Across, Down};
use std::fmt::Debug;
use std::ops::Not;

mod puzzle;
mod sample;
mod session;

pub use puzzle::{Clue, Puzzle, PuzzleDef};
pub use sample::sample;
pub use session::{Completion, GameState, Session, SquareStyle};

/// The two crossword directions: `Across` and `Down`
#[derive(Debug, derive_more::Display, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Direction {
  Across,
  Down,
}

impl Direction {
  /// The (row, column) step taken when moving forward in this direction.
  fn delta(self) -> (isize, isize) {
    match self {
      Across => (0, 1),
      Down => (1, 0),
    }
  }
}

impl Not for Direction {
  type Output = Self;
  fn not(self) -> Self {
    match self {
      Across => Down,
      Down => Across,
    }
  }
}

/// A square in a crossword grid.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Square {
  /// A black square where nothing can be entered.
  Black,
  /// A square where a letter could be entered, but that is currently empty.
  Empty,
  /// A square with a letter written in it.
  Letter(char),
}

impl Square {
  /// Whether this is [Square::Black].
  pub fn is_black(&self) -> bool {
    *self == Self::Black
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::Empty
  }

  /// Whether this is not a black square, i.e. either a [Square::Empty] or [Square::Letter].
  pub fn is_white(&self) -> bool {
    !self.is_black()
  }

  /// The letter in this square, if there is one.
  pub fn letter(&self) -> Option<char> {
    match self {
      Self::Letter(c) => Some(*c),
      _ => None,
    }
  }

  /// Reads a square of a solution grid. `.` and `#` are black squares, and
  /// letters are stored uppercase.
  fn from_solution_char(ch: char) -> Option<Self> {
    match ch {
      '.' | '#' => Some(Self::Black),
      c if c.is_ascii_alphabetic() => Some(Self::Letter(c.to_ascii_uppercase())),
      _ => None,
    }
  }
}

impl Debug for Square {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Black => write!(f, "■"),
      Self::Empty => write!(f, " "),
      Self::Letter(c) => write!(f, "{}", c),
    }
  }
}

impl std::fmt::Display for Square {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", self)
  }
}

/// A position in a grid: (row, column)
pub type Pos = (usize, usize);

/// A grid of squares. Used to represent the solution of a puzzle, or the
/// entries of a partially-solved one.
#[derive(Clone, Eq, PartialEq)]
pub struct Grid(Vec<Vec<Square>>);

impl Grid {
  /// Create a solution grid from one string per row.
  fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, Error> {
    let mut grid = Vec::with_capacity(rows.len());

    for (row, line) in rows.iter().enumerate() {
      let squares = line
        .as_ref()
        .chars()
        .enumerate()
        .map(|(col, ch)| Square::from_solution_char(ch).ok_or(Error::InvalidSquare { row, col, ch }))
        .collect::<Result<Vec<Square>, Error>>()?;
      grid.push(squares);
    }

    let expected = match grid.first() {
      Some(first) if !first.is_empty() => first.len(),
      _ => return Err(Error::EmptyGrid),
    };
    if let Some((row, squares)) = grid.iter().enumerate().find(|(_, r)| r.len() != expected) {
      return Err(Error::RaggedGrid {
        row,
        expected,
        found: squares.len(),
      });
    }

    Ok(Self(grid))
  }

  /// A grid with the same black squares as `solution` and every other square empty.
  fn blank_like(solution: &Grid) -> Self {
    let mut grid = solution.clone();
    grid.clear();
    grid
  }

  /// Empties every white square.
  fn clear(&mut self) {
    for sq in self.0.iter_mut().flatten() {
      if sq.is_white() {
        *sq = Square::Empty;
      }
    }
  }

  /// The size of this grid, expressed as (width, height).
  fn size(&self) -> (usize, usize) {
    (self.width(), self.height())
  }

  /// The width of this grid.
  pub fn width(&self) -> usize {
    self.0[0].len()
  }

  /// The height of this grid.
  pub fn height(&self) -> usize {
    self.0.len()
  }

  /// An iterator over all the positions of this grid, from left to right and top to bottom.
  pub fn positions(&self) -> GridPosIter {
    GridPosIter::new(self.size())
  }

  /// Whether `pos` lies inside this grid.
  pub fn contains(&self, (row, col): Pos) -> bool {
    row < self.height() && col < self.width()
  }

  /// Returns the [Square] at the given [Pos]. Positions outside the grid read as
  /// [Square::Black].
  pub fn get(&self, (r, c): Pos) -> Square {
    self
      .0
      .get(r)
      .and_then(|row| row.get(c))
      .copied()
      .unwrap_or(Square::Black)
  }

  /// Writes `square` at `pos`. Positions outside the grid are ignored.
  fn set(&mut self, (r, c): Pos, square: Square) {
    if let Some(slot) = self.0.get_mut(r).and_then(|row| row.get_mut(c)) {
      *slot = square;
    }
  }

  /// Whether a letter can be entered at `pos`.
  pub fn is_fillable(&self, pos: Pos) -> bool {
    self.get(pos).is_white()
  }

  /// One step from `pos` by `(row_delta, col_delta)`, or `None` if that leaves the grid.
  fn offset(&self, (row, col): Pos, (row_delta, col_delta): (isize, isize)) -> Option<Pos> {
    let pos = (
      row.checked_add_signed(row_delta)?,
      col.checked_add_signed(col_delta)?,
    );
    self.contains(pos).then_some(pos)
  }

  /// Steps from `pos` by `delta` until reaching a white square. Returns `None` if the
  /// grid edge comes first. Never wraps around.
  fn next_fillable(&self, pos: Pos, delta: (isize, isize)) -> Option<Pos> {
    if delta == (0, 0) || !self.contains(pos) {
      return None;
    }

    let mut next = self.offset(pos, delta);
    while let Some(candidate) = next {
      if self.is_fillable(candidate) {
        return Some(candidate);
      }
      next = self.offset(candidate, delta);
    }
    None
  }

  /// The square to move to after writing a letter at `pos`: the next white square
  /// along `direction`, or when the edge comes first, the start of the next row (Across)
  /// or column (Down), wrapping past the last one.
  ///
  /// The wrapped candidate is checked once and not searched past, so `None` is
  /// returned if it is black.
  fn advance(&self, pos: Pos, direction: Direction) -> Option<Pos> {
    if let Some(next) = self.next_fillable(pos, direction.delta()) {
      return Some(next);
    }

    let (row, col) = pos;
    let wrapped = match direction {
      Across => ((row + 1) % self.height(), 0),
      Down => (0, (col + 1) % self.width()),
    };
    self.is_fillable(wrapped).then_some(wrapped)
  }

  /// Whether the given position is the start of an entry in `direction`: a white square
  /// with no white square before it. An entry may be a single square.
  fn starts(&self, pos: Pos, direction: Direction) -> bool {
    let (row_delta, col_delta) = direction.delta();
    let before = self.offset(pos, (-row_delta, -col_delta));

    self.is_fillable(pos) && !before.is_some_and(|p| self.is_fillable(p))
  }

  /// Determines the position of the start of the run of white squares in `direction`
  /// that contains `pos`. Returns `None` if `pos` is not a white square.
  fn run_start(&self, pos: Pos, direction: Direction) -> Option<Pos> {
    if !self.is_fillable(pos) {
      return None;
    }

    let (row_delta, col_delta) = direction.delta();
    let mut start = pos;
    while let Some(prev) = self.offset(start, (-row_delta, -col_delta)) {
      if !self.is_fillable(prev) {
        break;
      }
      start = prev;
    }
    Some(start)
  }

  /// All the positions of the run in `direction` that contains `pos`, in order.
  fn run(&self, pos: Pos, direction: Direction) -> Vec<Pos> {
    let Some(start) = self.run_start(pos, direction) else {
      return vec![];
    };

    let mut cells = vec![start];
    let mut current = start;
    while let Some(next) = self.offset(current, direction.delta()) {
      if !self.is_fillable(next) {
        break;
      }
      cells.push(next);
      current = next;
    }
    cells
  }
}

/// Iterator over all the positions in the grid.
pub struct GridPosIter {
  pos: (usize, usize),
  size: (usize, usize),
}

impl GridPosIter {
  fn new(size: (usize, usize)) -> Self {
    Self { pos: (0, 0), size }
  }
}

impl Iterator for GridPosIter {
  type Item = Pos;
  fn next(&mut self) -> Option<Self::Item> {
    let (width, height) = self.size;
    let (row, col) = self.pos;

    if row == height {
      return None;
    }

    if col == width - 1 {
      self.pos = (row + 1, 0);
    } else {
      self.pos = (row, col + 1);
    }

    Some((row, col))
  }
}

impl Debug for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in &self.0 {
      for sq in row {
        write!(f, "{}", sq)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

impl std::fmt::Display for Grid {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "\n{:?}", self)
  }
}

/// The errors that may be produced by functions in this crate.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum Error {
  /// The grid has no rows, or its rows have no squares.
  #[display("puzzle grid is empty")]
  EmptyGrid,
  /// A row of the grid has a different width than the first row.
  #[display("row {row} has {found} squares, expected {expected}")]
  RaggedGrid {
    row: usize,
    expected: usize,
    found: usize,
  },
  /// A character in the grid is neither a letter nor a black square marker.
  #[display("invalid square {ch:?} at ({row}, {col})")]
  InvalidSquare { row: usize, col: usize, ch: char },
  /// A clue does not agree with the grid.
  #[display("clue {number} {direction}: {reason}")]
  InvalidClue {
    number: u8,
    direction: Direction,
    reason: String,
  },
  /// A word starts on a square that no clue numbers.
  #[display("no clue numbers ({row}, {col}), where a {direction} word starts")]
  MissingClue {
    row: usize,
    col: usize,
    direction: Direction,
  },
  /// A puzzle definition could not be deserialized.
  #[display("invalid puzzle definition: {_0}")]
  Json(#[error(source)] serde_json::Error),
  /// An [I/O error](std::io::Error) occurred.
  #[display("I/O error: {_0}")]
  Io(#[error(source)] std::io::Error),
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self::Io(e)
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Self::Json(e)
  }
}
