use crate::Direction::{self, Across};
use crate::{Clue, Grid, Pos, Puzzle, Square};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Where a [Session] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
  NotStarted,
  InProgress,
  /// Every white square holds the right letter. Entries are frozen until [Session::reset].
  Completed,
}

/// Returned by the one [Session::enter_letter] call that completes the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
  /// Time from [Session::start] until the last correct letter was entered.
  pub elapsed: Duration,
}

/// Indicates how a particular square should look. For instance, [Standard](Self::Standard)
/// might map to white, [Cursor](Self::Cursor) to red, and [Word](Self::Word) to yellow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareStyle {
  /// Default styling
  Standard,
  /// The cursor is positioned on this square.
  Cursor,
  /// The cursor is not on this square, but the word indicated by the cursor includes this square.
  Word,
}

/// One attempt at solving a [Puzzle]: the letters entered so far, the active cell and
/// direction, and the [GameState].
///
/// A session does not keep a reference to its puzzle. Every method that needs it takes
/// it as a parameter, and it must be the same puzzle the session was created for.
#[derive(Debug)]
pub struct Session {
  answers: Grid,
  active_cell: Option<Pos>,
  direction: Direction,
  game_state: GameState,
  started_at: Option<Instant>,
  completed_in: Option<Duration>,
}

impl Session {
  /// Creates a session that has not started yet: no entries and no active cell.
  pub fn new(puzzle: &Puzzle) -> Self {
    Self {
      answers: Grid::blank_like(puzzle.solution()),
      active_cell: None,
      direction: Across,
      game_state: GameState::NotStarted,
      started_at: None,
      completed_in: None,
    }
  }

  /// Starts the game: clears all entries, puts the cursor on the first white square
  /// going Across, and starts the clock.
  pub fn start(&mut self, puzzle: &Puzzle) {
    let grid = puzzle.solution();
    self.answers = Grid::blank_like(grid);
    self.active_cell = grid.positions().find(|&pos| grid.is_fillable(pos));
    self.direction = Across;
    self.game_state = GameState::InProgress;
    self.started_at = Some(Instant::now());
    self.completed_in = None;
    debug!(title = puzzle.title(), active_cell = ?self.active_cell, "game started");
  }

  /// Empties every square and returns to [GameState::NotStarted]. Nothing else changes.
  pub fn reset(&mut self) {
    self.answers.clear();
    self.game_state = GameState::NotStarted;
    debug!("game reset");
  }

  pub fn game_state(&self) -> GameState {
    self.game_state
  }

  pub fn direction(&self) -> Direction {
    self.direction
  }

  /// The square receiving keyboard input, if any.
  pub fn active_cell(&self) -> Option<Pos> {
    self.active_cell
  }

  /// Returns a reference to the grid of entries.
  pub fn answers(&self) -> &Grid {
    &self.answers
  }

  /// The entry at `pos`.
  pub fn answer(&self, pos: Pos) -> Square {
    self.answers.get(pos)
  }

  /// Time spent on the current game. Stops when the puzzle is completed.
  pub fn elapsed(&self) -> Duration {
    match self.game_state {
      GameState::NotStarted => Duration::ZERO,
      GameState::InProgress => self.started_at.map(|t| t.elapsed()).unwrap_or_default(),
      GameState::Completed => self.completed_in.unwrap_or_default(),
    }
  }

  /// Returns the clue for the word containing the active cell, in the current direction.
  pub fn current_clue<'p>(&self, puzzle: &'p Puzzle) -> Option<&'p Clue> {
    let pos = self.active_cell?;
    puzzle.current_clue(pos, self.direction)
  }

  /// The squares of the word containing the active cell, in the current direction.
  pub fn active_word(&self, puzzle: &Puzzle) -> Vec<Pos> {
    match self.active_cell {
      Some(pos) => puzzle.cells_for_current_clue(pos, self.direction),
      None => vec![],
    }
  }

  /// Determines how a particular square should be styled.
  /// See [SquareStyle].
  pub fn square_style(&self, puzzle: &Puzzle, pos: Pos) -> SquareStyle {
    if Some(pos) == self.active_cell {
      SquareStyle::Cursor
    } else if self.active_word(puzzle).contains(&pos) {
      SquareStyle::Word
    } else {
      SquareStyle::Standard
    }
  }

  /// Whether the entry at `pos` is the letter the solution has there.
  pub fn is_correct(&self, puzzle: &Puzzle, pos: Pos) -> bool {
    let answer = self.answers.get(pos);
    answer.letter().is_some() && answer == puzzle.solution().get(pos)
  }

  /// Handles a click on `pos`: the active cell swaps direction, any other white square
  /// becomes active.
  pub fn select_cell(&mut self, puzzle: &Puzzle, pos: Pos) {
    if self.game_state != GameState::InProgress || !puzzle.is_fillable(pos) {
      return;
    }

    if self.active_cell == Some(pos) {
      self.toggle_direction();
    } else {
      self.active_cell = Some(pos);
    }
  }

  /// Moves the cursor from `pos` to the next white square in the given direction,
  /// skipping black squares. Nothing happens if the edge of the grid comes first.
  pub fn move_cursor(&mut self, puzzle: &Puzzle, pos: Pos, row_delta: isize, col_delta: isize) {
    if self.game_state != GameState::InProgress {
      return;
    }

    if let Some(next) = puzzle.solution().next_fillable(pos, (row_delta, col_delta)) {
      trace!(from = ?pos, to = ?next, "cursor moved");
      self.active_cell = Some(next);
    }
  }

  /// Writes `input` at `pos`. Letters are stored uppercase; anything else empties the
  /// square.
  ///
  /// After a letter, the cursor moves on in the current direction, jumping over black
  /// squares and wrapping to the next row or column at the edge of the grid. If the
  /// square it wraps to is black the cursor stays where it was.
  ///
  /// Returns the [Completion] if this entry completed the puzzle.
  pub fn enter_letter(&mut self, puzzle: &Puzzle, pos: Pos, input: char) -> Option<Completion> {
    if self.game_state != GameState::InProgress || !self.accepts_entry(puzzle, pos) {
      return None;
    }

    let square = if input.is_ascii_alphabetic() {
      Square::Letter(input.to_ascii_uppercase())
    } else {
      Square::Empty
    };
    self.answers.set(pos, square);

    if square.letter().is_some() {
      if let Some(next) = puzzle.solution().advance(pos, self.direction) {
        trace!(from = ?pos, to = ?next, "cursor advanced");
        self.active_cell = Some(next);
      }
    }

    self.check_completion(puzzle)
  }

  /// Handles backspace on `pos`: a filled square is emptied, and from an empty one the
  /// cursor moves back one square against the current direction. Moving back never
  /// wraps.
  pub fn backspace(&mut self, puzzle: &Puzzle, pos: Pos) {
    if self.game_state != GameState::InProgress || !self.accepts_entry(puzzle, pos) {
      return;
    }

    if self.answers.get(pos).is_empty() {
      let (row_delta, col_delta) = self.direction.delta();
      self.move_cursor(puzzle, pos, -row_delta, -col_delta);
    } else {
      self.answers.set(pos, Square::Empty);
    }
  }

  /// Swaps between Across and Down. The active cell stays put.
  pub fn toggle_direction(&mut self) {
    self.direction = !self.direction;
  }

  /// Whether `pos` is white in both the puzzle and this session's entries. They only
  /// differ when the session is handed a different puzzle from the one it was made for.
  fn accepts_entry(&self, puzzle: &Puzzle, pos: Pos) -> bool {
    puzzle.is_fillable(pos) && self.answers.is_fillable(pos)
  }

  fn check_completion(&mut self, puzzle: &Puzzle) -> Option<Completion> {
    if self.answers != *puzzle.solution() {
      return None;
    }

    let elapsed = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
    self.game_state = GameState::Completed;
    self.completed_in = Some(elapsed);
    info!(
      title = puzzle.title(),
      elapsed_ms = elapsed.as_millis() as u64,
      "puzzle completed"
    );
    Some(Completion { elapsed })
  }
}
