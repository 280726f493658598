use crate::Direction::{self, Across, Down};
use crate::{Error, Grid, Pos};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A numbered clue. `row` and `col` are the zero-based position of the first
/// square of its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
  pub number: u8,
  pub row: usize,
  pub col: usize,
  pub text: String,
  pub answer: String,
}

impl Clue {
  /// The position of the first square of this clue's answer.
  pub fn start(&self) -> Pos {
    (self.row, self.col)
  }
}

/// The serialized form of a puzzle, as found in puzzle definition files.
///
/// Each string in `grid` is one row. `.` and `#` mark black squares and letters
/// give the solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleDef {
  pub title: String,
  #[serde(default)]
  pub author: String,
  pub grid: Vec<String>,
  pub across: Vec<Clue>,
  pub down: Vec<Clue>,
}

/// A crossword puzzle: its solution grid and its clues. A `Puzzle` never
/// changes once built, so a single one can back any number of [Session](crate::Session)s.
#[derive(Debug)]
pub struct Puzzle {
  title: String,
  author: String,
  solution: Grid,
  across: Vec<Clue>,
  down: Vec<Clue>,
}

impl Puzzle {
  /// Parses and validates a JSON puzzle definition.
  pub fn from_json(json: &str) -> Result<Self, Error> {
    let def: PuzzleDef = serde_json::from_str(json)?;
    Self::from_def(def)
  }

  /// Builds a puzzle from its definition, checking that the clues agree with the grid.
  pub fn from_def(def: PuzzleDef) -> Result<Self, Error> {
    let solution = Grid::parse(&def.grid)?;

    let mut across = def.across;
    let mut down = def.down;
    for clue in across.iter_mut().chain(down.iter_mut()) {
      clue.answer.make_ascii_uppercase();
    }

    check_clues(&solution, &across, Across)?;
    check_clues(&solution, &down, Down)?;
    check_shared_numbers(&across, &down)?;
    check_numbered(&solution, &across, &down)?;

    Ok(Self {
      title: def.title,
      author: def.author,
      solution,
      across,
      down,
    })
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn author(&self) -> &str {
    &self.author
  }

  /// The solution grid.
  pub fn solution(&self) -> &Grid {
    &self.solution
  }

  /// The clues in the given direction, in the order they were defined.
  pub fn clues(&self, direction: Direction) -> &[Clue] {
    match direction {
      Across => &self.across,
      Down => &self.down,
    }
  }

  /// Whether a letter can be entered at `pos`. False for black squares and for
  /// positions outside the grid.
  pub fn is_fillable(&self, pos: Pos) -> bool {
    self.solution.is_fillable(pos)
  }

  /// The number to print in the corner of the square at `pos`, if a clue starts there.
  pub fn clue_number_for(&self, pos: Pos) -> Option<u8> {
    self
      .across
      .iter()
      .chain(self.down.iter())
      .find(|clue| clue.start() == pos)
      .map(|clue| clue.number)
  }

  /// Whether a word in `direction` starts at `pos`.
  pub fn starts(&self, pos: Pos, direction: Direction) -> bool {
    self.solution.starts(pos, direction)
  }

  /// Returns the clue for the word in `direction` that contains `pos`, or `None` if
  /// `pos` is not a white square or that word has no clue in `direction`.
  pub fn current_clue(&self, pos: Pos, direction: Direction) -> Option<&Clue> {
    let start = self.solution.run_start(pos, direction)?;
    self
      .clues(direction)
      .iter()
      .find(|clue| clue.start() == start)
  }

  /// The squares of the word in `direction` that contains `pos`, starting with the
  /// first square of the word.
  pub fn cells_for_current_clue(&self, pos: Pos, direction: Direction) -> Vec<Pos> {
    self.solution.run(pos, direction)
  }
}

fn invalid(clue: &Clue, direction: Direction, reason: impl Into<String>) -> Error {
  Error::InvalidClue {
    number: clue.number,
    direction,
    reason: reason.into(),
  }
}

/// Every clue must start a word and spell it, and no word may have two clues.
fn check_clues(solution: &Grid, clues: &[Clue], direction: Direction) -> Result<(), Error> {
  let mut seen = HashSet::new();

  for clue in clues {
    let pos = clue.start();
    if clue.number == 0 {
      return Err(invalid(clue, direction, "clue numbers start at 1"));
    }
    if !solution.contains(pos) {
      return Err(invalid(clue, direction, format!("{pos:?} is outside the grid")));
    }
    if !solution.starts(pos, direction) {
      return Err(invalid(clue, direction, format!("no word starts at {pos:?}")));
    }

    let word: String = solution
      .run(pos, direction)
      .into_iter()
      .filter_map(|p| solution.get(p).letter())
      .collect();
    if word != clue.answer {
      return Err(invalid(
        clue,
        direction,
        format!("answer {:?} does not match the grid, which has {word:?}", clue.answer),
      ));
    }

    if !seen.insert(pos) {
      return Err(invalid(clue, direction, format!("another clue starts at {pos:?}")));
    }
  }

  Ok(())
}

/// An Across and a Down clue starting on the same square share its number.
fn check_shared_numbers(across: &[Clue], down: &[Clue]) -> Result<(), Error> {
  for down_clue in down {
    if let Some(across_clue) = across.iter().find(|a| a.start() == down_clue.start()) {
      if across_clue.number != down_clue.number {
        return Err(invalid(
          down_clue,
          Down,
          format!(
            "shares its first square with {} Across",
            across_clue.number
          ),
        ));
      }
    }
  }
  Ok(())
}

/// Every square that starts a word, single squares included, carries a clue number.
fn check_numbered(solution: &Grid, across: &[Clue], down: &[Clue]) -> Result<(), Error> {
  let numbered = |pos: Pos| across.iter().chain(down).any(|clue| clue.start() == pos);

  for pos in solution.positions().filter(|&pos| !numbered(pos)) {
    if let Some(direction) = [Across, Down]
      .into_iter()
      .find(|&direction| solution.starts(pos, direction))
    {
      let (row, col) = pos;
      return Err(Error::MissingClue {
        row,
        col,
        direction,
      });
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sample;

  fn clue(number: u8, (row, col): Pos, answer: &str) -> Clue {
    Clue {
      number,
      row,
      col,
      text: format!("Clue for {answer}"),
      answer: answer.to_string(),
    }
  }

  fn small_def() -> PuzzleDef {
    PuzzleDef {
      title: "Small".to_string(),
      author: String::new(),
      grid: vec!["AB.C".into(), "DE.F".into(), "G.HI".into(), "JKLM".into()],
      across: vec![
        clue(1, (0, 0), "AB"),
        clue(4, (1, 0), "DE"),
        clue(5, (1, 3), "F"),
        clue(6, (2, 0), "G"),
        clue(7, (2, 2), "HI"),
        clue(8, (3, 0), "JKLM"),
      ],
      down: vec![
        clue(1, (0, 0), "ADGJ"),
        clue(2, (0, 1), "BE"),
        clue(3, (0, 3), "CFIM"),
        clue(7, (2, 2), "HL"),
        clue(9, (3, 1), "K"),
      ],
    }
  }

  #[test]
  fn from_def_accepts_consistent_puzzle() {
    let puzzle = Puzzle::from_def(small_def()).unwrap();

    assert_eq!(puzzle.title(), "Small");
    assert_eq!(puzzle.clues(Across).len(), 6);
    assert_eq!(puzzle.clues(Down).len(), 5);
  }

  #[test]
  fn from_def_accepts_single_letter_clues() {
    let def = PuzzleDef {
      title: "Tiny".to_string(),
      author: String::new(),
      grid: vec!["A.".into(), "B.".into()],
      across: vec![clue(1, (0, 0), "a"), clue(2, (1, 0), "B")],
      down: vec![],
    };

    let puzzle = Puzzle::from_def(def).unwrap();
    assert_eq!(puzzle.clue_number_for((1, 0)), Some(2));
    let clue = puzzle.current_clue((1, 0), Across).unwrap();
    assert_eq!((clue.number, clue.answer.as_str()), (2, "B"));
    assert_eq!(puzzle.cells_for_current_clue((1, 0), Across), vec![(1, 0)]);
  }

  #[test]
  fn single_square_words_are_numbered() {
    let puzzle = Puzzle::from_def(small_def()).unwrap();

    assert_eq!(puzzle.clue_number_for((1, 3)), Some(5));
    assert_eq!(puzzle.clue_number_for((3, 1)), Some(9));
    assert_eq!(puzzle.current_clue((1, 3), Across).unwrap().answer, "F");
    assert_eq!(puzzle.current_clue((3, 1), Down).unwrap().answer, "K");
    assert_eq!(puzzle.cells_for_current_clue((2, 0), Across), vec![(2, 0)]);

    for pos in puzzle.solution().positions().filter(|&p| puzzle.is_fillable(p)) {
      let is_start = puzzle.starts(pos, Across) || puzzle.starts(pos, Down);
      assert_eq!(puzzle.clue_number_for(pos).is_some(), is_start, "{pos:?}");
    }
  }

  #[test]
  fn single_square_numbered_by_other_direction_needs_no_second_clue() {
    let puzzle = Puzzle::from_def(small_def()).unwrap();

    // (0, 3) is a one-square Across word, numbered by 3 Down.
    assert!(puzzle.starts((0, 3), Across));
    assert_eq!(puzzle.clue_number_for((0, 3)), Some(3));
    assert!(puzzle.current_clue((0, 3), Across).is_none());
    assert_eq!(puzzle.current_clue((0, 3), Down).unwrap().answer, "CFIM");
  }

  #[test]
  fn answers_are_case_insensitive() {
    let mut def = small_def();
    def.grid[3] = "jklm".to_string();
    def.across[5].answer = "Jklm".to_string();

    let puzzle = Puzzle::from_def(def).unwrap();
    assert_eq!(puzzle.clues(Across)[5].answer, "JKLM");
    assert_eq!(puzzle.solution().get((3, 0)).letter(), Some('J'));
  }

  #[test]
  fn rejects_clue_that_does_not_start_a_word() {
    let mut def = small_def();
    def.across[0] = clue(1, (0, 1), "B");

    let err = Puzzle::from_def(def).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidClue {
        number: 1,
        direction: Across,
        ..
      }
    ));
  }

  #[test]
  fn rejects_wrong_answer() {
    let mut def = small_def();
    def.down[3].answer = "HX".to_string();

    let err = Puzzle::from_def(def).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidClue {
        number: 7,
        direction: Down,
        ..
      }
    ));
  }

  #[test]
  fn rejects_missing_clue() {
    let mut def = small_def();
    def.down.remove(1);

    let err = Puzzle::from_def(def).unwrap_err();
    assert!(matches!(
      err,
      Error::MissingClue {
        row: 0,
        col: 1,
        direction: Down
      }
    ));
  }

  #[test]
  fn rejects_unnumbered_single_square() {
    let mut def = small_def();
    def.across.retain(|clue| clue.answer != "G");

    let err = Puzzle::from_def(def).unwrap_err();
    assert!(matches!(
      err,
      Error::MissingClue {
        row: 2,
        col: 0,
        direction: Across
      }
    ));
  }

  #[test]
  fn rejects_mismatched_shared_number() {
    let mut def = small_def();
    def.down[0].number = 2;

    assert!(Puzzle::from_def(def).is_err());
  }

  #[test]
  fn rejects_clue_outside_grid() {
    let mut def = small_def();
    def.across.push(clue(9, (7, 7), "ZZ"));

    assert!(Puzzle::from_def(def).is_err());
  }

  #[test]
  fn from_json_reports_bad_json() {
    assert!(matches!(Puzzle::from_json("{"), Err(Error::Json(_))));
  }

  #[test]
  fn clue_numbers_mark_word_starts() {
    let puzzle = sample();
    let grid = puzzle.solution();

    for pos in grid.positions().filter(|&p| puzzle.is_fillable(p)) {
      let is_start = puzzle.starts(pos, Across) || puzzle.starts(pos, Down);
      assert_eq!(puzzle.clue_number_for(pos).is_some(), is_start, "{pos:?}");
    }

    assert_eq!(puzzle.clue_number_for((0, 0)), Some(1));
    assert_eq!(puzzle.clue_number_for((0, 4)), Some(4));
    assert_eq!(puzzle.clue_number_for((1, 0)), Some(7));
    assert_eq!(puzzle.clue_number_for((6, 0)), Some(19));
    assert_eq!(puzzle.clue_number_for((1, 1)), None);
    assert_eq!(puzzle.clue_number_for((0, 3)), None);
  }

  #[test]
  fn current_clue_starts_where_current_cells_start() {
    let puzzle = sample();

    for pos in puzzle.solution().positions() {
      for direction in [Across, Down] {
        let cells = puzzle.cells_for_current_clue(pos, direction);
        if let Some(clue) = puzzle.current_clue(pos, direction) {
          assert_eq!(cells.first(), Some(&clue.start()), "{pos:?} {direction}");
        }
        if puzzle.is_fillable(pos) {
          assert!(cells.contains(&pos));
        } else {
          assert!(cells.is_empty());
        }
      }
    }
  }

  #[test]
  fn current_clue_for_cell_inside_word() {
    let puzzle = sample();

    let clue = puzzle.current_clue((2, 1), Across).unwrap();
    assert_eq!((clue.number, clue.answer.as_str()), (9, "NOR"));

    let clue = puzzle.current_clue((2, 4), Down).unwrap();
    assert_eq!((clue.number, clue.answer.as_str()), (4, "SUM"));

    let clue = puzzle.current_clue((1, 0), Across).unwrap();
    assert_eq!((clue.number, clue.answer.as_str()), (7, "EGO"));

    let clue = puzzle.current_clue((5, 0), Down).unwrap();
    assert_eq!(clue.answer, "CAT");

    assert!(puzzle.current_clue((0, 3), Across).is_none());
  }

  #[test]
  fn cells_for_current_clue_in_order() {
    let puzzle = sample();

    assert_eq!(
      puzzle.cells_for_current_clue((0, 6), Across),
      vec![(0, 4), (0, 5), (0, 6)]
    );
    assert_eq!(
      puzzle.cells_for_current_clue((1, 4), Down),
      vec![(0, 4), (1, 4), (2, 4)]
    );
    assert!(puzzle.cells_for_current_clue((8, 8), Down).is_empty());
  }
}
