use crate::Puzzle;

const POWER_BI: &str = include_str!("../puzzles/powerbi.json");

/// The puzzle built into the crate: a 7x7 grid with a few Power BI and DAX words.
pub fn sample() -> Puzzle {
  Puzzle::from_json(POWER_BI).expect("built-in puzzle is valid")
}
