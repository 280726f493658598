use crossgrid::Direction::{Across, Down};
use crossgrid::{Error, Puzzle};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn parse_puzzle(path: &Path) -> Result<Puzzle, Error> {
  let data = fs::read_to_string(path)?;
  Puzzle::from_json(&data)
}

fn describe(puzzle: &Puzzle) -> String {
  format!(
    "'{}' ({}x{}, {} across, {} down)",
    puzzle.title(),
    puzzle.solution().width(),
    puzzle.solution().height(),
    puzzle.clues(Across).len(),
    puzzle.clues(Down).len(),
  )
}

/// A simple CLI for checking puzzle definition files
fn main() -> Result<(), Error> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args: Vec<String> = env::args().collect();
  let Some(path) = args.get(1).map(Path::new) else {
    println!("Pass a puzzle definition (.json) or a directory of them to check");
    std::process::exit(1);
  };

  if fs::metadata(path)?.is_dir() {
    let mut success = 0;
    let mut failure = 0;

    for entry in fs::read_dir(path)? {
      let puzzle_path = entry?.path();
      if puzzle_path.extension().is_none_or(|ext| ext != "json") {
        debug!(path = %puzzle_path.display(), "skipping");
        continue;
      }
      match parse_puzzle(&puzzle_path) {
        Ok(puzzle) => {
          println!("Parsed {} from {}", describe(&puzzle), puzzle_path.display());
          success += 1;
        }
        Err(e) => {
          warn!(path = %puzzle_path.display(), error = %e, "invalid puzzle");
          println!("Failed with {} from {}", e, puzzle_path.display());
          failure += 1;
        }
      }
    }
    println!("{success} valid, {failure} invalid");
  } else {
    let puzzle = parse_puzzle(path)?;
    println!("Parsed {}", describe(&puzzle));
    println!("{}", puzzle.solution());
  }

  Ok(())
}
