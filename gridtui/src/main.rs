use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossgrid::Puzzle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use leaderboard::Leaderboard;

mod app;
mod leaderboard;

/// Solve a crossword against the clock
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
  /// Puzzle definition to play (JSON). Plays the built-in puzzle if omitted.
  #[arg(short, long)]
  puzzle: Option<PathBuf>,

  /// Name to record solve times under
  #[arg(short, long, default_value = "player")]
  username: String,

  /// File to keep the leaderboard in. Without it, times are kept only until you quit.
  #[arg(short, long)]
  leaderboard: Option<PathBuf>,

  /// Where to write logs. Filter them with RUST_LOG.
  #[arg(long, default_value = "gridtui.log")]
  log_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  init_logging(&args.log_file)?;

  let puzzle = match &args.puzzle {
    Some(path) => load_puzzle(path)?,
    None => crossgrid::sample(),
  };
  let leaderboard = match &args.leaderboard {
    Some(path) => Leaderboard::load(path)
      .with_context(|| format!("reading leaderboard {}", path.display()))?,
    None => Leaderboard::default(),
  };
  info!(title = puzzle.title(), username = %args.username, "starting");

  let app = App::new(puzzle, args.username, leaderboard, args.leaderboard);

  let terminal = ratatui::init();
  let result = app.run(terminal);
  ratatui::restore();
  Ok(result?)
}

fn load_puzzle(path: &Path) -> anyhow::Result<Puzzle> {
  let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
  Puzzle::from_json(&data).with_context(|| format!("loading puzzle {}", path.display()))
}

/// Logs go to a file so they don't draw over the puzzle.
fn init_logging(path: &Path) -> anyhow::Result<()> {
  let log_file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(Arc::new(log_file))
    .with_ansi(false)
    .try_init();
  Ok(())
}
