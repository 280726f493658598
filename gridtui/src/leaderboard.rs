//! Best solve times, one per player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
  pub username: String,
  /// Solve time in milliseconds.
  pub time: u64,
  pub completed_at: DateTime<Utc>,
}

impl LeaderboardEntry {
  pub fn new(username: impl Into<String>, elapsed: Duration, completed_at: DateTime<Utc>) -> Self {
    Self {
      username: username.into(),
      time: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
      completed_at,
    }
  }

  pub fn duration(&self) -> Duration {
    Duration::from_millis(self.time)
  }
}

/// Entries sorted from fastest to slowest. Usernames are compared ignoring case.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
  entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
  /// Reads a leaderboard saved by [save](Self::save). A missing file is an empty board.
  pub fn load(path: &Path) -> io::Result<Self> {
    let data = match fs::read_to_string(path) {
      Ok(data) => data,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(e) => return Err(e),
    };
    let mut board: Self = serde_json::from_str(&data)?;
    board.sort();
    Ok(board)
  }

  pub fn save(&self, path: &Path) -> io::Result<()> {
    let data = serde_json::to_string_pretty(self)?;
    fs::write(path, data)
  }

  pub fn entries(&self) -> &[LeaderboardEntry] {
    &self.entries
  }

  pub fn best_for(&self, username: &str) -> Option<&LeaderboardEntry> {
    self
      .entries
      .iter()
      .find(|e| e.username.eq_ignore_ascii_case(username))
  }

  /// Adds `entry`, unless its player already has an equal or faster time. Returns whether
  /// the board changed.
  pub fn record(&mut self, entry: LeaderboardEntry) -> bool {
    match self
      .entries
      .iter_mut()
      .find(|e| e.username.eq_ignore_ascii_case(&entry.username))
    {
      Some(existing) if existing.time <= entry.time => return false,
      Some(existing) => *existing = entry,
      None => self.entries.push(entry),
    }
    self.sort();
    true
  }

  fn sort(&mut self) {
    self.entries.sort_by_key(|e| e.time);
  }
}

/// Formats a duration as `MM:SS`.
pub fn format_time(elapsed: Duration) -> String {
  let total_seconds = elapsed.as_secs();
  format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
