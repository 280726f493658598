use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use crossgrid::Direction::Across;
use crossgrid::{Completion, GameState, Pos, Puzzle, Session, Square, SquareStyle};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
  DefaultTerminal, Frame,
  buffer::Buffer,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style, Stylize},
  text::Line,
  widgets::{Block, Padding, Paragraph, Widget, Wrap},
};
use tracing::{info, warn};

use crate::leaderboard::{Leaderboard, LeaderboardEntry, format_time};

const SQUARE_WIDTH: u16 = 7;
const SQUARE_HEIGHT: u16 = 3;

/// How long to wait for input before redrawing the timer.
const TICK: Duration = Duration::from_millis(250);

fn square_style(style: SquareStyle, correct: bool) -> Style {
  let base_style = match style {
    SquareStyle::Standard if correct => Style::new().bg(Color::LightGreen),
    SquareStyle::Standard => Style::new().bg(Color::White),
    SquareStyle::Cursor => Style::new().bg(Color::LightRed),
    SquareStyle::Word => Style::new().bg(Color::LightYellow),
  };
  base_style.fg(Color::Black).add_modifier(Modifier::BOLD)
}

#[derive(Debug)]
pub struct App {
  puzzle: Puzzle,
  session: Session,
  username: String,
  leaderboard: Leaderboard,
  leaderboard_path: Option<PathBuf>,
  running: bool,
}

impl App {
  pub fn new(
    puzzle: Puzzle,
    username: String,
    leaderboard: Leaderboard,
    leaderboard_path: Option<PathBuf>,
  ) -> Self {
    let mut session = Session::new(&puzzle);
    session.start(&puzzle);
    Self {
      puzzle,
      session,
      username,
      leaderboard,
      leaderboard_path,
      running: true,
    }
  }

  pub fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
    self.running = true;
    while self.running {
      terminal.draw(|frame| self.draw(frame))?;
      self.handle_crossterm_events()?;
    }
    Ok(())
  }

  fn draw(&self, frame: &mut Frame) {
    frame.render_widget(self, frame.area());
  }

  /// Reads the crossterm events and updates the state of [`App`]. Returns without an
  /// event after [`TICK`] so the timer keeps moving.
  fn handle_crossterm_events(&mut self) -> io::Result<()> {
    if !event::poll(TICK)? {
      return Ok(());
    }
    match event::read()? {
      // it's important to check KeyEventKind::Press to avoid handling key release events
      Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
      _ => {}
    }
    Ok(())
  }

  /// Handles the key events and updates the state of [`App`].
  fn on_key_event(&mut self, key: KeyEvent) {
    match (key.modifiers, key.code) {
      (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
        self.quit()
      }
      (KeyModifiers::CONTROL, KeyCode::Char('r') | KeyCode::Char('R')) => self.restart(),
      (_, KeyCode::Enter) if self.session.game_state() == GameState::Completed => self.restart(),
      (_, KeyCode::Tab) => self.session.toggle_direction(),
      (_, KeyCode::Up) => self.move_cursor(-1, 0),
      (_, KeyCode::Down) => self.move_cursor(1, 0),
      (_, KeyCode::Left) => self.move_cursor(0, -1),
      (_, KeyCode::Right) => self.move_cursor(0, 1),
      (_, KeyCode::Backspace) => {
        if let Some(pos) = self.session.active_cell() {
          self.session.backspace(&self.puzzle, pos);
        }
      }
      (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.enter(c),
      _ => {}
    }
  }

  fn move_cursor(&mut self, row_delta: isize, col_delta: isize) {
    if let Some(pos) = self.session.active_cell() {
      self
        .session
        .move_cursor(&self.puzzle, pos, row_delta, col_delta);
    }
  }

  fn enter(&mut self, c: char) {
    let Some(pos) = self.session.active_cell() else {
      return;
    };
    if let Some(completion) = self.session.enter_letter(&self.puzzle, pos, c) {
      self.on_completion(completion);
    }
  }

  /// Records the solve time. A failure to save is logged, and does not affect the game.
  fn on_completion(&mut self, completion: Completion) {
    let entry = LeaderboardEntry::new(&self.username, completion.elapsed, Utc::now());
    if self.leaderboard.record(entry) {
      info!(username = %self.username, time = %format_time(completion.elapsed), "new best time");
    }

    if let Some(path) = &self.leaderboard_path {
      if let Err(e) = self.leaderboard.save(path) {
        warn!(path = %path.display(), error = %e, "failed to save leaderboard");
      }
    }
  }

  fn restart(&mut self) {
    self.session.reset();
    self.session.start(&self.puzzle);
  }

  /// Set running to false to quit the application.
  fn quit(&mut self) {
    self.running = false;
  }

  fn render_square(&self, pos: Pos, square_area: Rect, buf: &mut Buffer) {
    let square = self.session.answer(pos);
    let style = square_style(
      self.session.square_style(&self.puzzle, pos),
      self.session.game_state() == GameState::Completed && self.session.is_correct(&self.puzzle, pos),
    );

    let mut block = Block::new().style(style).padding(Padding::top(1));
    if let Some(number) = self.puzzle.clue_number_for(pos) {
      block = block.title(Line::from(number.to_string()).not_bold());
    }

    match square {
      Square::Black => Block::new()
        .style(Style::new().bg(Color::Black))
        .render(square_area, buf),
      Square::Empty => block.render(square_area, buf),
      Square::Letter(c) => {
        Paragraph::new(c.to_string())
          .block(block)
          .centered()
          .render(square_area, buf);
      }
    };
  }

  fn clue_text(&self) -> String {
    let direction = self.session.direction();
    match self.session.current_clue(&self.puzzle) {
      Some(clue) => format!("{} {}\n\n{}", clue.number, direction, clue.text),
      None if self.session.active_cell().is_some() => format!("No {direction} clue here"),
      None => "Select a square to see its clue".to_string(),
    }
  }

  fn leaderboard_lines(&self) -> Vec<Line<'_>> {
    if self.leaderboard.entries().is_empty() {
      return vec![Line::from("No times yet")];
    }

    self
      .leaderboard
      .entries()
      .iter()
      .enumerate()
      .map(|(i, entry)| {
        let line = Line::from(format!(
          "{:>2}. {:<12} {}  {}",
          i + 1,
          entry.username,
          format_time(entry.duration()),
          entry.completed_at.format("%b %d %H:%M")
        ));
        if entry.username.eq_ignore_ascii_case(&self.username) {
          line.bold()
        } else {
          line
        }
      })
      .collect()
  }

  fn status_lines(&self) -> Vec<Line<'_>> {
    let progress = match self.session.game_state() {
      GameState::Completed => format!("Solved in {}!", format_time(self.session.elapsed())),
      _ => format!("{}  {}", self.username, format_time(self.session.elapsed())),
    };
    let best = match self.leaderboard.best_for(&self.username) {
      Some(entry) => format!("Best: {}", format_time(entry.duration())),
      None => "Best: --:--".to_string(),
    };
    vec![Line::from(progress), Line::from(best).dim()]
  }
}

impl Widget for &App {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let [title_area, main_area, help_area] = Layout::vertical([
      Constraint::Length(2),
      Constraint::Percentage(100),
      Constraint::Length(1),
    ])
    .areas(area);

    let title = Line::from(vec![
      "Crossgrid".bold().blue(),
      ": ".bold(),
      self.puzzle.title().to_string().bold(),
    ])
    .centered();
    title.render(title_area, buf);

    let [puzzle_area, side_area] =
      Layout::horizontal([Constraint::Percentage(100), Constraint::Length(45)]).areas(main_area);

    let grid = self.puzzle.solution();
    let puzzle_area = center(
      puzzle_area,
      Constraint::Length(grid_extent(grid.width(), SQUARE_WIDTH + 2)),
      Constraint::Length(grid_extent(grid.height(), SQUARE_HEIGHT + 1)),
    );

    let mut square_area = Rect {
      x: puzzle_area.x,
      y: puzzle_area.y,
      width: SQUARE_WIDTH,
      height: SQUARE_HEIGHT,
    };
    for row in 0..grid.height() {
      for col in 0..grid.width() {
        self.render_square((row, col), square_area.intersection(area), buf);
        square_area.x = square_area.x.saturating_add(SQUARE_WIDTH + 2);
      }
      square_area.x = puzzle_area.x;
      square_area.y = square_area.y.saturating_add(SQUARE_HEIGHT + 1);
    }

    let [status_area, clue_area, leaderboard_area] = Layout::vertical([
      Constraint::Length(4),
      Constraint::Percentage(50),
      Constraint::Percentage(50),
    ])
    .areas(side_area);

    Paragraph::new(self.status_lines())
      .centered()
      .block(Block::bordered())
      .render(status_area, buf);

    let direction_arrow = if self.session.direction() == Across { "→" } else { "↓" };
    Paragraph::new(self.clue_text())
      .wrap(Wrap { trim: true })
      .block(
        Block::bordered()
          .title(Line::from(format!("Current clue {direction_arrow}")).centered())
          .padding(Padding::uniform(2)),
      )
      .render(clue_area, buf);

    Paragraph::new(self.leaderboard_lines())
      .block(
        Block::bordered()
          .title(Line::from("Leaderboard").centered())
          .padding(Padding::horizontal(1)),
      )
      .render(leaderboard_area, buf);

    let help = match self.session.game_state() {
      GameState::Completed => "Enter: play again   Esc: quit",
      _ => "Tab: direction   Arrows: move   Ctrl-R: restart   Esc: quit",
    };
    Line::from(help).centered().dim().render(help_area, buf);
  }
}

fn grid_extent(squares: usize, step: u16) -> u16 {
  u16::try_from(squares)
    .unwrap_or(u16::MAX)
    .saturating_mul(step)
}

/// https://ratatui.rs/recipes/layout/center-a-widget/
fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
  let [area] = Layout::horizontal([horizontal])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
  area
}
