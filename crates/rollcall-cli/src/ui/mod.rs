//! TUI rendering for every screen.

pub mod class_list;
pub mod session;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};
use rollcall_core::{notice::Severity, store::AttendanceStore};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: AttendanceStore>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  // Vertical stack: header, body, notice, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // notice
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::ClassList => class_list::draw(f, rows[1], app),
    Screen::Session => session::draw(f, rows[1], app),
    Screen::Summary => {
      session::draw(f, rows[1], app);
      draw_summary(f, rows[1], app);
    }
  }
  draw_notice(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: AttendanceStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let date = Local::now().format("%A, %B %-d, %Y").to_string();

  let mut title = String::from(" rollcall");
  if let Some(class) = app.selected_class() {
    title.push_str(&format!("  {} ({})", class.name, class.teacher));
  }
  if app.offline {
    title.push_str("  [offline]");
  }

  let left = Span::styled(
    title,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Notice ───────────────────────────────────────────────────────────────────

fn draw_notice<S: AttendanceStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let Some(shown) = &app.notice else {
    return;
  };
  let color = match shown.notice.severity {
    Severity::Success => Color::Green,
    Severity::Warning => Color::Yellow,
    Severity::Error => Color::Red,
  };
  f.render_widget(
    Paragraph::new(format!(" {}", shown.notice.message)).style(
      Style::default()
        .fg(Color::Black)
        .bg(color)
        .add_modifier(Modifier::BOLD),
    ),
    area,
  );
}

// ─── Summary ──────────────────────────────────────────────────────────────────

fn draw_summary<S: AttendanceStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let Some(summary) = app.summary else {
    return;
  };

  let popup = centered(area, 40, 7);
  let block = Block::default()
    .title(" Attendance finalized ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  let text = vec![
    Line::from(format!("Enrolled: {}", summary.enrolled)),
    Line::from(Span::styled(
      format!("Present:  {}", summary.present),
      Style::default().fg(Color::Green),
    )),
    Line::from(Span::styled(
      format!("Absent:   {}", summary.absent),
      Style::default().fg(Color::Red),
    )),
  ];

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(text).block(block).alignment(Alignment::Center),
    popup,
  );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: AttendanceStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.screen {
    Screen::ClassList if app.filter_active => {
      ("SEARCH", "Type to filter  Esc cancel  Enter select")
    }
    Screen::ClassList => (
      "CLASSES",
      "↑↓/jk navigate  / search  Enter start  r reload  q quit",
    ),
    Screen::Session => (
      "SCAN",
      "Type or scan an ID  Enter submit  Ctrl-F finalize  Esc back",
    ),
    Screen::Summary => ("SUMMARY", "Any key to continue"),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
