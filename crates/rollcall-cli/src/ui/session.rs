//! Live session view: counts, scan input, check-in log and absentees.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, Paragraph},
};
use rollcall_core::{session::Session, store::AttendanceStore};

use crate::app::App;

pub fn draw<S: AttendanceStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let Some(session) = &app.session else {
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // counts
      Constraint::Length(3), // input
      Constraint::Min(0),    // panes
    ])
    .split(area);

  draw_counts(f, rows[0], session);
  draw_input(f, rows[1], &app.input);

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(rows[2]);

  draw_log(f, cols[0], session);
  draw_absent(f, cols[1], session);
}

fn draw_counts(f: &mut Frame, area: Rect, session: &Session) {
  let summary = session.summary();
  let line = Line::from(vec![
    Span::raw(format!(" Total: {}", summary.enrolled)),
    Span::styled(
      format!("   Present: {}", summary.present),
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!("   Absent: {}", summary.absent),
      Style::default().fg(Color::Red),
    ),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

fn draw_input(f: &mut Frame, area: Rect, input: &str) {
  let block = Block::default()
    .title(" Student ID ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  f.render_widget(Paragraph::new(format!("{input}_")).block(block), area);
}

fn draw_log(f: &mut Frame, area: Rect, session: &Session) {
  let block = Block::default()
    .title(format!(" Checked in ({}) ", session.log().len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  // Newest first.
  let items: Vec<ListItem> = session
    .log()
    .iter()
    .rev()
    .map(|entry| {
      let time = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S");
      ListItem::new(Line::from(vec![
        Span::styled(format!("{time}  "), Style::default().fg(Color::DarkGray)),
        Span::styled(
          format!("{:<10}", entry.code),
          Style::default().fg(Color::Yellow),
        ),
        Span::raw(entry.name.clone()),
      ]))
    })
    .collect();

  f.render_widget(List::new(items).block(block), area);
}

fn draw_absent(f: &mut Frame, area: Rect, session: &Session) {
  let absent = session.absent_roster();
  let block = Block::default()
    .title(format!(" Not yet scanned ({}) ", absent.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = absent
    .iter()
    .map(|s| {
      ListItem::new(Line::from(vec![
        Span::styled(format!("{:<10}", s.code), Style::default().fg(Color::DarkGray)),
        Span::raw(s.name.clone()),
      ]))
    })
    .collect();

  f.render_widget(List::new(items).block(block), area);
}
