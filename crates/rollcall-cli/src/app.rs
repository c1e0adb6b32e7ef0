//! Application state machine and event dispatcher.

use std::{
  sync::Arc,
  time::Instant,
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use rollcall_core::{
  demo,
  model::{Class, Student},
  notice::Notice,
  scan::{ScanOutcome, ScanResolver},
  session::{Session, SessionSummary},
  store::AttendanceStore,
};

use crate::scanner::ScanFeed;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Pick the class to take attendance for.
  ClassList,
  /// Live session: scan or type student codes.
  Session,
  /// Finalized counts for the current session.
  Summary,
}

/// A notice together with the instant it went on screen.
#[derive(Debug, Clone)]
pub struct ShownNotice {
  pub notice: Notice,
  pub since:  Instant,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All classes, loaded once on startup.
  pub classes: Vec<Class>,

  /// Every student of every class; scans are looked up here.
  pub students: Vec<Student>,

  /// Set when the initial load failed and the demo dataset is in use.
  pub offline: bool,

  /// Current fuzzy-filter string for the class list.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* class list.
  pub list_cursor: usize,

  /// The live session, present only while a class is selected.
  pub session: Option<Session>,

  /// Text typed into the scan box so far.
  pub input: String,

  /// Transient feedback, cleared by [`App::tick`] once its window passes.
  pub notice: Option<ShownNotice>,

  /// Counts shown on the summary screen.
  pub summary: Option<SessionSummary>,

  /// Where check-ins are persisted.
  pub store: Arc<S>,
}

impl<S: AttendanceStore> App<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      screen: Screen::ClassList,
      classes: Vec::new(),
      students: Vec::new(),
      offline: false,
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      session: None,
      input: String::new(),
      notice: None,
      summary: None,
      store,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch classes and students. On failure fall back to the demo dataset
  /// rather than blocking the UI.
  pub async fn load_data(&mut self) {
    let loaded = tokio::try_join!(
      self.store.list_classes(),
      self.store.list_students(None)
    );
    match loaded {
      Ok((classes, students)) => {
        tracing::info!(classes = classes.len(), students = students.len(), "data loaded");
        self.classes = classes;
        self.students = students;
        self.offline = false;
      }
      Err(e) => {
        tracing::warn!(error = %e, "initial load failed; using demo data");
        self.classes = demo::classes();
        self.students = demo::students();
        self.offline = true;
        self.show(Notice::load_failed(), Instant::now());
      }
    }
    self.list_cursor = 0;
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  pub fn show(&mut self, notice: Notice, now: Instant) {
    self.notice = Some(ShownNotice { notice, since: now });
  }

  /// Drop the current notice once its display window has elapsed.
  pub fn tick(&mut self, now: Instant) {
    if let Some(shown) = &self.notice
      && now.duration_since(shown.since) >= shown.notice.display_window()
    {
      self.notice = None;
    }
  }

  // ── Class list ────────────────────────────────────────────────────────────

  /// Classes that match the current filter query.
  pub fn filtered_classes(&self) -> Vec<&Class> {
    if self.filter.is_empty() {
      return self.classes.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .classes
      .iter()
      .filter(|c| {
        matcher.fuzzy_match(&c.name, &self.filter).is_some()
          || matcher.fuzzy_match(&c.teacher, &self.filter).is_some()
      })
      .collect()
  }

  /// The class under the list cursor in the filtered view, if any.
  pub fn cursor_class(&self) -> Option<&Class> {
    self.filtered_classes().get(self.list_cursor).copied()
  }

  /// The class of the live session.
  pub fn selected_class(&self) -> Option<&Class> {
    let id = self.session.as_ref()?.class_id();
    self.classes.iter().find(|c| c.id == id)
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// Start a fresh session for `class_id`.
  pub fn select_class(&mut self, class_id: i64) {
    let session = Session::new(class_id, &self.students);
    tracing::info!(class_id, roster = session.roster().len(), "session started");
    self.session = Some(session);
    self.input.clear();
    self.summary = None;
    self.screen = Screen::Session;
  }

  /// Leave the live session; its in-memory state is discarded.
  pub fn leave_session(&mut self) {
    self.session = None;
    self.input.clear();
    self.summary = None;
    self.screen = Screen::ClassList;
  }

  /// Run one scanned or typed value through the resolver and show the
  /// outcome. Empty input and scans outside a session are ignored.
  pub async fn submit_scan(&mut self, raw: &str) -> Option<ScanOutcome> {
    let session = self.session.as_mut()?;
    let resolver = ScanResolver::new(&self.students, self.store.as_ref());
    let outcome = resolver.resolve(session, raw).await?;
    self.show(outcome.notice(), Instant::now());
    Some(outcome)
  }

  /// Feed at most one scanner value into the live session. Values that
  /// arrive with no session are dropped; while the summary is open they stay
  /// queued until the session is back on screen.
  pub async fn poll_feed(&mut self, feed: &mut ScanFeed) -> Option<ScanOutcome> {
    match self.screen {
      Screen::Session => {
        let value = feed.try_next()?;
        self.submit_scan(&value).await
      }
      Screen::Summary => None,
      Screen::ClassList => {
        while let Some(value) = feed.try_next() {
          tracing::debug!(%value, "scan ignored: no class selected");
        }
        None
      }
    }
  }

  pub fn finalize(&mut self) {
    if let Some(session) = &self.session {
      let summary = session.summary();
      tracing::info!(
        class_id = summary.class_id,
        present = summary.present,
        absent = summary.absent,
        "attendance finalized"
      );
      self.summary = Some(summary);
      self.screen = Screen::Summary;
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    match self.screen {
      Screen::ClassList => self.handle_list_key(key).await,
      Screen::Session => {
        self.handle_session_key(key).await;
        true
      }
      Screen::Summary => {
        // Any key dismisses the summary; the session stays open.
        self.screen = Screen::Session;
        true
      }
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        // Immediately open the session if there's exactly one match.
        let list = self.filtered_classes();
        if list.len() == 1 {
          let id = list[0].id;
          self.select_class(id);
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_classes().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_class().map(|c| c.id) {
          self.select_class(id);
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      KeyCode::Char('r') => self.load_data().await,

      _ => {}
    }
    true
  }

  async fn handle_session_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      if key.code == KeyCode::Char('f') {
        self.finalize();
      }
      return;
    }

    match key.code {
      KeyCode::Esc => self.leave_session(),
      KeyCode::Enter => {
        let raw = std::mem::take(&mut self.input);
        self.submit_scan(&raw).await;
      }
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Char(c) => self.input.push(c),
      _ => {}
    }
  }
}
