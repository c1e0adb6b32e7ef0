//! Session Tracker: in-memory state for one live attendance session.
//!
//! A [`Session`] exists from the moment a class is selected until the user
//! navigates away. It is never persisted; only the check-ins it triggers are.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Student;

/// One successful check-in, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckIn {
  pub code:      String,
  pub name:      String,
  pub timestamp: DateTime<Utc>,
}

/// Counts reported when a session is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
  pub class_id: i64,
  pub enrolled: usize,
  pub present:  usize,
  pub absent:   usize,
}

/// Roster, present-set and check-in log for the selected class.
#[derive(Debug, Clone)]
pub struct Session {
  class_id: i64,
  roster:   Vec<Student>,
  present:  HashSet<String>,
  log:      Vec<CheckIn>,
}

impl Session {
  /// Start a fresh session for `class_id` over the full student collection.
  pub fn new(class_id: i64, students: &[Student]) -> Self {
    let mut session = Self {
      class_id,
      roster: Vec::new(),
      present: HashSet::new(),
      log: Vec::new(),
    };
    session.select_class(class_id, students);
    session
  }

  /// Switch to `class_id`: the roster becomes every student registered for
  /// it, and the present-set and log start over. An unknown class yields an
  /// empty roster.
  pub fn select_class(&mut self, class_id: i64, students: &[Student]) {
    self.class_id = class_id;
    self.roster = students
      .iter()
      .filter(|s| s.class_id == Some(class_id))
      .cloned()
      .collect();
    self.present.clear();
    self.log.clear();
  }

  /// Mark `student` present and append to the log. Marking the same code
  /// twice leaves the present-set as is.
  pub fn record_present(&mut self, student: &Student, timestamp: DateTime<Utc>) {
    self.present.insert(student.code.clone());
    self.log.push(CheckIn {
      code: student.code.clone(),
      name: student.name.clone(),
      timestamp,
    });
  }

  pub fn class_id(&self) -> i64 { self.class_id }

  pub fn roster(&self) -> &[Student] { &self.roster }

  /// Check-ins in chronological order.
  pub fn log(&self) -> &[CheckIn] { &self.log }

  pub fn is_present(&self, code: &str) -> bool { self.present.contains(code) }

  pub fn present_count(&self) -> usize { self.present.len() }

  /// Roster entries not yet marked present, in roster order.
  pub fn absent_roster(&self) -> Vec<&Student> {
    self
      .roster
      .iter()
      .filter(|s| !self.present.contains(&s.code))
      .collect()
  }

  pub fn summary(&self) -> SessionSummary {
    SessionSummary {
      class_id: self.class_id,
      enrolled: self.roster.len(),
      present:  self.present_count(),
      absent:   self.absent_roster().len(),
    }
  }
}
