//! Scan Resolver: turns one raw scanned or typed string into an outcome.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. empty after trimming → ignored, no outcome
//! 2. unknown student code → [`ScanOutcome::NotFound`]
//! 3. student registered elsewhere → [`ScanOutcome::WrongClass`]
//! 4. already in the present-set → [`ScanOutcome::AlreadyMarked`]
//! 5. persist the check-in → [`ScanOutcome::Success`] or
//!    [`ScanOutcome::PersistFailed`]
//!
//! The session is only touched after the store confirms the insert, so a
//! failed write can be retried by scanning the same code again.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::{
  model::{AttendanceStatus, NewAttendance, Student, normalize_code},
  notice::{Notice, Severity},
  session::Session,
  store::AttendanceStore,
};

/// The result of resolving one non-empty scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
  /// The student was marked present and the record persisted.
  Success(Student),
  /// No student has this (normalized) code.
  NotFound(String),
  /// The student exists but is not on the selected class's roster.
  WrongClass(Student),
  /// The student was already marked present in this session.
  AlreadyMarked(Student),
  /// The store rejected or never received the insert.
  PersistFailed { student: Student, reason: String },
}

impl ScanOutcome {
  pub fn severity(&self) -> Severity {
    match self {
      Self::Success(_) => Severity::Success,
      Self::AlreadyMarked(_) => Severity::Warning,
      Self::NotFound(_) | Self::WrongClass(_) | Self::PersistFailed { .. } => {
        Severity::Error
      }
    }
  }

  pub fn message(&self) -> String {
    match self {
      Self::Success(s) => format!("✓ {} - Present", s.name),
      Self::NotFound(_) => "Student ID not found in database!".to_owned(),
      Self::WrongClass(s) => {
        format!("{} is not registered for this class!", s.name)
      }
      Self::AlreadyMarked(s) => format!("{} already marked present!", s.name),
      Self::PersistFailed { .. } => {
        "Failed to save attendance. Please try again.".to_owned()
      }
    }
  }

  pub fn notice(&self) -> Notice { Notice::new(self.severity(), self.message()) }

  /// The matched student, for every outcome except `NotFound`.
  pub fn student(&self) -> Option<&Student> {
    match self {
      Self::NotFound(_) => None,
      Self::Success(s)
      | Self::WrongClass(s)
      | Self::AlreadyMarked(s)
      | Self::PersistFailed { student: s, .. } => Some(s),
    }
  }
}

/// Validates scans against the full student collection and persists
/// successful check-ins through `store`.
pub struct ScanResolver<'a, S> {
  students: &'a [Student],
  store:    &'a S,
}

impl<'a, S: AttendanceStore> ScanResolver<'a, S> {
  pub fn new(students: &'a [Student], store: &'a S) -> Self {
    Self { students, store }
  }

  /// Resolve `raw` against `session` using the local clock.
  pub async fn resolve(
    &self,
    session: &mut Session,
    raw: &str,
  ) -> Option<ScanOutcome> {
    self.resolve_at(session, raw, Local::now()).await
  }

  /// Resolve `raw` as if scanned at `now`. The record's date is the calendar
  /// date of `now` in its own time zone.
  pub async fn resolve_at<Tz: TimeZone>(
    &self,
    session: &mut Session,
    raw: &str,
    now: DateTime<Tz>,
  ) -> Option<ScanOutcome> {
    let code = normalize_code(raw);
    if code.is_empty() {
      return None;
    }

    let Some(student) = self.students.iter().find(|s| s.code == code) else {
      tracing::debug!(%code, "scan rejected: unknown code");
      return Some(ScanOutcome::NotFound(code));
    };

    if student.class_id != Some(session.class_id()) {
      tracing::debug!(%code, class_id = session.class_id(), "scan rejected: wrong class");
      return Some(ScanOutcome::WrongClass(student.clone()));
    }

    if session.is_present(&code) {
      return Some(ScanOutcome::AlreadyMarked(student.clone()));
    }

    let timestamp: DateTime<Utc> = now.with_timezone(&Utc);
    let input = NewAttendance {
      student_id: student.id,
      class_id: session.class_id(),
      date: now.date_naive(),
      status: AttendanceStatus::Present,
      timestamp,
    };

    match self.store.record_attendance(input).await {
      Ok(id) => {
        tracing::info!(%code, record_id = id, "marked present");
        session.record_present(student, timestamp);
        Some(ScanOutcome::Success(student.clone()))
      }
      Err(e) => {
        tracing::warn!(%code, error = %e, "failed to persist attendance");
        Some(ScanOutcome::PersistFailed {
          student: student.clone(),
          reason:  e.to_string(),
        })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use chrono::{FixedOffset, NaiveDate};

  use super::*;
  use crate::{
    model::{Class, ClassAttendanceEntry, NewClass, NewStudent, StudentAttendanceEntry},
    store::StoreError,
  };

  const CLASS_A: i64 = 1;
  const CLASS_B: i64 = 2;

  #[derive(Debug, thiserror::Error)]
  #[error("store offline")]
  struct Offline;

  impl StoreError for Offline {}

  /// Records every attendance insert; fails them all while `offline` is set.
  #[derive(Default)]
  struct FakeStore {
    offline: AtomicBool,
    written: Mutex<Vec<NewAttendance>>,
  }

  impl FakeStore {
    fn written(&self) -> Vec<NewAttendance> { self.written.lock().unwrap().clone() }
  }

  impl AttendanceStore for FakeStore {
    type Error = Offline;

    async fn list_classes(&self) -> Result<Vec<Class>, Offline> { Ok(vec![]) }
    async fn add_class(&self, _: NewClass) -> Result<i64, Offline> { Ok(1) }
    async fn list_students(&self, _: Option<i64>) -> Result<Vec<Student>, Offline> {
      Ok(vec![])
    }
    async fn add_student(&self, _: NewStudent) -> Result<i64, Offline> { Ok(1) }

    async fn record_attendance(&self, input: NewAttendance) -> Result<i64, Offline> {
      if self.offline.load(Ordering::SeqCst) {
        return Err(Offline);
      }
      let mut written = self.written.lock().unwrap();
      written.push(input);
      Ok(written.len() as i64)
    }

    async fn class_attendance(
      &self,
      _: i64,
      _: NaiveDate,
    ) -> Result<Vec<ClassAttendanceEntry>, Offline> {
      Ok(vec![])
    }
    async fn student_attendance(
      &self,
      _: i64,
    ) -> Result<Vec<StudentAttendanceEntry>, Offline> {
      Ok(vec![])
    }
  }

  fn student(id: i64, code: &str, name: &str, class_id: i64) -> Student {
    Student {
      id,
      code: code.into(),
      name: name.into(),
      email: None,
      class_id: Some(class_id),
    }
  }

  fn students() -> Vec<Student> {
    vec![
      student(1, "ST1", "Ada", CLASS_A),
      student(2, "ST2", "Brian", CLASS_A),
      student(3, "ST3", "Chloe", CLASS_B),
    ]
  }

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 5, 9, 15, 0).unwrap() }

  #[tokio::test]
  async fn walkthrough_of_a_session() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);
    assert_eq!(session.roster().len(), 2);
    assert_eq!(session.present_count(), 0);

    let out = resolver.resolve_at(&mut session, "  st1 ", now()).await;
    assert_eq!(out, Some(ScanOutcome::Success(all[0].clone())));
    assert_eq!(session.present_count(), 1);
    let absent: Vec<_> = session.absent_roster().iter().map(|s| s.code.clone()).collect();
    assert_eq!(absent, ["ST2"]);

    let out = resolver.resolve_at(&mut session, "ST3", now()).await;
    assert_eq!(out, Some(ScanOutcome::WrongClass(all[2].clone())));

    let out = resolver.resolve_at(&mut session, "ST1", now()).await;
    assert_eq!(out, Some(ScanOutcome::AlreadyMarked(all[0].clone())));
    assert_eq!(session.present_count(), 1);

    let out = resolver.resolve_at(&mut session, "", now()).await;
    assert_eq!(out, None);
    let out = resolver.resolve_at(&mut session, " \t ", now()).await;
    assert_eq!(out, None);

    assert_eq!(store.written().len(), 1);
  }

  #[tokio::test]
  async fn unknown_code_leaves_session_alone() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    for code in ["ST9", "XYZ", "st 1"] {
      let out = resolver.resolve_at(&mut session, code, now()).await.unwrap();
      assert!(matches!(out, ScanOutcome::NotFound(_)), "{code}: {out:?}");
      assert_eq!(out.severity(), Severity::Error);
      assert_eq!(out.message(), "Student ID not found in database!");
    }
    assert_eq!(session.present_count(), 0);
    assert!(store.written().is_empty());
  }

  #[tokio::test]
  async fn wrong_class_is_an_error_naming_the_student() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_B, &all);

    let out = resolver.resolve_at(&mut session, "st2", now()).await.unwrap();
    assert_eq!(out.severity(), Severity::Error);
    assert_eq!(out.message(), "Brian is not registered for this class!");
    assert_eq!(session.present_count(), 0);
  }

  #[tokio::test]
  async fn unassigned_student_is_wrong_class() {
    let mut all = students();
    all.push(Student {
      id:       4,
      code:     "ST4".into(),
      name:     "Dana".into(),
      email:    None,
      class_id: None,
    });
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    let out = resolver.resolve_at(&mut session, "ST4", now()).await.unwrap();
    assert!(matches!(out, ScanOutcome::WrongClass(_)));
  }

  #[tokio::test]
  async fn already_marked_is_a_warning() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    resolver.resolve_at(&mut session, "ST2", now()).await;
    let out = resolver.resolve_at(&mut session, "st2", now()).await.unwrap();
    assert_eq!(out.severity(), Severity::Warning);
    assert_eq!(out.message(), "Brian already marked present!");
    assert_eq!(out.notice().display_window(), std::time::Duration::from_secs(3));
    assert_eq!(session.present_count(), 1);
    assert_eq!(session.log().len(), 1);
  }

  #[tokio::test]
  async fn success_persists_date_and_instant() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    let out = resolver.resolve_at(&mut session, "ST2", now()).await.unwrap();
    assert_eq!(out.message(), "✓ Brian - Present");
    assert_eq!(out.notice().display_window(), std::time::Duration::from_secs(2));

    let written = store.written();
    assert_eq!(written, vec![NewAttendance {
      student_id: 2,
      class_id:   CLASS_A,
      date:       NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
      status:     AttendanceStatus::Present,
      timestamp:  now(),
    }]);
    assert_eq!(session.log()[0].timestamp, now());
  }

  #[tokio::test]
  async fn date_follows_the_scan_time_zone() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    // 23:30 on the 4th in UTC-5 is already the 5th in UTC.
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let late = tz.with_ymd_and_hms(2024, 3, 4, 23, 30, 0).unwrap();
    resolver.resolve_at(&mut session, "ST1", late).await;

    let written = store.written();
    assert_eq!(written[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    assert_eq!(
      written[0].timestamp,
      Utc.with_ymd_and_hms(2024, 3, 5, 4, 30, 0).unwrap()
    );
  }

  #[tokio::test]
  async fn failed_write_can_be_retried() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    store.offline.store(true, Ordering::SeqCst);
    let out = resolver.resolve_at(&mut session, "ST1", now()).await.unwrap();
    assert!(matches!(
      &out,
      ScanOutcome::PersistFailed { reason, .. } if reason == "store offline"
    ));
    assert_eq!(out.severity(), Severity::Error);
    assert_eq!(session.present_count(), 0);
    assert!(session.log().is_empty());

    store.offline.store(false, Ordering::SeqCst);
    let out = resolver.resolve_at(&mut session, "ST1", now()).await.unwrap();
    assert!(matches!(out, ScanOutcome::Success(_)));
    assert_eq!(session.present_count(), 1);
  }

  #[tokio::test]
  async fn reselecting_class_allows_marking_again() {
    let all = students();
    let store = FakeStore::default();
    let resolver = ScanResolver::new(&all, &store);
    let mut session = Session::new(CLASS_A, &all);

    resolver.resolve_at(&mut session, "ST1", now()).await;
    session.select_class(CLASS_A, &all);
    assert_eq!(session.present_count(), 0);

    let out = resolver.resolve_at(&mut session, "ST1", now()).await.unwrap();
    assert!(matches!(out, ScanOutcome::Success(_)));
    // Nothing in the store prevents the second record for the same day.
    assert_eq!(store.written().len(), 2);
  }
}
