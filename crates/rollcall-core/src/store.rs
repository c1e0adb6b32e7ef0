//! The `AttendanceStore` trait.
//!
//! Implemented by storage backends (e.g. `rollcall-store-sqlite`) and by the
//! HTTP client in `rollcall-cli`. The Record Service and the Scan Resolver
//! depend on this abstraction, not on any concrete backend; the handle is
//! always passed in explicitly.

use std::future::Future;

use chrono::NaiveDate;

use crate::model::{
  Class, ClassAttendanceEntry, NewAttendance, NewClass, NewStudent, Student,
  StudentAttendanceEntry,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure classes a caller may react to differently; everything else is
/// surfaced verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// A uniqueness constraint was violated (e.g. a duplicate student code).
  Conflict,
  /// The input refers to a class or student that does not exist.
  MissingReference,
  Other,
}

/// Bound on [`AttendanceStore::Error`].
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> FailureKind { FailureKind::Other }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Rollcall store.
///
/// Every method is a single round trip: one query or one insert. Classes and
/// students are read-only from a session's point of view; attendance records
/// are append-only.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: StoreError;

  // ── Classes ───────────────────────────────────────────────────────────

  /// List every class.
  fn list_classes(
    &self,
  ) -> impl Future<Output = Result<Vec<Class>, Self::Error>> + Send + '_;

  /// Insert a class and return its assigned id.
  fn add_class(
    &self,
    input: NewClass,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  /// List students, optionally only those registered for `class_id`.
  fn list_students(
    &self,
    class_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Insert a student and return its assigned id. Fails if the student code
  /// is already taken.
  fn add_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Append an attendance record and return its assigned id.
  fn record_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// All records for a class on one date, with student name and code,
  /// ordered by timestamp ascending.
  fn class_attendance(
    &self,
    class_id: i64,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<ClassAttendanceEntry>, Self::Error>>
  + Send
  + '_;

  /// A student's full history with class names, most recent date first.
  fn student_attendance(
    &self,
    student_id: i64,
  ) -> impl Future<Output = Result<Vec<StudentAttendanceEntry>, Self::Error>>
  + Send
  + '_;
}
