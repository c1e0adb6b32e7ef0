//! Rollcall data model: classes, students, and attendance records.
//!
//! Field names follow the JSON wire format of the Record Service. Note that a
//! student's human-facing code travels as `student_id`, while attendance rows
//! use `student_id` for the numeric foreign key into `students`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Canonical wire and storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

/// Trim and uppercase a raw student code, the form stored and compared
/// everywhere.
pub fn normalize_code(raw: &str) -> String { raw.trim().to_uppercase() }

// ─── Class ───────────────────────────────────────────────────────────────────

/// A class that students are enrolled in and attendance is taken for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
  pub id:       i64,
  pub name:     String,
  pub teacher:  String,
  pub schedule: Option<String>,
}

/// Input to [`crate::store::AttendanceStore::add_class`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClass {
  pub name:     String,
  pub teacher:  String,
  #[serde(default)]
  pub schedule: Option<String>,
}

// ─── Student ─────────────────────────────────────────────────────────────────

/// A student on a class roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  /// Store-assigned row id.
  pub id:       i64,
  /// The globally unique code printed on the student's card.
  #[serde(rename = "student_id")]
  pub code:     String,
  pub name:     String,
  pub email:    Option<String>,
  /// The class this student is registered for, if any.
  pub class_id: Option<i64>,
}

/// Input to [`crate::store::AttendanceStore::add_student`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
  #[serde(rename = "student_id")]
  pub code:     String,
  pub name:     String,
  #[serde(default)]
  pub email:    Option<String>,
  #[serde(default)]
  pub class_id: Option<i64>,
}

// ─── Attendance ──────────────────────────────────────────────────────────────

/// The status tag on an attendance record. The scan workflow only ever
/// produces [`AttendanceStatus::Present`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
  #[default]
  Present,
  Absent,
  Late,
  Excused,
}

impl AttendanceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Present => "present",
      Self::Absent => "absent",
      Self::Late => "late",
      Self::Excused => "excused",
    }
  }
}

impl fmt::Display for AttendanceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for AttendanceStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "present" => Ok(Self::Present),
      "absent" => Ok(Self::Absent),
      "late" => Ok(Self::Late),
      "excused" => Ok(Self::Excused),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

/// A persisted check-in. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub id:         i64,
  /// Row id of the student (not the student code).
  pub student_id: i64,
  pub class_id:   i64,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
  /// The instant the check-in happened.
  pub timestamp:  DateTime<Utc>,
}

/// Input to [`crate::store::AttendanceStore::record_attendance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendance {
  pub student_id: i64,
  pub class_id:   i64,
  pub date:       NaiveDate,
  #[serde(default)]
  pub status:     AttendanceStatus,
  pub timestamp:  DateTime<Utc>,
}

// ─── Joined read models ──────────────────────────────────────────────────────

/// An attendance record joined with the student it belongs to; one row of a
/// class's attendance sheet for a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAttendanceEntry {
  #[serde(flatten)]
  pub record: AttendanceRecord,
  /// Student display name.
  pub name:   String,
  /// Student code.
  pub sid:    String,
}

/// An attendance record joined with its class name; one row of a student's
/// attendance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAttendanceEntry {
  #[serde(flatten)]
  pub record:     AttendanceRecord,
  pub class_name: String,
}
