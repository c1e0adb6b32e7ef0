//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision so
//! that lexical order matches chronological order. Dates are `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rollcall_core::model::{
  AttendanceRecord, ClassAttendanceEntry, DATE_FORMAT, StudentAttendanceEntry,
  parse_date,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> { Ok(parse_date(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawRecord::from_row`], for an `attendance` table
/// aliased as `a`.
pub const RECORD_COLUMNS: &str =
  "a.id, a.student_id, a.class_id, a.date, a.status, a.timestamp";

/// Raw values read directly from an `attendance` row.
pub struct RawRecord {
  pub id:         i64,
  pub student_id: i64,
  pub class_id:   i64,
  pub date:       String,
  pub status:     String,
  pub timestamp:  String,
}

impl RawRecord {
  /// Read the six [`RECORD_COLUMNS`] starting at column 0.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      student_id: row.get(1)?,
      class_id:   row.get(2)?,
      date:       row.get(3)?,
      status:     row.get(4)?,
      timestamp:  row.get(5)?,
    })
  }

  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      id:         self.id,
      student_id: self.student_id,
      class_id:   self.class_id,
      date:       decode_date(&self.date)?,
      status:     self.status.parse()?,
      timestamp:  decode_dt(&self.timestamp)?,
    })
  }
}

/// An attendance row joined with `students.name` and `students.student_id`.
pub struct RawClassEntry {
  pub record: RawRecord,
  pub name:   String,
  pub sid:    String,
}

impl RawClassEntry {
  pub fn into_entry(self) -> Result<ClassAttendanceEntry> {
    Ok(ClassAttendanceEntry {
      record: self.record.into_record()?,
      name:   self.name,
      sid:    self.sid,
    })
  }
}

/// An attendance row joined with `classes.name`.
pub struct RawStudentEntry {
  pub record:     RawRecord,
  pub class_name: String,
}

impl RawStudentEntry {
  pub fn into_entry(self) -> Result<StudentAttendanceEntry> {
    Ok(StudentAttendanceEntry {
      record:     self.record.into_record()?,
      class_name: self.class_name,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2024, 3, 5, 9, 5, 0).unwrap();
    let b = a + chrono::Duration::milliseconds(1500);
    let c = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
    let (ea, eb, ec) = (encode_dt(a), encode_dt(b), encode_dt(c));
    assert_eq!(ea, "2024-03-05T09:05:00.000Z");
    assert!(ea < eb && eb < ec);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn decode_dt_accepts_offsets() {
    let dt = decode_dt("2024-03-05T10:05:00+01:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 5, 9, 5, 0).unwrap());
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn bad_status_is_a_core_error() {
    let raw = RawRecord {
      id:         1,
      student_id: 1,
      class_id:   1,
      date:       "2024-03-05".into(),
      status:     "asleep".into(),
      timestamp:  "2024-03-05T09:05:00.000Z".into(),
    };
    assert!(matches!(raw.into_record(), Err(Error::Core(_))));
  }
}
