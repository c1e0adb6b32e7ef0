//! [`SqliteStore`]: the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::NaiveDate;
use rollcall_core::{
  model::{
    Class, ClassAttendanceEntry, NewAttendance, NewClass, NewStudent, Student,
    StudentAttendanceEntry, normalize_code,
  },
  store::AttendanceStore,
};

use crate::{
  encode::{
    RECORD_COLUMNS, RawClassEntry, RawRecord, RawStudentEntry, encode_date,
    encode_dt,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Constraint mapping ──────────────────────────────────────────────────────

/// The extended SQLite result code if `err` is a constraint violation.
fn constraint_code(err: &tokio_rusqlite::Error) -> Option<std::ffi::c_int> {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some(e.extended_code)
    }
    _ => None,
  }
}

fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

fn is_foreign_key_violation(err: &tokio_rusqlite::Error) -> bool {
  constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

fn map_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<Student> {
  Ok(Student {
    id:       row.get(0)?,
    code:     row.get(1)?,
    name:     row.get(2)?,
    email:    row.get(3)?,
    class_id: row.get(4)?,
  })
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = Error;

  // ── Classes ───────────────────────────────────────────────────────────────

  async fn list_classes(&self) -> Result<Vec<Class>> {
    let classes = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, name, teacher, schedule FROM classes ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Class {
              id:       row.get(0)?,
              name:     row.get(1)?,
              teacher:  row.get(2)?,
              schedule: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(classes)
  }

  async fn add_class(&self, input: NewClass) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO classes (name, teacher, schedule) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.name, input.teacher, input.schedule],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    tracing::debug!(class_id = id, "class added");
    Ok(id)
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn list_students(&self, class_id: Option<i64>) -> Result<Vec<Student>> {
    let students = self
      .conn
      .call(move |conn| {
        let rows = if let Some(c) = class_id {
          let mut stmt = conn.prepare(
            "SELECT id, student_id, name, email, class_id FROM students
             WHERE class_id = ?1 ORDER BY id",
          )?;
          stmt
            .query_map(rusqlite::params![c], map_student)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT id, student_id, name, email, class_id FROM students ORDER BY id",
          )?;
          stmt
            .query_map([], map_student)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;
    Ok(students)
  }

  async fn add_student(&self, input: NewStudent) -> Result<i64> {
    let code = normalize_code(&input.code);
    let code_for_err = code.clone();

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (student_id, name, email, class_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![code, input.name, input.email, input.class_id],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match result {
      Ok(id) => {
        tracing::debug!(student_id = id, code = %code_for_err, "student added");
        Ok(id)
      }
      Err(e) if is_unique_violation(&e) => {
        Err(Error::DuplicateStudentCode(code_for_err))
      }
      Err(e) if is_foreign_key_violation(&e) => {
        Err(Error::MissingReference("class"))
      }
      Err(e) => Err(e.into()),
    }
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn record_attendance(&self, input: NewAttendance) -> Result<i64> {
    let date_str   = encode_date(input.date);
    let status_str = input.status.as_str();
    let ts_str     = encode_dt(input.timestamp);

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attendance (student_id, class_id, date, status, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.student_id,
            input.class_id,
            date_str,
            status_str,
            ts_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match result {
      Ok(id) => Ok(id),
      Err(e) if is_foreign_key_violation(&e) => {
        Err(Error::MissingReference("student or class"))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn class_attendance(
    &self,
    class_id: i64,
    date:     NaiveDate,
  ) -> Result<Vec<ClassAttendanceEntry>> {
    let date_str = encode_date(date);

    let raws: Vec<RawClassEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS}, s.name, s.student_id
           FROM attendance a
           JOIN students s ON a.student_id = s.id
           WHERE a.class_id = ?1 AND a.date = ?2
           ORDER BY a.timestamp, a.id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![class_id, date_str], |row| {
            Ok(RawClassEntry {
              record: RawRecord::from_row(row)?,
              name:   row.get(6)?,
              sid:    row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClassEntry::into_entry).collect()
  }

  async fn student_attendance(
    &self,
    student_id: i64,
  ) -> Result<Vec<StudentAttendanceEntry>> {
    let raws: Vec<RawStudentEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS}, c.name
           FROM attendance a
           JOIN classes c ON a.class_id = c.id
           WHERE a.student_id = ?1
           ORDER BY a.date DESC, a.timestamp DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![student_id], |row| {
            Ok(RawStudentEntry {
              record:     RawRecord::from_row(row)?,
              class_name: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudentEntry::into_entry).collect()
  }
}
