//! Sample data inserted into a fresh store.

use crate::{Result, SqliteStore};

/// `(name, teacher)` for each sample class.
const SAMPLE_CLASSES: &[(&str, &str)] = &[
  ("Computer Science 101", "Prof. Smith"),
  ("Mathematics 201", "Ms. Johnson"),
  ("Physics 301", "Dr. Williams"),
  ("English Literature 102", "Prof. Davis"),
  ("Chemistry 202", "Dr. Brown"),
];

/// `(code, name, email)` for each sample student; all join the first class.
const SAMPLE_STUDENTS: &[(&str, &str, &str)] = &[
  ("ST92731", "John Doe", "john@example.com"),
  ("ST84521", "Jane Smith", "jane@example.com"),
  ("ST73642", "Mike Johnson", "mike@example.com"),
];

impl SqliteStore {
  /// Insert the sample classes and students if the store has no classes yet.
  /// Returns `true` if anything was inserted.
  pub async fn seed_sample_data(&self) -> Result<bool> {
    let seeded = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;

        let count: i64 =
          tx.query_row("SELECT COUNT(*) FROM classes", [], |r| r.get(0))?;
        if count > 0 {
          return Ok(false);
        }

        let mut first_class = None;
        for (name, teacher) in SAMPLE_CLASSES {
          tx.execute(
            "INSERT INTO classes (name, teacher) VALUES (?1, ?2)",
            rusqlite::params![name, teacher],
          )?;
          first_class.get_or_insert(tx.last_insert_rowid());
        }

        for (code, name, email) in SAMPLE_STUDENTS {
          tx.execute(
            "INSERT INTO students (student_id, name, email, class_id)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![code, name, email, first_class],
          )?;
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if seeded {
      tracing::info!(
        classes = SAMPLE_CLASSES.len(),
        students = SAMPLE_STUDENTS.len(),
        "inserted sample data"
      );
    }
    Ok(seeded)
  }
}
