//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS classes (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL,
    teacher   TEXT NOT NULL,
    schedule  TEXT
);

CREATE TABLE IF NOT EXISTS students (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id  TEXT UNIQUE NOT NULL,   -- human-facing student code
    name        TEXT NOT NULL,
    email       TEXT,
    class_id    INTEGER REFERENCES classes(id)
);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
-- (student_id, class_id, date) may repeat; only the client session guards it.
CREATE TABLE IF NOT EXISTS attendance (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id  INTEGER NOT NULL REFERENCES students(id),
    class_id    INTEGER NOT NULL REFERENCES classes(id),
    date        TEXT NOT NULL,   -- YYYY-MM-DD
    status      TEXT NOT NULL,   -- 'present' | 'absent' | 'late' | 'excused'
    timestamp   TEXT NOT NULL    -- RFC 3339 UTC, millisecond precision
);

CREATE INDEX IF NOT EXISTS students_class_idx     ON students(class_id);
CREATE INDEX IF NOT EXISTS attendance_class_idx   ON attendance(class_id, date);
CREATE INDEX IF NOT EXISTS attendance_student_idx ON attendance(student_id);

PRAGMA user_version = 1;
";
