//! Error type for `rollcall-store-sqlite`.

use rollcall_core::store::{FailureKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rollcall_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Another student already uses this code.
  #[error("student code {0:?} is already registered")]
  DuplicateStudentCode(String),

  /// The insert names a class or student that does not exist.
  #[error("referenced {0} does not exist")]
  MissingReference(&'static str),
}

impl StoreError for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Error::DuplicateStudentCode(_) => FailureKind::Conflict,
      Error::MissingReference(_) => FailureKind::MissingReference,
      _ => FailureKind::Other,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
