//! JSON REST API for Rollcall: the Record Service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollcall_core::store::AttendanceStore`]. The store handle is injected at
//! construction; CORS, tracing and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollcall_api::api_router(store.clone()))
//! ```

pub mod attendance;
pub mod classes;
pub mod error;
pub mod extract;
pub mod health;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rollcall_core::store::AttendanceStore;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Body returned by every insert endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
  pub id:      i64,
  pub message: String,
}

impl Created {
  pub fn new(id: i64, message: impl Into<String>) -> Self {
    Self { id, message: message.into() }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AttendanceStore + 'static,
{
  Router::new()
    .route("/health", get(health::handler))
    // Classes
    .route("/classes", get(classes::list::<S>).post(classes::create::<S>))
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route("/students/class/{class_id}", get(students::list_for_class::<S>))
    // Attendance
    .route("/attendance", post(attendance::create::<S>))
    .route("/attendance/student/{student_id}", get(attendance::for_student::<S>))
    .route("/attendance/{class_id}/{date}", get(attendance::for_class::<S>))
    .fallback(|| async { ApiError::NotFound("no such endpoint".into()) })
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
