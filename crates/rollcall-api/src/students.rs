//! Handlers for `/students` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/students` | All students |
//! | `GET`  | `/students/class/:class_id` | Students registered for one class |
//! | `POST` | `/students` | Body: `{"student_id","name","email","class_id"}`; 409 on a taken code |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  model::{NewStudent, Student, normalize_code},
  store::AttendanceStore,
};

use crate::{
  Created,
  error::ApiError,
  extract::{Body, Params},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /students`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: AttendanceStore,
{
  let students = store.list_students(None).await.map_err(ApiError::store)?;
  Ok(Json(students))
}

/// `GET /students/class/:class_id`
pub async fn list_for_class<S>(
  State(store): State<Arc<S>>,
  Params(class_id): Params<i64>,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: AttendanceStore,
{
  let students = store
    .list_students(Some(class_id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(students))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /students`, returns 201 + `{id, message}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Body(mut body): Body<NewStudent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  body.code = normalize_code(&body.code);
  if body.code.is_empty() {
    return Err(ApiError::BadRequest("student_id is required".into()));
  }
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name is required".into()));
  }

  let id = store.add_student(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created::new(id, "Student added successfully"))))
}
