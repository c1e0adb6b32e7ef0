//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/attendance` | Body: `{"student_id","class_id","date","status","timestamp"}` |
//! | `GET`  | `/attendance/:class_id/:date` | Sheet for one class and `YYYY-MM-DD`, by timestamp |
//! | `GET`  | `/attendance/student/:student_id` | One student's history, newest date first |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  model::{ClassAttendanceEntry, NewAttendance, StudentAttendanceEntry, parse_date},
  store::AttendanceStore,
};

use crate::{
  Created,
  error::ApiError,
  extract::{Body, Params},
};

/// `POST /attendance`, returns 201 + `{id, message}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Body(body): Body<NewAttendance>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  let (student_id, class_id) = (body.student_id, body.class_id);
  let id = store
    .record_attendance(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(record_id = id, student_id, class_id, "attendance recorded");
  Ok((
    StatusCode::CREATED,
    Json(Created::new(id, "Attendance marked successfully")),
  ))
}

/// `GET /attendance/:class_id/:date`
pub async fn for_class<S>(
  State(store): State<Arc<S>>,
  Params((class_id, date)): Params<(i64, String)>,
) -> Result<Json<Vec<ClassAttendanceEntry>>, ApiError>
where
  S: AttendanceStore,
{
  let date = parse_date(&date).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let entries = store
    .class_attendance(class_id, date)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

/// `GET /attendance/student/:student_id`
pub async fn for_student<S>(
  State(store): State<Arc<S>>,
  Params(student_id): Params<i64>,
) -> Result<Json<Vec<StudentAttendanceEntry>>, ApiError>
where
  S: AttendanceStore,
{
  let entries = store
    .student_attendance(student_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}
