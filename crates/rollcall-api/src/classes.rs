//! Handlers for `/classes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/classes` | All classes |
//! | `POST` | `/classes` | Body: `{"name":"...","teacher":"...","schedule":"..."}` |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rollcall_core::{
  model::{Class, NewClass},
  store::AttendanceStore,
};

use crate::{Created, error::ApiError, extract::Body};

/// `GET /classes`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Class>>, ApiError>
where
  S: AttendanceStore,
{
  let classes = store.list_classes().await.map_err(ApiError::store)?;
  Ok(Json(classes))
}

/// `POST /classes`, returns 201 + `{id, message}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Body(body): Body<NewClass>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  if body.name.trim().is_empty() || body.teacher.trim().is_empty() {
    return Err(ApiError::BadRequest("name and teacher are required".into()));
  }
  let id = store.add_class(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created::new(id, "Class added successfully"))))
}
