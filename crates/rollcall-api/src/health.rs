//! Handler for `GET /health`.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:  &'static str,
  pub message: &'static str,
}

/// `GET /health`
pub async fn handler() -> Json<Health> {
  Json(Health { status: "ok", message: "Server is running" })
}
