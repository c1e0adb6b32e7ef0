//! Request extractors whose rejections render as [`ApiError`].

use axum::extract::{
  FromRequest, FromRequestParts,
  rejection::{JsonRejection, PathRejection},
};

use crate::error::ApiError;

/// JSON request body. A malformed or incomplete body is a 400 `{error}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Body<T>(pub T);

/// Typed path segments. A segment that does not parse is a 400 `{error}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Params<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}
