//! Async HTTP client wrapping the Rollcall JSON API.
//!
//! [`ApiClient`] implements [`AttendanceStore`], so the scan workflow runs
//! against the server exactly as it would against a local store.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use rollcall_core::{
  model::{
    Class, ClassAttendanceEntry, DATE_FORMAT, NewAttendance, NewClass,
    NewStudent, Student, StudentAttendanceEntry,
  },
  store::{AttendanceStore, FailureKind, StoreError},
};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

/// Upper bound on any single request; a hung server surfaces as an error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("{path}: {source}")]
  Transport {
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{path} → {status}: {message}")]
  Status {
    path:    String,
    status:  StatusCode,
    message: String,
  },
}

impl StoreError for ClientError {
  fn kind(&self) -> FailureKind {
    match self {
      ClientError::Status { status, .. } if *status == StatusCode::CONFLICT => {
        FailureKind::Conflict
      }
      _ => FailureKind::Other,
    }
  }
}

/// Shape of an API error body.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct Created {
  id: i64,
}

/// Async HTTP client for the Rollcall JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .map_err(ClientError::Build)?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  async fn send<T: DeserializeOwned>(
    &self,
    path: String,
    req: RequestBuilder,
  ) -> Result<T, ClientError> {
    let resp = match req.send().await {
      Ok(resp) => resp,
      Err(source) => return Err(ClientError::Transport { path, source }),
    };

    let status = resp.status();
    if !status.is_success() {
      let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("error").to_owned(),
      };
      return Err(ClientError::Status { path, status, message });
    }

    resp
      .json()
      .await
      .map_err(|source| ClientError::Transport { path, source })
  }

  async fn get<T: DeserializeOwned>(&self, path: String) -> Result<T, ClientError> {
    let req = self.client.get(self.url(&path));
    self.send(path, req).await
  }

  async fn create<B>(&self, path: &str, body: &B) -> Result<i64, ClientError>
  where
    B: serde::Serialize + Sync,
  {
    let req = self.client.post(self.url(path)).json(body);
    let created: Created = self.send(path.to_owned(), req).await?;
    Ok(created.id)
  }
}

impl AttendanceStore for ApiClient {
  type Error = ClientError;

  /// `GET /api/classes`
  async fn list_classes(&self) -> Result<Vec<Class>, ClientError> {
    self.get("/classes".to_owned()).await
  }

  /// `POST /api/classes`
  async fn add_class(&self, input: NewClass) -> Result<i64, ClientError> {
    self.create("/classes", &input).await
  }

  /// `GET /api/students` or `GET /api/students/class/<id>`
  async fn list_students(
    &self,
    class_id: Option<i64>,
  ) -> Result<Vec<Student>, ClientError> {
    let path = match class_id {
      Some(id) => format!("/students/class/{id}"),
      None => "/students".to_owned(),
    };
    self.get(path).await
  }

  /// `POST /api/students`
  async fn add_student(&self, input: NewStudent) -> Result<i64, ClientError> {
    self.create("/students", &input).await
  }

  /// `POST /api/attendance`
  async fn record_attendance(
    &self,
    input: NewAttendance,
  ) -> Result<i64, ClientError> {
    self.create("/attendance", &input).await
  }

  /// `GET /api/attendance/<class_id>/<date>`
  async fn class_attendance(
    &self,
    class_id: i64,
    date: NaiveDate,
  ) -> Result<Vec<ClassAttendanceEntry>, ClientError> {
    self
      .get(format!("/attendance/{class_id}/{}", date.format(DATE_FORMAT)))
      .await
  }

  /// `GET /api/attendance/student/<student_id>`
  async fn student_attendance(
    &self,
    student_id: i64,
  ) -> Result<Vec<StudentAttendanceEntry>, ClientError> {
    self.get(format!("/attendance/student/{student_id}")).await
  }
}
