//! HTTP server assembly for Rollcall.
//!
//! Mounts the Record Service under `/api` and wraps it in the transport
//! layers (CORS, request tracing) the API crate leaves to its caller.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, header::InvalidHeaderValue},
};
use rollcall_core::store::AttendanceStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROLLCALL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// Insert the sample classes and students into an empty store.
  #[serde(default = "default_true")]
  pub seed_sample_data: bool,
  /// Origins allowed to call the API from a browser. Empty allows any.
  #[serde(default)]
  pub cors_origins:     Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("rollcall.db") }

fn default_true() -> bool { true }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             default_host(),
      port:             default_port(),
      store_path:       default_store_path(),
      seed_sample_data: true,
      cors_origins:     Vec::new(),
    }
  }
}

impl ServerConfig {
  /// `host:port` to bind.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// CORS policy for the configured origins.
  pub fn cors_layer(&self) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = if self.cors_origins.is_empty() {
      AllowOrigin::any()
    } else {
      let origins = self
        .cors_origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;
      AllowOrigin::list(origins)
    };
    Ok(
      CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any),
    )
  }
}

/// `ROLLCALL_*` environment overrides. `ROLLCALL_CORS_ORIGINS` takes a
/// comma-separated list.
pub fn env_source() -> config::Environment {
  config::Environment::with_prefix("ROLLCALL")
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("cors_origins")
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn app<S>(store: Arc<S>, cors: CorsLayer) -> Router
where
  S: AttendanceStore + 'static,
{
  Router::new()
    .nest("/api", rollcall_api::api_router(store))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use rollcall_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_app(config: &ServerConfig) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    if config.seed_sample_data {
      store.seed_sample_data().await.unwrap();
    }
    app(Arc::new(store), config.cors_layer().unwrap())
  }

  #[test]
  fn defaults_fill_missing_keys() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("port", 8080)
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert!(cfg.seed_sample_data);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
  }

  #[test]
  fn env_overrides_scalars_and_origin_list() {
    let env = config::Map::from_iter([
      ("ROLLCALL_PORT".to_owned(), "8081".to_owned()),
      ("ROLLCALL_SEED_SAMPLE_DATA".to_owned(), "false".to_owned()),
      (
        "ROLLCALL_CORS_ORIGINS".to_owned(),
        "http://a.example,http://b.example".to_owned(),
      ),
    ]);
    let cfg: ServerConfig = config::Config::builder()
      .add_source(env_source().source(Some(env)))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 8081);
    assert!(!cfg.seed_sample_data);
    assert_eq!(cfg.cors_origins, ["http://a.example", "http://b.example"]);
    assert!(cfg.cors_layer().is_ok());
  }

  #[test]
  fn bad_origin_is_rejected() {
    let cfg = ServerConfig {
      cors_origins: vec!["http://ok.example".into(), "bad\norigin".into()],
      ..ServerConfig::default()
    };
    assert!(cfg.cors_layer().is_err());
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let app = make_app(&ServerConfig::default()).await;

    let req = Request::builder().uri("/api/classes").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let classes: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(classes.as_array().unwrap().len(), 5);

    let req = Request::builder().uri("/classes").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unseeded_store_starts_empty() {
    let cfg = ServerConfig { seed_sample_data: false, ..ServerConfig::default() };
    let app = make_app(&cfg).await;
    let req = Request::builder().uri("/api/students").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"[]");
  }

  #[tokio::test]
  async fn cors_allows_any_origin_by_default() {
    let app = make_app(&ServerConfig::default()).await;
    let req = Request::builder()
      .uri("/api/health")
      .header(header::ORIGIN, "http://localhost:5173")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "*"
    );
  }

  #[tokio::test]
  async fn cors_reflects_only_listed_origins() {
    let cfg = ServerConfig {
      cors_origins: vec!["http://scanner.local".into()],
      ..ServerConfig::default()
    };
    let app = make_app(&cfg).await;

    let req = Request::builder()
      .uri("/api/health")
      .header(header::ORIGIN, "http://scanner.local")
      .body(Body::empty())
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://scanner.local"
    );

    let req = Request::builder()
      .uri("/api/health")
      .header(header::ORIGIN, "http://elsewhere.example")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
  }
}
