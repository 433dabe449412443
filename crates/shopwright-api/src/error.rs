//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use shopwright_core::{DomainError, Error as DomainErr, Violations};
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A failure the domain model defines; mapped to a 4xx.
  #[error(transparent)]
  Domain(#[from] DomainErr),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: domain failures keep their kind, anything
  /// else becomes an opaque storage failure.
  pub fn repo<E>(err: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    match err.domain() {
      Some(domain) => Self::Domain(domain.clone()),
      None => Self::Store(Box::new(err)),
    }
  }
}

impl From<Violations> for ApiError {
  fn from(v: Violations) -> Self { Self::Domain(DomainErr::Validation(v)) }
}

fn domain_body(err: &DomainErr) -> (StatusCode, Value) {
  let message = err.to_string();
  match err {
    DomainErr::Validation(violations) => (
      StatusCode::UNPROCESSABLE_ENTITY,
      json!({ "error": message, "kind": "validation", "violations": violations }),
    ),
    DomainErr::NotFound { entity, id } => (
      StatusCode::NOT_FOUND,
      json!({ "error": message, "kind": "not_found", "entity": entity, "id": id }),
    ),
    DomainErr::UniquenessConflict { field, value } => (
      StatusCode::CONFLICT,
      json!({
        "error": message,
        "kind": "uniqueness_conflict",
        "field": field,
        "value": value,
      }),
    ),
    DomainErr::IncompleteStore(missing) => (
      StatusCode::CONFLICT,
      json!({ "error": message, "kind": "incomplete_store", "missing": missing }),
    ),
    DomainErr::ReferentialViolation { field, entity, id } => (
      StatusCode::UNPROCESSABLE_ENTITY,
      json!({
        "error": message,
        "kind": "referential_violation",
        "field": field,
        "entity": entity,
        "id": id,
      }),
    ),
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Domain(e) => domain_body(e),
      ApiError::Store(e) => {
        error!(error = %e, "storage failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": e.to_string(), "kind": "storage" }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
