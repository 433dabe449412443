//! `GET /healthcheck`: liveness probe; touches no storage.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

pub async fn handler() -> Json<Value> {
  Json(json!({
    "status": "ok",
    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
  }))
}
