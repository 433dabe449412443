//! Handlers for `/templates` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/templates` | Optional `?category=`, `is_active`, `limit`, `offset` |
//! | `POST`  | `/templates` | `is_active` defaults to `true` |
//! | `GET`   | `/templates/current` | Optional `?category=`; `null` when none active |
//! | `GET`   | `/templates/{id}` | 404 if not found |
//! | `PATCH` | `/templates/{id}` | Deactivating never touches stores |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use shopwright_core::{
  id::TemplateId,
  repository::{Repository, TemplateFilter},
  template::{NewTemplate, Template, TemplateCategory, TemplatePatch},
  validate::{self, Record},
};

use crate::{error::ApiError, query};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /templates`
pub async fn list<S: Repository>(
  State(repo): State<Arc<S>>,
  Query(params): Query<query::Params>,
) -> Result<Json<Vec<Template>>, ApiError> {
  let filter = TemplateFilter::from_query(&query::object(params))?;
  let templates = repo.list_templates(filter).await.map_err(ApiError::repo)?;
  Ok(Json(templates))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /templates`
pub async fn create<S: Repository>(
  State(repo): State<Arc<S>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewTemplate::from_json(&body)?;
  let template = repo.create_template(input).await.map_err(ApiError::repo)?;
  Ok((StatusCode::CREATED, Json(template)))
}

// ─── Current ──────────────────────────────────────────────────────────────────

/// `GET /templates/current[?category=<category>]`
pub async fn current<S: Repository>(
  State(repo): State<Arc<S>>,
  Query(params): Query<query::Params>,
) -> Result<Json<Option<Template>>, ApiError> {
  let raw = query::object(params);
  let mut r = Record::new(&raw)?;
  let category = r.optional("category", validate::choice::<TemplateCategory>);
  r.finish()?;

  let template = repo
    .current_template(category)
    .await
    .map_err(ApiError::repo)?;
  Ok(Json(template))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /templates/{id}`
pub async fn get_one<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<TemplateId>,
) -> Result<Json<Template>, ApiError> {
  let template = repo.get_template(id).await.map_err(ApiError::repo)?;
  Ok(Json(template))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /templates/{id}`
pub async fn update<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<TemplateId>,
  Json(body): Json<Value>,
) -> Result<Json<Template>, ApiError> {
  let patch = TemplatePatch::from_json(&body)?;
  let template = repo
    .update_template(id, patch)
    .await
    .map_err(ApiError::repo)?;
  Ok(Json(template))
}
