//! Handlers for `/content` endpoints. Listing is always scoped to one store.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use shopwright_core::{
  content::{Content, ContentPatch, NewContent},
  id::ContentId,
  repository::{ContentFilter, Repository},
};

use crate::{error::ApiError, query};

/// `GET /content?store_id=<id>[&type=..][&status=..]`
pub async fn list<S: Repository>(
  State(repo): State<Arc<S>>,
  Query(params): Query<query::Params>,
) -> Result<Json<Vec<Content>>, ApiError> {
  let filter = ContentFilter::from_query(&query::object(params))?;
  let content = repo.list_content(filter).await.map_err(ApiError::repo)?;
  Ok(Json(content))
}

/// `POST /content`
pub async fn create<S: Repository>(
  State(repo): State<Arc<S>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewContent::from_json(&body)?;
  let content = repo.create_content(input).await.map_err(ApiError::repo)?;
  Ok((StatusCode::CREATED, Json(content)))
}

/// `GET /content/{id}`
pub async fn get_one<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<ContentId>,
) -> Result<Json<Content>, ApiError> {
  let content = repo.get_content(id).await.map_err(ApiError::repo)?;
  Ok(Json(content))
}

/// `PATCH /content/{id}`
pub async fn update<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<ContentId>,
  Json(body): Json<Value>,
) -> Result<Json<Content>, ApiError> {
  let patch = ContentPatch::from_json(&body)?;
  let content = repo
    .update_content(id, patch)
    .await
    .map_err(ApiError::repo)?;
  Ok(Json(content))
}

/// `DELETE /content/{id}`
pub async fn delete<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<ContentId>,
) -> Result<StatusCode, ApiError> {
  repo.delete_content(id).await.map_err(ApiError::repo)?;
  Ok(StatusCode::NO_CONTENT)
}
