//! Handlers for `/landing-page` endpoints.
//!
//! `GET /landing-page` answers with the active page, or `null` when every
//! page is inactive.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use shopwright_core::{
  id::LandingPageId,
  landing::{LandingPage, LandingPagePatch, NewLandingPage},
  repository::Repository,
};

use crate::error::ApiError;

/// `GET /landing-page`
pub async fn active<S: Repository>(
  State(repo): State<Arc<S>>,
) -> Result<Json<Option<LandingPage>>, ApiError> {
  let page = repo.active_landing_page().await.map_err(ApiError::repo)?;
  Ok(Json(page))
}

/// `POST /landing-page`
pub async fn create<S: Repository>(
  State(repo): State<Arc<S>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewLandingPage::from_json(&body)?;
  let page = repo
    .create_landing_page(input)
    .await
    .map_err(ApiError::repo)?;
  Ok((StatusCode::CREATED, Json(page)))
}

/// `GET /landing-page/{id}`
pub async fn get_one<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<LandingPageId>,
) -> Result<Json<LandingPage>, ApiError> {
  let page = repo.get_landing_page(id).await.map_err(ApiError::repo)?;
  Ok(Json(page))
}

/// `PATCH /landing-page/{id}`
pub async fn update<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<LandingPageId>,
  Json(body): Json<Value>,
) -> Result<Json<LandingPage>, ApiError> {
  let patch = LandingPagePatch::from_json(&body)?;
  let page = repo
    .update_landing_page(id, patch)
    .await
    .map_err(ApiError::repo)?;
  Ok(Json(page))
}
