//! Handlers for `/stores` endpoints.
//!
//! Publishing is a plain `PATCH` with `{"status":"published"}`; it answers
//! `409` with the list of missing requirements when the store is incomplete.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use shopwright_core::{
  id::{StoreId, UserId},
  repository::{Repository, StoreFilter},
  storefront::{NewStore, Store, StorePatch},
  validate::{self, Record},
};

use crate::{error::ApiError, query};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /stores`
pub async fn list<S: Repository>(
  State(repo): State<Arc<S>>,
  Query(params): Query<query::Params>,
) -> Result<Json<Vec<Store>>, ApiError> {
  let filter = StoreFilter::from_query(&query::object(params))?;
  let stores = repo.list_stores(filter).await.map_err(ApiError::repo)?;
  Ok(Json(stores))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /stores`. New stores are always drafts.
pub async fn create<S: Repository>(
  State(repo): State<Arc<S>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewStore::from_json(&body)?;
  let store = repo.create_store(input).await.map_err(ApiError::repo)?;
  Ok((StatusCode::CREATED, Json(store)))
}

// ─── Current ──────────────────────────────────────────────────────────────────

/// `GET /stores/current?user_id=<id>`
pub async fn current<S: Repository>(
  State(repo): State<Arc<S>>,
  Query(params): Query<query::Params>,
) -> Result<Json<Option<Store>>, ApiError> {
  let raw = query::object(params);
  let mut r = Record::new(&raw)?;
  let user_id = r.required("user_id", validate::id_param);
  let Some(user_id) = user_id else {
    return Err(r.into_violations().into());
  };
  r.finish()?;

  let store = repo.current_store(UserId(user_id)).await.map_err(ApiError::repo)?;
  Ok(Json(store))
}

// ─── Single store ─────────────────────────────────────────────────────────────

/// `GET /stores/{id}`
pub async fn get_one<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<StoreId>,
) -> Result<Json<Store>, ApiError> {
  let store = repo.get_store(id).await.map_err(ApiError::repo)?;
  Ok(Json(store))
}

/// `PATCH /stores/{id}`
pub async fn update<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<StoreId>,
  Json(body): Json<Value>,
) -> Result<Json<Store>, ApiError> {
  let patch = StorePatch::from_json(&body)?;
  let store = repo.update_store(id, patch).await.map_err(ApiError::repo)?;
  Ok(Json(store))
}

/// `DELETE /stores/{id}`. Removes the store's content too.
pub async fn delete<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<StoreId>,
) -> Result<StatusCode, ApiError> {
  repo.delete_store(id).await.map_err(ApiError::repo)?;
  Ok(StatusCode::NO_CONTENT)
}
