//! Handlers for `/users` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/users` | Optional `?subscription_status=`, `limit`, `offset` |
//! | `POST`  | `/users` | Body: `{"email","business_name","subscription_plan"?}` |
//! | `GET`   | `/users/{id}` | 404 if not found |
//! | `PATCH` | `/users/{id}` | Only the provided fields change |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use shopwright_core::{
  id::UserId,
  repository::{Repository, UserFilter},
  user::{NewUser, User, UserPatch},
};

use crate::{error::ApiError, query};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S: Repository>(
  State(repo): State<Arc<S>>,
  Query(params): Query<query::Params>,
) -> Result<Json<Vec<User>>, ApiError> {
  let filter = UserFilter::from_query(&query::object(params))?;
  let users = repo.list_users(filter).await.map_err(ApiError::repo)?;
  Ok(Json(users))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn create<S: Repository>(
  State(repo): State<Arc<S>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewUser::from_json(&body)?;
  let user = repo.create_user(input).await.map_err(ApiError::repo)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
  let user = repo.get_user(id).await.map_err(ApiError::repo)?;
  Ok(Json(user))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /users/{id}`
pub async fn update<S: Repository>(
  State(repo): State<Arc<S>>,
  Path(id): Path<UserId>,
  Json(body): Json<Value>,
) -> Result<Json<User>, ApiError> {
  let patch = UserPatch::from_json(&body)?;
  let user = repo.update_user(id, patch).await.map_err(ApiError::repo)?;
  Ok(Json(user))
}
