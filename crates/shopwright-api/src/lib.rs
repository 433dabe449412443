//! JSON REST API for the Shopwright storefront CMS.
//!
//! Exposes an axum [`Router`] backed by any [`Repository`]. Request bodies are
//! taken as untyped JSON and run through the core validation layer, so a bad
//! request reports every broken rule at once. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", shopwright_api::api_router(repo.clone()))
//! ```

pub mod content;
pub mod error;
pub mod health;
pub mod landing;
pub mod query;
pub mod stores;
pub mod templates;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use shopwright_core::repository::Repository;

pub use error::ApiError;

/// Build a fully-materialised API router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(repo: Arc<S>) -> Router<()>
where
  S: Repository + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>).patch(users::update::<S>))
    // Templates
    .route(
      "/templates",
      get(templates::list::<S>).post(templates::create::<S>),
    )
    .route("/templates/current", get(templates::current::<S>))
    .route(
      "/templates/{id}",
      get(templates::get_one::<S>).patch(templates::update::<S>),
    )
    // Stores
    .route("/stores", get(stores::list::<S>).post(stores::create::<S>))
    .route("/stores/current", get(stores::current::<S>))
    .route(
      "/stores/{id}",
      get(stores::get_one::<S>)
        .patch(stores::update::<S>)
        .delete(stores::delete::<S>),
    )
    // Content
    .route("/content", get(content::list::<S>).post(content::create::<S>))
    .route(
      "/content/{id}",
      get(content::get_one::<S>)
        .patch(content::update::<S>)
        .delete(content::delete::<S>),
    )
    // Landing page
    .route(
      "/landing-page",
      get(landing::active::<S>).post(landing::create::<S>),
    )
    .route(
      "/landing-page/{id}",
      get(landing::get_one::<S>).patch(landing::update::<S>),
    )
    .route("/healthcheck", get(health::handler))
    .with_state(repo)
}

// ─── Router tests ─────────────────────────────────────────────────────────────
