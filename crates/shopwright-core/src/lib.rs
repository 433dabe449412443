//! Core types and trait definitions for the Shopwright storefront CMS.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! owns the data model, the validation layer, the status lifecycles and the
//! selection policy; backends implement [`repository::Repository`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod content;
pub mod email;
pub mod error;
pub mod id;
pub mod landing;
pub mod lifecycle;
pub mod patch;
pub mod repository;
pub mod selection;
pub mod storefront;
pub mod template;
pub mod user;
pub mod validate;

pub use error::{DomainError, Entity, Error, Result, Violation, Violations};
pub use patch::Patch;
