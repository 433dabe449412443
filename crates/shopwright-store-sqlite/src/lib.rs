//! SQLite backend for the Shopwright storefront repository.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each mutation is one `IMMEDIATE`
//! transaction.

mod content;
mod encode;
mod landing;
mod schema;
mod sql;
mod store;
mod stores;
mod templates;
mod users;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteRepository;

#[cfg(test)]
mod tests;
