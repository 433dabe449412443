//! Small query helpers shared by the per-table modules.

use rusqlite::{Connection, OptionalExtension as _, ffi, params};
use shopwright_core::Entity;
use tracing::warn;

use crate::{Error, Result};

/// Whether `err` is SQLite rejecting a write against a unique index.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

pub fn conflict(field: &'static str, value: &str) -> Error {
  shopwright_core::Error::UniquenessConflict { field, value: value.to_owned() }.into()
}

/// Translate a failed `INSERT`/`UPDATE`. The explicit check inside the same
/// transaction should make a unique-index rejection unreachable; if one
/// still happens it is reported as the same conflict.
pub fn write_error(err: rusqlite::Error, field: &'static str, value: &str) -> Error {
  if is_unique_violation(&err) {
    warn!(field, value, "unique index rejected a write that passed the pre-check");
    conflict(field, value)
  } else {
    Error::Sqlite(err)
  }
}

fn table(entity: Entity) -> &'static str {
  match entity {
    Entity::User => "users",
    Entity::Template => "templates",
    Entity::Store => "stores",
    Entity::Content => "content",
    Entity::LandingPage => "landing_pages",
  }
}

pub fn exists(conn: &Connection, entity: Entity, id: i64) -> Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table(entity));
  Ok(conn.query_row(&sql, params![id], |_| Ok(())).optional()?.is_some())
}

/// Fail with `NotFound` unless the row exists.
pub fn require(conn: &Connection, entity: Entity, id: i64) -> Result<()> {
  if exists(conn, entity, id)? {
    Ok(())
  } else {
    Err(not_found(entity, id))
  }
}

/// Fail with `ReferentialViolation` unless the referenced row exists.
pub fn require_reference(
  conn: &Connection,
  field: &'static str,
  entity: Entity,
  id: i64,
) -> Result<()> {
  if exists(conn, entity, id)? {
    Ok(())
  } else {
    Err(shopwright_core::Error::ReferentialViolation { field, entity, id }.into())
  }
}

pub fn not_found(entity: Entity, id: i64) -> Error {
  shopwright_core::Error::NotFound { entity, id }.into()
}
