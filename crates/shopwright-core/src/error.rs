//! Error types for `shopwright-core`.
//!
//! [`Error`] is the full failure taxonomy of the repository layer. Storage
//! backends wrap it in their own error type and expose it again through
//! [`DomainError`], so callers generic over a backend can still branch on the
//! failure kind.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ─── Entity ──────────────────────────────────────────────────────────────────

/// Names the table a failure refers to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
  User,
  Template,
  Store,
  Content,
  LandingPage,
}

// ─── Violations ──────────────────────────────────────────────────────────────

/// A single broken rule on a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub field:   &'static str,
  pub message: String,
}

/// Every rule an input broke, in field order. A validation pass never stops
/// at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
  pub fn single(field: &'static str, message: impl Into<String>) -> Self {
    let mut v = Self::default();
    v.push(field, message);
    v
  }

  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(Violation { field, message: message.into() });
  }

  /// Record the outcome of a rule check; `Ok` records nothing.
  pub fn check(&mut self, field: &'static str, outcome: Result<(), String>) {
    if let Err(message) = outcome {
      self.push(field, message);
    }
  }

  /// Absorb every violation from another pass.
  pub fn extend(&mut self, other: Violations) { self.0.extend(other.0); }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  /// `true` if any violation was recorded against `field`.
  pub fn touches(&self, field: &str) -> bool {
    self.0.iter().any(|v| v.field == field)
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, v) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", v.field, v.message)?;
    }
    Ok(())
  }
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(Violations),

  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("{field} {value:?} is already taken")]
  UniquenessConflict { field: &'static str, value: String },

  #[error("store is not ready to publish: {}", .0.join(", "))]
  IncompleteStore(Vec<String>),

  #[error("{field} references unknown {entity} {id}")]
  ReferentialViolation {
    field:  &'static str,
    entity: Entity,
    id:     i64,
  },
}

impl From<Violations> for Error {
  fn from(v: Violations) -> Self { Self::Validation(v) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by backend error types so generic layers can recover the
/// domain failure, if there is one, behind a storage error.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}
