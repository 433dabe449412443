//! Error type for `shopwright-store-sqlite`.

use shopwright_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A failure the domain model defines: validation, not-found, conflicts.
  #[error(transparent)]
  Domain(#[from] shopwright_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A stored value no longer decodes into its domain type.
  #[error("corrupt {column} value {value:?}: {reason}")]
  Decode {
    column: &'static str,
    value:  String,
    reason: String,
  },
}

impl Error {
  pub(crate) fn decode(
    column: &'static str,
    value: impl Into<String>,
    reason: impl ToString,
  ) -> Self {
    Self::Decode { column, value: value.into(), reason: reason.to_string() }
  }
}

impl From<shopwright_core::Violations> for Error {
  fn from(v: shopwright_core::Violations) -> Self {
    Self::Domain(shopwright_core::Error::Validation(v))
  }
}

impl DomainError for Error {
  fn domain(&self) -> Option<&shopwright_core::Error> {
    match self {
      Self::Domain(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
