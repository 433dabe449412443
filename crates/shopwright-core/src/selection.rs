//! Picking the one record that answers "which is current?".
//!
//! Among the eligible candidates the most recently updated wins, with the
//! greater id breaking a tie. No eligible candidate is a normal outcome and
//! yields `None`.

use chrono::{DateTime, Utc};

/// A record that can compete for "current".
pub trait Candidate {
  /// Whether the record's active/published flag admits it at all.
  fn is_eligible(&self) -> bool;

  /// `(updated_at, id)`: the candidate with the greatest key wins.
  fn recency(&self) -> (DateTime<Utc>, i64);
}

pub fn select_current<T, I>(candidates: I) -> Option<T>
where
  T: Candidate,
  I: IntoIterator<Item = T>,
{
  candidates
    .into_iter()
    .filter(Candidate::is_eligible)
    .max_by_key(Candidate::recency)
}
