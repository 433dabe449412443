//! Timestamp policy shared by every backend.
//!
//! Timestamps carry microsecond precision so they survive a round trip
//! through fixed-width RFC 3339 text unchanged.

use chrono::{DateTime, SubsecRound as _, TimeDelta, Utc};

/// The current instant, truncated to microseconds.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

/// The `updated_at` stamp for a mutation of a row last stamped at
/// `previous`. Always strictly later than `previous`, even if the wall clock
/// has not moved or has stepped backwards.
pub fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
  now().max(previous + TimeDelta::microseconds(1))
}
