//! Status enums and their transition guards.
//!
//! Every status column is a closed enum; a value outside the domain cannot be
//! constructed, only rejected at the validation layer. Every transition
//! between two states of the same enum is legal. What a transition can carry
//! is a [`Guard`]: an extra check the repository must pass before it commits
//! the new state.

use serde::{Deserialize, Serialize};

/// A precondition attached to a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
  /// No precondition.
  Free,
  /// The store must be complete enough to publish; see
  /// [`Store::publish_blockers`](crate::storefront::Store::publish_blockers).
  Completeness,
}

/// A status field with an initial state and per-transition guards.
pub trait Lifecycle: Copy + Eq + Default {
  /// The state every new row starts in.
  fn initial() -> Self { Self::default() }

  /// The guard on moving from `self` to `next`.
  fn guard(self, next: Self) -> Guard;
}

/// Declares a status enum; the first variant is the initial state.
macro_rules! status_enum {
  ($(#[$meta:meta])* $name:ident { $first:ident $(, $variant:ident)* $(,)? }) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
      strum::Display, strum::AsRefStr, strum::EnumString, strum::VariantNames,
    )]
    #[serde(rename_all = "snake_case")]
    #[strum(serialize_all = "snake_case")]
    pub enum $name {
      #[default]
      $first,
      $($variant),*
    }
  };
}

status_enum!(
  /// Billing state of a user account. Set by self-service updates and by the
  /// external billing system.
  SubscriptionStatus { Trial, Active, Cancelled, Expired }
);

status_enum!(
  /// Publication state of a storefront.
  StoreStatus { Draft, Published, Maintenance }
);

status_enum!(
  /// Publication state of a content record.
  ContentStatus { Draft, Published, Archived }
);

impl Lifecycle for SubscriptionStatus {
  fn guard(self, _next: Self) -> Guard { Guard::Free }
}

impl Lifecycle for StoreStatus {
  /// Publishing is checked on every request that asks for it, including
  /// re-publishing a store that is already live.
  fn guard(self, next: Self) -> Guard {
    match next {
      Self::Published => Guard::Completeness,
      Self::Draft | Self::Maintenance => Guard::Free,
    }
  }
}

impl Lifecycle for ContentStatus {
  fn guard(self, _next: Self) -> Guard { Guard::Free }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn initial_states() {
    assert_eq!(SubscriptionStatus::initial(), SubscriptionStatus::Trial);
    assert_eq!(StoreStatus::initial(), StoreStatus::Draft);
    assert_eq!(ContentStatus::initial(), ContentStatus::Draft);
  }

  #[test]
  fn only_publishing_a_store_is_guarded() {
    use StoreStatus::*;
    for from in [Draft, Published, Maintenance] {
      assert_eq!(from.guard(Published), Guard::Completeness);
      assert_eq!(from.guard(Draft), Guard::Free);
      assert_eq!(from.guard(Maintenance), Guard::Free);
    }
  }

  #[test]
  fn subscription_and_content_moves_are_free() {
    use SubscriptionStatus::*;
    for (a, b) in [(Trial, Active), (Active, Cancelled), (Active, Expired), (Cancelled, Active)] {
      assert_eq!(a.guard(b), Guard::Free);
    }
    use ContentStatus::*;
    for (a, b) in [(Draft, ContentStatus::Published), (ContentStatus::Published, Archived), (Archived, Draft)] {
      assert_eq!(a.guard(b), Guard::Free);
    }
  }

  #[test]
  fn wire_names_are_snake_case() {
    assert_eq!(StoreStatus::Maintenance.as_ref(), "maintenance");
    assert_eq!("cancelled".parse::<SubscriptionStatus>().unwrap(), SubscriptionStatus::Cancelled);
    assert!("Cancelled".parse::<SubscriptionStatus>().is_err());
    assert_eq!(serde_json::to_string(&ContentStatus::Archived).unwrap(), "\"archived\"");
  }
}
