//! Typed row identifiers.
//!
//! Ids are assigned by the storage engine in increasing order and never
//! change. Each table gets its own newtype so a `StoreId` cannot be passed
//! where a `ContentId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }
  };
}

id_type!(UserId);
id_type!(TemplateId);
id_type!(StoreId);
id_type!(ContentId);
id_type!(LandingPageId);
