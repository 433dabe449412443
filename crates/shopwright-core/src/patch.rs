//! Three-state optional values for partial updates.

/// One nullable field of a partial update.
///
/// A plain `Option` cannot tell "leave it alone" apart from "clear it", so
/// update inputs use this for every nullable column. Non-nullable columns
/// use `Option<T>` instead: there is no way to express a null for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
  /// The key was not supplied; keep the stored value.
  #[default]
  Absent,
  /// The key was supplied as null; clear the stored value.
  Null,
  /// The key was supplied with a value; store it.
  Value(T),
}

impl<T> Patch<T> {
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
    match self {
      Self::Absent => Patch::Absent,
      Self::Null => Patch::Null,
      Self::Value(v) => Patch::Value(f(v)),
    }
  }

  /// The supplied value, if one was supplied.
  pub fn value(&self) -> Option<&T> {
    match self {
      Self::Value(v) => Some(v),
      _ => None,
    }
  }

  /// Merge into a stored nullable value.
  pub fn apply_to(self, slot: &mut Option<T>) {
    match self {
      Self::Absent => {}
      Self::Null => *slot = None,
      Self::Value(v) => *slot = Some(v),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absent_keeps_existing_value() {
    let mut slot = Some("kept".to_string());
    Patch::Absent.apply_to(&mut slot);
    assert_eq!(slot.as_deref(), Some("kept"));
  }

  #[test]
  fn null_clears_existing_value() {
    let mut slot = Some("gone".to_string());
    Patch::<String>::Null.apply_to(&mut slot);
    assert!(slot.is_none());
  }

  #[test]
  fn value_replaces_existing_value() {
    let mut slot = None;
    Patch::Value(7).apply_to(&mut slot);
    assert_eq!(slot, Some(7));
  }

  #[test]
  fn map_preserves_the_state() {
    assert_eq!(Patch::<i64>::Absent.map(|n| n + 1), Patch::Absent);
    assert_eq!(Patch::<i64>::Null.map(|n| n + 1), Patch::Null);
    assert_eq!(Patch::Value(1).map(|n| n + 1), Patch::Value(2));
  }
}
