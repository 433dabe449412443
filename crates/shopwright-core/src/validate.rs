//! The validation layer.
//!
//! A [`Record`] wraps an untyped JSON object and hands out typed field values
//! while collecting a [`Violation`](crate::error::Violation) for every rule a
//! field breaks. Callers pull every field first and only then decide whether
//! the record is acceptable, so the caller always sees the complete list.
//!
//! The `rules` functions operate on plain `&str` and are shared with the
//! `validate` methods of the typed inputs, which the repository runs on
//! inputs built directly in Rust.

use std::str::FromStr;

use serde_json::{Map, Value};
use strum::VariantNames;

use crate::{email::Email, error::Violations, patch::Patch};

// ─── Record ──────────────────────────────────────────────────────────────────

enum Slot<'a> {
  Absent,
  Null,
  Present(&'a Value),
}

/// A borrowed JSON object being turned into a typed input.
pub struct Record<'a> {
  fields:     &'a Map<String, Value>,
  violations: Violations,
}

impl<'a> Record<'a> {
  pub fn new(value: &'a Value) -> Result<Self, Violations> {
    match value.as_object() {
      Some(fields) => Ok(Self { fields, violations: Violations::default() }),
      None => Err(Violations::single("body", "must be a JSON object")),
    }
  }

  fn slot(&self, field: &str) -> Slot<'a> {
    match self.fields.get(field) {
      None => Slot::Absent,
      Some(Value::Null) => Slot::Null,
      Some(v) => Slot::Present(v),
    }
  }

  fn convert<T>(
    &mut self,
    field: &'static str,
    value: &Value,
    rule: impl FnOnce(&Value) -> Result<T, String>,
  ) -> Option<T> {
    match rule(value) {
      Ok(v) => Some(v),
      Err(message) => {
        self.violations.push(field, message);
        None
      }
    }
  }

  /// A field that must be present and non-null.
  pub fn required<T>(
    &mut self,
    field: &'static str,
    rule: impl FnOnce(&Value) -> Result<T, String>,
  ) -> Option<T> {
    match self.slot(field) {
      Slot::Absent => {
        self.violations.push(field, "is required");
        None
      }
      Slot::Null => {
        self.violations.push(field, "must not be null");
        None
      }
      Slot::Present(v) => self.convert(field, v, rule),
    }
  }

  /// A non-nullable field that may be omitted; `None` when absent (or
  /// invalid).
  pub fn optional<T>(
    &mut self,
    field: &'static str,
    rule: impl FnOnce(&Value) -> Result<T, String>,
  ) -> Option<T> {
    match self.slot(field) {
      Slot::Absent => None,
      Slot::Null => {
        self.violations.push(field, "must not be null");
        None
      }
      Slot::Present(v) => self.convert(field, v, rule),
    }
  }

  /// A nullable field; keeps the absent / null / value distinction.
  pub fn nullable<T>(
    &mut self,
    field: &'static str,
    rule: impl FnOnce(&Value) -> Result<T, String>,
  ) -> Patch<T> {
    match self.slot(field) {
      Slot::Absent => Patch::Absent,
      Slot::Null => Patch::Null,
      Slot::Present(v) => match self.convert(field, v, rule) {
        Some(v) => Patch::Value(v),
        None => Patch::Absent,
      },
    }
  }

  /// Fold in violations found by a check that runs outside the record.
  pub fn absorb(&mut self, violations: Violations) { self.violations.extend(violations); }

  pub fn into_violations(self) -> Violations { self.violations }

  pub fn finish(self) -> Result<(), Violations> {
    self.violations.into_result()
  }
}

// ─── Value rules ─────────────────────────────────────────────────────────────

fn string(v: &Value) -> Result<&str, String> {
  v.as_str().ok_or_else(|| "must be a string".to_owned())
}

/// Free text with at least one non-whitespace character.
pub fn text(v: &Value) -> Result<String, String> {
  let s = string(v)?;
  rules::non_empty(s)?;
  Ok(s.to_owned())
}

/// Any string, including the empty one.
pub fn any_text(v: &Value) -> Result<String, String> {
  string(v).map(str::to_owned)
}

pub fn email(v: &Value) -> Result<Email, String> {
  Email::parse(string(v)?).map_err(|e| e.to_string())
}

pub fn url(v: &Value) -> Result<String, String> {
  let s = string(v)?;
  rules::absolute_url(s)?;
  Ok(s.to_owned())
}

pub fn slug(v: &Value) -> Result<String, String> {
  let s = string(v)?;
  rules::slug(s)?;
  Ok(s.to_owned())
}

/// A host name, trimmed and lower-cased.
pub fn domain(v: &Value) -> Result<String, String> {
  let s = rules::normalize_domain(string(v)?);
  rules::domain(&s)?;
  Ok(s)
}

pub fn boolean(v: &Value) -> Result<bool, String> {
  v.as_bool().ok_or_else(|| "must be a boolean".to_owned())
}

pub fn integer(v: &Value) -> Result<i64, String> {
  v.as_i64().ok_or_else(|| "must be an integer".to_owned())
}

/// A row id: a positive integer.
pub fn id(v: &Value) -> Result<i64, String> {
  match v.as_i64() {
    Some(n) if n > 0 => Ok(n),
    _ => Err("must be a positive integer".to_owned()),
  }
}

/// A member of a closed string enumeration.
pub fn choice<E>(v: &Value) -> Result<E, String>
where
  E: FromStr + VariantNames,
{
  let s = string(v)?;
  s.parse()
    .map_err(|_| format!("must be one of: {}", E::VARIANTS.join(", ")))
}

// ─── Query-string rules ──────────────────────────────────────────────────────
//
// Query parameters arrive as text; these accept the decimal or `true`/`false`
// spelling as well as the JSON scalar.

fn numeric_text(v: &Value) -> Option<i64> {
  match v {
    Value::String(s) => s.trim().parse().ok(),
    other => other.as_i64(),
  }
}

pub fn integer_param(v: &Value) -> Result<i64, String> {
  numeric_text(v).ok_or_else(|| "must be an integer".to_owned())
}

pub fn id_param(v: &Value) -> Result<i64, String> {
  match numeric_text(v) {
    Some(n) if n > 0 => Ok(n),
    _ => Err("must be a positive integer".to_owned()),
  }
}

pub fn boolean_param(v: &Value) -> Result<bool, String> {
  match v {
    Value::Bool(b) => Ok(*b),
    Value::String(s) if s == "true" => Ok(true),
    Value::String(s) if s == "false" => Ok(false),
    _ => Err("must be true or false".to_owned()),
  }
}

// ─── String rules ────────────────────────────────────────────────────────────

pub mod rules {
  //! Checks on already-extracted strings.

  pub fn non_empty(s: &str) -> Result<(), String> {
    if s.trim().is_empty() {
      Err("must not be empty".to_owned())
    } else {
      Ok(())
    }
  }

  /// Slugs appear in URLs: lowercase ASCII letters, digits, `-` and `_`.
  pub fn slug(s: &str) -> Result<(), String> {
    non_empty(s)?;
    let safe = s
      .chars()
      .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if safe {
      Ok(())
    } else {
      Err("may only contain a-z, 0-9, '-' and '_'".to_owned())
    }
  }

  pub fn normalize_domain(s: &str) -> String { s.trim().to_ascii_lowercase() }

  pub fn domain(s: &str) -> Result<(), String> {
    non_empty(s)?;
    if s.chars().any(|c| c.is_whitespace() || c == '/') {
      Err("must be a bare host name".to_owned())
    } else {
      Ok(())
    }
  }

  pub fn absolute_url(s: &str) -> Result<(), String> {
    match url::Url::parse(s) {
      Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => Ok(()),
      _ => Err("must be an absolute http(s) URL".to_owned()),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::lifecycle::StoreStatus;

  #[test]
  fn rejects_non_objects() {
    let body = json!([1, 2]);
    let err = Record::new(&body).err().unwrap();
    assert!(err.touches("body"));
  }

  #[test]
  fn required_reports_absent_and_null() {
    let body = json!({ "b": null });
    let mut r = Record::new(&body).unwrap();
    assert!(r.required("a", text).is_none());
    assert!(r.required("b", text).is_none());
    let v = r.into_violations();
    assert_eq!(v.len(), 2);
    assert!(v.touches("a") && v.touches("b"));
  }

  #[test]
  fn nullable_keeps_three_states() {
    let body = json!({ "cleared": null, "set": "x" });
    let mut r = Record::new(&body).unwrap();
    assert_eq!(r.nullable("missing", any_text), Patch::Absent);
    assert_eq!(r.nullable("cleared", any_text), Patch::Null);
    assert_eq!(r.nullable("set", any_text), Patch::Value("x".to_owned()));
    assert!(r.finish().is_ok());
  }

  #[test]
  fn optional_rejects_null() {
    let body = json!({ "name": null });
    let mut r = Record::new(&body).unwrap();
    assert!(r.optional("name", text).is_none());
    assert!(r.into_violations().touches("name"));
  }

  #[test]
  fn collects_every_violation() {
    let body = json!({ "title": "  ", "count": "x", "flag": 3 });
    let mut r = Record::new(&body).unwrap();
    r.required("title", text);
    r.required("count", integer);
    r.required("flag", boolean);
    r.required("missing", text);
    assert_eq!(r.into_violations().len(), 4);
  }

  #[test]
  fn choice_lists_the_domain() {
    let err = choice::<StoreStatus>(&json!("live")).unwrap_err();
    assert!(err.contains("draft, published, maintenance"), "{err}");
    assert_eq!(
      choice::<StoreStatus>(&json!("published")).unwrap(),
      StoreStatus::Published
    );
  }

  #[test]
  fn url_requires_absolute_http() {
    assert!(url(&json!("https://example.com/start")).is_ok());
    assert!(url(&json!("/relative")).is_err());
    assert!(url(&json!("mailto:a@x.com")).is_err());
    assert!(url(&json!("not a url")).is_err());
  }

  #[test]
  fn slug_must_be_url_safe() {
    assert!(slug(&json!("about-us_2")).is_ok());
    assert!(slug(&json!("About Us")).is_err());
    assert!(slug(&json!("")).is_err());
  }

  #[test]
  fn domain_is_normalised() {
    assert_eq!(domain(&json!("  Shop.Test ")).unwrap(), "shop.test");
    assert!(domain(&json!("shop.test/path")).is_err());
  }

  #[test]
  fn query_params_parse_from_text() {
    assert_eq!(integer_param(&json!("40")).unwrap(), 40);
    assert!(integer_param(&json!("abc")).is_err());
    assert_eq!(id_param(&json!("7")).unwrap(), 7);
    assert!(id_param(&json!("-7")).is_err());
    assert!(boolean_param(&json!("true")).unwrap());
    assert!(boolean_param(&json!("yes")).is_err());
  }

  #[test]
  fn id_must_be_positive() {
    assert_eq!(id(&json!(4)).unwrap(), 4);
    assert!(id(&json!(0)).is_err());
    assert!(id(&json!("4")).is_err());
  }
}
