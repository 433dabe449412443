//! Email address type.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a string was rejected as an [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
  #[error("email cannot be empty")]
  Empty,
  #[error("email must be at most {max} characters")]
  TooLong { max: usize },
  #[error("email must not contain whitespace")]
  Whitespace,
  #[error("email must contain exactly one @ symbol")]
  AtSymbol,
  #[error("email local part cannot be empty")]
  EmptyLocalPart,
  #[error("email domain must be a dotted host name")]
  BadDomain,
}

/// A syntactically valid email address.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed before checking
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Exactly one `@`, with a non-empty local part before it
/// - The domain contains a `.` that is neither its first nor last character
///
/// The domain part is stored lower-cased, so addresses that differ only in
/// the case of their host name compare equal. The local part is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
  pub const MAX_LENGTH: usize = 254;

  pub fn parse(s: &str) -> Result<Self, EmailError> {
    let s = s.trim();
    if s.is_empty() {
      return Err(EmailError::Empty);
    }
    if s.len() > Self::MAX_LENGTH {
      return Err(EmailError::TooLong { max: Self::MAX_LENGTH });
    }
    if s.chars().any(char::is_whitespace) {
      return Err(EmailError::Whitespace);
    }

    let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
    if domain.contains('@') {
      return Err(EmailError::AtSymbol);
    }
    if local.is_empty() {
      return Err(EmailError::EmptyLocalPart);
    }
    let dotted = domain
      .find('.')
      .is_some_and(|i| i > 0 && !domain.ends_with('.'));
    if !dotted || domain.contains("..") {
      return Err(EmailError::BadDomain);
    }

    Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
  }

  pub fn as_str(&self) -> &str { &self.0 }

}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl std::str::FromStr for Email {
  type Err = EmailError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<String> for Email {
  type Error = EmailError;

  fn try_from(s: String) -> Result<Self, Self::Error> { Self::parse(&s) }
}

impl From<Email> for String {
  fn from(e: Email) -> Self { e.0 }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str { &self.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_ordinary_addresses() {
    assert!(Email::parse("a@x.com").is_ok());
    assert!(Email::parse("user.name+tag@mail.example.co.uk").is_ok());
  }

  #[test]
  fn trims_surrounding_whitespace() {
    assert_eq!(Email::parse("  a@x.com \n").unwrap().as_str(), "a@x.com");
  }

  #[test]
  fn lowercases_the_domain_only() {
    assert_eq!(
      Email::parse("Jo.Smith@Mail.EXAMPLE.com").unwrap().as_str(),
      "Jo.Smith@mail.example.com"
    );
    assert_eq!(Email::parse("a@X.COM").unwrap(), Email::parse("a@x.com").unwrap());
  }

  #[test]
  fn rejects_malformed_addresses() {
    assert_eq!(Email::parse(""), Err(EmailError::Empty));
    assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::AtSymbol));
    assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::AtSymbol));
    assert_eq!(Email::parse("@x.com"), Err(EmailError::EmptyLocalPart));
    assert_eq!(Email::parse("a@localhost"), Err(EmailError::BadDomain));
    assert_eq!(Email::parse("a@.com"), Err(EmailError::BadDomain));
    assert_eq!(Email::parse("a@x."), Err(EmailError::BadDomain));
    assert_eq!(Email::parse("a b@x.com"), Err(EmailError::Whitespace));
  }

  #[test]
  fn rejects_overlong_addresses() {
    let long = format!("{}@example.com", "a".repeat(250));
    assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
  }

  #[test]
  fn deserialising_validates() {
    assert!(serde_json::from_str::<Email>("\"a@x.com\"").is_ok());
    assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
  }
}
