//! LandingPage: the marketing page shown at the root of the builder.
//!
//! Several pages may be active at once; the one served is chosen by
//! [`select_current`](crate::selection::select_current).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  clock,
  error::Violations,
  id::LandingPageId,
  patch::Patch,
  selection::Candidate,
  validate::{self, Record, rules},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingPage {
  pub id:              LandingPageId,
  pub title:           String,
  pub subtitle:        Option<String>,
  pub intro_text:      String,
  pub cta_button_text: String,
  pub cta_button_url:  String,
  pub is_active:       bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl LandingPage {
  pub fn apply(&mut self, patch: LandingPagePatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    patch.subtitle.apply_to(&mut self.subtitle);
    if let Some(text) = patch.intro_text {
      self.intro_text = text;
    }
    if let Some(text) = patch.cta_button_text {
      self.cta_button_text = text;
    }
    if let Some(url) = patch.cta_button_url {
      self.cta_button_url = url;
    }
    if let Some(active) = patch.is_active {
      self.is_active = active;
    }
    self.updated_at = clock::advance(self.updated_at);
  }
}

impl Candidate for LandingPage {
  fn is_eligible(&self) -> bool { self.is_active }

  fn recency(&self) -> (DateTime<Utc>, i64) { (self.updated_at, self.id.get()) }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewLandingPage {
  pub title:           String,
  pub subtitle:        Option<String>,
  pub intro_text:      String,
  pub cta_button_text: String,
  pub cta_button_url:  String,
  pub is_active:       bool,
}

impl NewLandingPage {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let title = r.required("title", validate::text);
    let subtitle = r.nullable("subtitle", validate::any_text);
    let intro_text = r.required("intro_text", validate::text);
    let cta_button_text = r.required("cta_button_text", validate::text);
    let cta_button_url = r.required("cta_button_url", validate::url);
    let is_active = r.optional("is_active", validate::boolean);

    let (Some(title), Some(intro_text), Some(cta_button_text), Some(cta_button_url)) =
      (title, intro_text, cta_button_text, cta_button_url)
    else {
      return Err(r.into_violations());
    };
    r.finish()?;
    Ok(Self {
      title,
      subtitle: subtitle.value().cloned(),
      intro_text,
      cta_button_text,
      cta_button_url,
      is_active: is_active.unwrap_or(true),
    })
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    v.check("title", rules::non_empty(&self.title));
    v.check("intro_text", rules::non_empty(&self.intro_text));
    v.check("cta_button_text", rules::non_empty(&self.cta_button_text));
    v.check("cta_button_url", rules::absolute_url(&self.cta_button_url));
    v.into_result().map(|()| self)
  }
}

#[derive(Debug, Clone, Default)]
pub struct LandingPagePatch {
  pub title:           Option<String>,
  pub subtitle:        Patch<String>,
  pub intro_text:      Option<String>,
  pub cta_button_text: Option<String>,
  pub cta_button_url:  Option<String>,
  pub is_active:       Option<bool>,
}

impl LandingPagePatch {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let patch = Self {
      title:           r.optional("title", validate::text),
      subtitle:        r.nullable("subtitle", validate::any_text),
      intro_text:      r.optional("intro_text", validate::text),
      cta_button_text: r.optional("cta_button_text", validate::text),
      cta_button_url:  r.optional("cta_button_url", validate::url),
      is_active:       r.optional("is_active", validate::boolean),
    };
    r.finish().map(|()| patch)
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    if let Some(title) = &self.title {
      v.check("title", rules::non_empty(title));
    }
    if let Some(text) = &self.intro_text {
      v.check("intro_text", rules::non_empty(text));
    }
    if let Some(text) = &self.cta_button_text {
      v.check("cta_button_text", rules::non_empty(text));
    }
    if let Some(url) = &self.cta_button_url {
      v.check("cta_button_url", rules::absolute_url(url));
    }
    v.into_result().map(|()| self)
  }
}
