//! Store: a tenant-owned generated storefront, the unit of publication.
//!
//! A store belongs to exactly one user for its whole life and is deleted with
//! it. Its domain is unique across every owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  clock,
  error::Violations,
  id::{StoreId, TemplateId, UserId},
  lifecycle::StoreStatus,
  patch::Patch,
  selection::Candidate,
  validate::{self, Record, rules},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
  pub id:           StoreId,
  pub user_id:      UserId,
  pub name:         String,
  pub description:  Option<String>,
  /// Lower-cased host name; unique across all stores.
  pub domain:       String,
  pub template_id:  Option<TemplateId>,
  /// Opaque generation settings; passed through unchanged.
  pub ai_config:    String,
  pub status:       StoreStatus,
  pub theme_colors: Option<String>,
  pub custom_css:   Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Store {
  pub fn apply(&mut self, patch: StorePatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    patch.description.apply_to(&mut self.description);
    if let Some(domain) = patch.domain {
      self.domain = domain;
    }
    patch.template_id.apply_to(&mut self.template_id);
    if let Some(config) = patch.ai_config {
      self.ai_config = config;
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    patch.theme_colors.apply_to(&mut self.theme_colors);
    patch.custom_css.apply_to(&mut self.custom_css);
    self.updated_at = clock::advance(self.updated_at);
  }

  /// Everything standing between this store and publication, given how many
  /// of its content records are not archived. Empty means publishable.
  pub fn publish_blockers(&self, live_content: u64) -> Vec<String> {
    let mut missing = Vec::new();
    if self.name.trim().is_empty() {
      missing.push("store name is empty".to_owned());
    }
    if self.domain.trim().is_empty() {
      missing.push("store domain is empty".to_owned());
    }
    if live_content == 0 {
      missing.push("store has no unarchived content".to_owned());
    }
    missing
  }
}

impl Candidate for Store {
  fn is_eligible(&self) -> bool { self.status == StoreStatus::Published }

  fn recency(&self) -> (DateTime<Utc>, i64) { (self.updated_at, self.id.get()) }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::repository::Repository::create_store`]. New stores always
/// start as drafts.
#[derive(Debug, Clone)]
pub struct NewStore {
  pub user_id:      UserId,
  pub name:         String,
  pub description:  Option<String>,
  pub domain:       String,
  pub template_id:  Option<TemplateId>,
  pub ai_config:    String,
  pub theme_colors: Option<String>,
  pub custom_css:   Option<String>,
}

impl NewStore {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let user_id = r.required("user_id", validate::id);
    let name = r.required("name", validate::text);
    let description = r.nullable("description", validate::any_text);
    let domain = r.required("domain", validate::domain);
    let template_id = r.nullable("template_id", validate::id);
    let ai_config = r.required("ai_config", validate::text);
    let theme_colors = r.nullable("theme_colors", validate::any_text);
    let custom_css = r.nullable("custom_css", validate::any_text);

    let (Some(user_id), Some(name), Some(domain), Some(ai_config)) =
      (user_id, name, domain, ai_config)
    else {
      return Err(r.into_violations());
    };
    r.finish()?;
    Ok(Self {
      user_id: UserId(user_id),
      name,
      description: description.value().cloned(),
      domain,
      template_id: template_id.value().copied().map(TemplateId),
      ai_config,
      theme_colors: theme_colors.value().cloned(),
      custom_css: custom_css.value().cloned(),
    })
  }

  /// Check the text rules and normalise the domain.
  pub fn validated(mut self) -> Result<Self, Violations> {
    self.domain = rules::normalize_domain(&self.domain);
    let mut v = Violations::default();
    v.check("name", rules::non_empty(&self.name));
    v.check("domain", rules::domain(&self.domain));
    v.check("ai_config", rules::non_empty(&self.ai_config));
    v.into_result().map(|()| self)
  }
}

#[derive(Debug, Clone, Default)]
pub struct StorePatch {
  pub name:         Option<String>,
  pub description:  Patch<String>,
  pub domain:       Option<String>,
  pub template_id:  Patch<TemplateId>,
  pub ai_config:    Option<String>,
  pub status:       Option<StoreStatus>,
  pub theme_colors: Patch<String>,
  pub custom_css:   Patch<String>,
}

impl StorePatch {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let patch = Self {
      name:         r.optional("name", validate::text),
      description:  r.nullable("description", validate::any_text),
      domain:       r.optional("domain", validate::domain),
      template_id:  r.nullable("template_id", validate::id).map(TemplateId),
      ai_config:    r.optional("ai_config", validate::text),
      status:       r.optional("status", validate::choice::<StoreStatus>),
      theme_colors: r.nullable("theme_colors", validate::any_text),
      custom_css:   r.nullable("custom_css", validate::any_text),
    };
    r.finish().map(|()| patch)
  }

  pub fn validated(mut self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    if let Some(name) = &self.name {
      v.check("name", rules::non_empty(name));
    }
    if let Some(domain) = self.domain.take() {
      let domain = rules::normalize_domain(&domain);
      v.check("domain", rules::domain(&domain));
      self.domain = Some(domain);
    }
    if let Some(config) = &self.ai_config {
      v.check("ai_config", rules::non_empty(config));
    }
    v.into_result().map(|()| self)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn store() -> Store {
    let at = clock::now();
    Store {
      id:           StoreId(1),
      user_id:      UserId(1),
      name:         "Corner Shop".into(),
      description:  Some("Fresh produce".into()),
      domain:       "shop.test".into(),
      template_id:  Some(TemplateId(3)),
      ai_config:    "{\"tone\":\"warm\"}".into(),
      status:       StoreStatus::Draft,
      theme_colors: Some("#fff".into()),
      custom_css:   None,
      created_at:   at,
      updated_at:   at,
    }
  }

  #[test]
  fn new_store_without_template() {
    let input = NewStore::from_json(&json!({
      "user_id": 1,
      "name": "Corner Shop",
      "domain": "Shop.Test",
      "ai_config": "{}",
    }))
    .unwrap();
    assert_eq!(input.template_id, None);
    assert_eq!(input.domain, "shop.test");
  }

  #[test]
  fn new_store_collects_all_missing_fields() {
    let v = NewStore::from_json(&json!({ "template_id": "x" })).unwrap_err();
    for field in ["user_id", "name", "domain", "ai_config", "template_id"] {
      assert!(v.touches(field), "missing violation for {field}");
    }
  }

  #[test]
  fn patch_distinguishes_absent_from_null() {
    let mut s = store();
    let patch =
      StorePatch::from_json(&json!({ "template_id": null, "custom_css": "a{}" }))
        .unwrap();
    s.apply(patch);
    assert_eq!(s.template_id, None);
    assert_eq!(s.custom_css.as_deref(), Some("a{}"));
    assert_eq!(s.description.as_deref(), Some("Fresh produce"));
    assert_eq!(s.theme_colors.as_deref(), Some("#fff"));
  }

  #[test]
  fn null_name_is_rejected() {
    let v = StorePatch::from_json(&json!({ "name": null, "status": "live" }))
      .unwrap_err();
    assert!(v.touches("name"));
    assert!(v.touches("status"));
  }

  #[test]
  fn blockers_list_every_gap() {
    let mut s = store();
    s.name = String::new();
    let blockers = s.publish_blockers(0);
    assert_eq!(blockers.len(), 2);
    assert!(store().publish_blockers(1).is_empty());
  }
}
