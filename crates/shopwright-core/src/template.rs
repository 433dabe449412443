//! Template: a reusable starting configuration a store may be seeded from.
//!
//! Templates are never deleted. Deactivating one hides it from
//! [`current_template`](crate::repository::Repository::current_template) but
//! leaves every store that references it untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  clock,
  error::Violations,
  id::TemplateId,
  patch::Patch,
  selection::Candidate,
  validate::{self, Record, rules},
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  strum::Display, strum::AsRefStr, strum::EnumString, strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemplateCategory {
  Retail,
  Restaurant,
  Services,
  Portfolio,
  Blog,
  Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
  pub id:              TemplateId,
  pub name:            String,
  pub description:     Option<String>,
  pub category:        TemplateCategory,
  /// Absolute URL of a preview image.
  pub preview_image:   Option<String>,
  /// Opaque serialised configuration; passed through unchanged.
  pub template_config: String,
  pub is_active:       bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl Template {
  pub fn apply(&mut self, patch: TemplatePatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    patch.description.apply_to(&mut self.description);
    if let Some(category) = patch.category {
      self.category = category;
    }
    patch.preview_image.apply_to(&mut self.preview_image);
    if let Some(config) = patch.template_config {
      self.template_config = config;
    }
    if let Some(active) = patch.is_active {
      self.is_active = active;
    }
    self.updated_at = clock::advance(self.updated_at);
  }
}

impl Candidate for Template {
  fn is_eligible(&self) -> bool { self.is_active }

  fn recency(&self) -> (DateTime<Utc>, i64) { (self.updated_at, self.id.get()) }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewTemplate {
  pub name:            String,
  pub description:     Option<String>,
  pub category:        TemplateCategory,
  pub preview_image:   Option<String>,
  pub template_config: String,
  pub is_active:       bool,
}

impl NewTemplate {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let name = r.required("name", validate::text);
    let description = r.nullable("description", validate::any_text);
    let category = r.required("category", validate::choice::<TemplateCategory>);
    let preview_image = r.nullable("preview_image", validate::url);
    let template_config = r.required("template_config", validate::text);
    let is_active = r.optional("is_active", validate::boolean);

    let (Some(name), Some(category), Some(template_config)) =
      (name, category, template_config)
    else {
      return Err(r.into_violations());
    };
    r.finish()?;
    Ok(Self {
      name,
      description: description.value().cloned(),
      category,
      preview_image: preview_image.value().cloned(),
      template_config,
      is_active: is_active.unwrap_or(true),
    })
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    v.check("name", rules::non_empty(&self.name));
    if let Some(image) = &self.preview_image {
      v.check("preview_image", rules::absolute_url(image));
    }
    v.check("template_config", rules::non_empty(&self.template_config));
    v.into_result().map(|()| self)
  }
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
  pub name:            Option<String>,
  pub description:     Patch<String>,
  pub category:        Option<TemplateCategory>,
  pub preview_image:   Patch<String>,
  pub template_config: Option<String>,
  pub is_active:       Option<bool>,
}

impl TemplatePatch {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let patch = Self {
      name:            r.optional("name", validate::text),
      description:     r.nullable("description", validate::any_text),
      category:        r.optional("category", validate::choice::<TemplateCategory>),
      preview_image:   r.nullable("preview_image", validate::url),
      template_config: r.optional("template_config", validate::text),
      is_active:       r.optional("is_active", validate::boolean),
    };
    r.finish().map(|()| patch)
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    if let Some(name) = &self.name {
      v.check("name", rules::non_empty(name));
    }
    if let Some(image) = self.preview_image.value() {
      v.check("preview_image", rules::absolute_url(image));
    }
    if let Some(config) = &self.template_config {
      v.check("template_config", rules::non_empty(config));
    }
    v.into_result().map(|()| self)
  }
}
