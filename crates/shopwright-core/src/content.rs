//! Content: one CMS record (page, product, post, ...) inside a store.
//!
//! Slugs are unique per store, not globally. Listings within a store are
//! ordered by `sort_order`, then by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  clock,
  error::Violations,
  id::{ContentId, StoreId},
  lifecycle::ContentStatus,
  patch::Patch,
  validate::{self, Record, rules},
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  strum::Display, strum::AsRefStr, strum::EnumString, strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentType {
  Page,
  Product,
  BlogPost,
  MenuItem,
  Testimonial,
  Faq,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
  pub id:               ContentId,
  pub store_id:         StoreId,
  #[serde(rename = "type")]
  pub content_type:     ContentType,
  pub title:            String,
  /// Unique within `store_id`.
  pub slug:             String,
  /// Opaque structured payload; passed through unchanged.
  pub content_data:     String,
  pub meta_title:       Option<String>,
  pub meta_description: Option<String>,
  pub status:           ContentStatus,
  pub sort_order:       i64,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl Content {
  pub fn apply(&mut self, patch: ContentPatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(slug) = patch.slug {
      self.slug = slug;
    }
    if let Some(data) = patch.content_data {
      self.content_data = data;
    }
    patch.meta_title.apply_to(&mut self.meta_title);
    patch.meta_description.apply_to(&mut self.meta_description);
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(order) = patch.sort_order {
      self.sort_order = order;
    }
    self.updated_at = clock::advance(self.updated_at);
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewContent {
  pub store_id:         StoreId,
  pub content_type:     ContentType,
  pub title:            String,
  pub slug:             String,
  pub content_data:     String,
  pub meta_title:       Option<String>,
  pub meta_description: Option<String>,
  pub status:           ContentStatus,
  pub sort_order:       i64,
}

impl NewContent {
  /// Convenience constructor: a draft at sort position 0 with no metadata.
  pub fn new(
    store_id: StoreId,
    content_type: ContentType,
    title: impl Into<String>,
    slug: impl Into<String>,
    content_data: impl Into<String>,
  ) -> Self {
    Self {
      store_id,
      content_type,
      title: title.into(),
      slug: slug.into(),
      content_data: content_data.into(),
      meta_title: None,
      meta_description: None,
      status: ContentStatus::default(),
      sort_order: 0,
    }
  }

  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let store_id = r.required("store_id", validate::id);
    let content_type = r.required("type", validate::choice::<ContentType>);
    let title = r.required("title", validate::text);
    let slug = r.required("slug", validate::slug);
    let content_data = r.required("content_data", validate::text);
    let meta_title = r.nullable("meta_title", validate::any_text);
    let meta_description = r.nullable("meta_description", validate::any_text);
    let status = r.optional("status", validate::choice::<ContentStatus>);
    let sort_order = r.optional("sort_order", validate::integer);

    let (
      Some(store_id),
      Some(content_type),
      Some(title),
      Some(slug),
      Some(content_data),
    ) = (store_id, content_type, title, slug, content_data)
    else {
      return Err(r.into_violations());
    };
    r.finish()?;
    Ok(Self {
      store_id: StoreId(store_id),
      content_type,
      title,
      slug,
      content_data,
      meta_title: meta_title.value().cloned(),
      meta_description: meta_description.value().cloned(),
      status: status.unwrap_or_default(),
      sort_order: sort_order.unwrap_or(0),
    })
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    v.check("title", rules::non_empty(&self.title));
    v.check("slug", rules::slug(&self.slug));
    v.check("content_data", rules::non_empty(&self.content_data));
    v.into_result().map(|()| self)
  }
}

/// A partial update of a [`Content`] record. The owning store and the
/// content type are fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
  pub title:            Option<String>,
  pub slug:             Option<String>,
  pub content_data:     Option<String>,
  pub meta_title:       Patch<String>,
  pub meta_description: Patch<String>,
  pub status:           Option<ContentStatus>,
  pub sort_order:       Option<i64>,
}

impl ContentPatch {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let patch = Self {
      title:            r.optional("title", validate::text),
      slug:             r.optional("slug", validate::slug),
      content_data:     r.optional("content_data", validate::text),
      meta_title:       r.nullable("meta_title", validate::any_text),
      meta_description: r.nullable("meta_description", validate::any_text),
      status:           r.optional("status", validate::choice::<ContentStatus>),
      sort_order:       r.optional("sort_order", validate::integer),
    };
    r.finish().map(|()| patch)
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    if let Some(title) = &self.title {
      v.check("title", rules::non_empty(title));
    }
    if let Some(slug) = &self.slug {
      v.check("slug", rules::slug(slug));
    }
    if let Some(data) = &self.content_data {
      v.check("content_data", rules::non_empty(data));
    }
    v.into_result().map(|()| self)
  }
}
