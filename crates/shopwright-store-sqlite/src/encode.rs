//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision. Enums are stored as their snake_case wire names. Booleans are
//! stored as `0`/`1`.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use shopwright_core::{
  content::Content,
  email::Email,
  id::{ContentId, LandingPageId, StoreId, TemplateId, UserId},
  landing::LandingPage,
  storefront::Store,
  template::Template,
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(column: &'static str, s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::decode(column, s, e))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_enum<E: FromStr>(column: &'static str, s: &str) -> Result<E>
where
  E::Err: ToString,
{
  s.parse().map_err(|e: E::Err| Error::decode(column, s, e))
}

fn decode_opt_enum<E: FromStr>(column: &'static str, s: Option<&str>) -> Result<Option<E>>
where
  E::Err: ToString,
{
  s.map(|s| decode_enum(column, s)).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, email, business_name, subscription_status, \
  subscription_plan, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:                  i64,
  pub email:               String,
  pub business_name:       String,
  pub subscription_status: String,
  pub subscription_plan:   Option<String>,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      email:               row.get(1)?,
      business_name:       row.get(2)?,
      subscription_status: row.get(3)?,
      subscription_plan:   row.get(4)?,
      created_at:          row.get(5)?,
      updated_at:          row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:                  UserId(self.id),
      email:               Email::parse(&self.email)
        .map_err(|e| Error::decode("users.email", &self.email, e))?,
      business_name:       self.business_name,
      subscription_status: decode_enum(
        "users.subscription_status",
        &self.subscription_status,
      )?,
      subscription_plan:   decode_opt_enum(
        "users.subscription_plan",
        self.subscription_plan.as_deref(),
      )?,
      created_at:          decode_dt("users.created_at", &self.created_at)?,
      updated_at:          decode_dt("users.updated_at", &self.updated_at)?,
    })
  }
}

pub const TEMPLATE_COLUMNS: &str = "id, name, description, category, \
  preview_image, template_config, is_active, created_at, updated_at";

/// Raw values read directly from a `templates` row.
pub struct RawTemplate {
  pub id:              i64,
  pub name:            String,
  pub description:     Option<String>,
  pub category:        String,
  pub preview_image:   Option<String>,
  pub template_config: String,
  pub is_active:       bool,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawTemplate {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      description:     row.get(2)?,
      category:        row.get(3)?,
      preview_image:   row.get(4)?,
      template_config: row.get(5)?,
      is_active:       row.get(6)?,
      created_at:      row.get(7)?,
      updated_at:      row.get(8)?,
    })
  }

  pub fn into_template(self) -> Result<Template> {
    Ok(Template {
      id:              TemplateId(self.id),
      name:            self.name,
      description:     self.description,
      category:        decode_enum("templates.category", &self.category)?,
      preview_image:   self.preview_image,
      template_config: self.template_config,
      is_active:       self.is_active,
      created_at:      decode_dt("templates.created_at", &self.created_at)?,
      updated_at:      decode_dt("templates.updated_at", &self.updated_at)?,
    })
  }
}

pub const STORE_COLUMNS: &str = "id, user_id, name, description, domain, \
  template_id, ai_config, status, theme_colors, custom_css, created_at, updated_at";

/// Raw values read directly from a `stores` row.
pub struct RawStore {
  pub id:           i64,
  pub user_id:      i64,
  pub name:         String,
  pub description:  Option<String>,
  pub domain:       String,
  pub template_id:  Option<i64>,
  pub ai_config:    String,
  pub status:       String,
  pub theme_colors: Option<String>,
  pub custom_css:   Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawStore {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      user_id:      row.get(1)?,
      name:         row.get(2)?,
      description:  row.get(3)?,
      domain:       row.get(4)?,
      template_id:  row.get(5)?,
      ai_config:    row.get(6)?,
      status:       row.get(7)?,
      theme_colors: row.get(8)?,
      custom_css:   row.get(9)?,
      created_at:   row.get(10)?,
      updated_at:   row.get(11)?,
    })
  }

  pub fn into_store(self) -> Result<Store> {
    Ok(Store {
      id:           StoreId(self.id),
      user_id:      UserId(self.user_id),
      name:         self.name,
      description:  self.description,
      domain:       self.domain,
      template_id:  self.template_id.map(TemplateId),
      ai_config:    self.ai_config,
      status:       decode_enum("stores.status", &self.status)?,
      theme_colors: self.theme_colors,
      custom_css:   self.custom_css,
      created_at:   decode_dt("stores.created_at", &self.created_at)?,
      updated_at:   decode_dt("stores.updated_at", &self.updated_at)?,
    })
  }
}

pub const CONTENT_COLUMNS: &str = "id, store_id, type, title, slug, \
  content_data, meta_title, meta_description, status, sort_order, created_at, \
  updated_at";

/// Raw values read directly from a `content` row.
pub struct RawContent {
  pub id:               i64,
  pub store_id:         i64,
  pub content_type:     String,
  pub title:            String,
  pub slug:             String,
  pub content_data:     String,
  pub meta_title:       Option<String>,
  pub meta_description: Option<String>,
  pub status:           String,
  pub sort_order:       i64,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawContent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      store_id:         row.get(1)?,
      content_type:     row.get(2)?,
      title:            row.get(3)?,
      slug:             row.get(4)?,
      content_data:     row.get(5)?,
      meta_title:       row.get(6)?,
      meta_description: row.get(7)?,
      status:           row.get(8)?,
      sort_order:       row.get(9)?,
      created_at:       row.get(10)?,
      updated_at:       row.get(11)?,
    })
  }

  pub fn into_content(self) -> Result<Content> {
    Ok(Content {
      id:               ContentId(self.id),
      store_id:         StoreId(self.store_id),
      content_type:     decode_enum("content.type", &self.content_type)?,
      title:            self.title,
      slug:             self.slug,
      content_data:     self.content_data,
      meta_title:       self.meta_title,
      meta_description: self.meta_description,
      status:           decode_enum("content.status", &self.status)?,
      sort_order:       self.sort_order,
      created_at:       decode_dt("content.created_at", &self.created_at)?,
      updated_at:       decode_dt("content.updated_at", &self.updated_at)?,
    })
  }
}

pub const LANDING_COLUMNS: &str = "id, title, subtitle, intro_text, \
  cta_button_text, cta_button_url, is_active, created_at, updated_at";

/// Raw values read directly from a `landing_pages` row.
pub struct RawLandingPage {
  pub id:              i64,
  pub title:           String,
  pub subtitle:        Option<String>,
  pub intro_text:      String,
  pub cta_button_text: String,
  pub cta_button_url:  String,
  pub is_active:       bool,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawLandingPage {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      title:           row.get(1)?,
      subtitle:        row.get(2)?,
      intro_text:      row.get(3)?,
      cta_button_text: row.get(4)?,
      cta_button_url:  row.get(5)?,
      is_active:       row.get(6)?,
      created_at:      row.get(7)?,
      updated_at:      row.get(8)?,
    })
  }

  pub fn into_landing_page(self) -> Result<LandingPage> {
    Ok(LandingPage {
      id:              LandingPageId(self.id),
      title:           self.title,
      subtitle:        self.subtitle,
      intro_text:      self.intro_text,
      cta_button_text: self.cta_button_text,
      cta_button_url:  self.cta_button_url,
      is_active:       self.is_active,
      created_at:      decode_dt("landing_pages.created_at", &self.created_at)?,
      updated_at:      decode_dt("landing_pages.updated_at", &self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use shopwright_core::{clock, lifecycle::StoreStatus};

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let a = encode_dt(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    let b = encode_dt(DateTime::from_timestamp(1_700_000_000, 123_456_000).unwrap());
    assert_eq!(a, "2023-11-14T22:13:20.000000Z");
    assert_eq!(a.len(), b.len());
    assert!(a < b);
  }

  #[test]
  fn timestamps_round_trip_exactly() {
    let now = clock::now();
    assert_eq!(decode_dt("t", &encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn unknown_enum_value_is_a_decode_error() {
    let err = decode_enum::<StoreStatus>("stores.status", "live").unwrap_err();
    assert!(matches!(err, Error::Decode { column: "stores.status", .. }));
  }
}
