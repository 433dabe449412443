//! The `Repository` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `shopwright-store-sqlite`). The HTTP facade depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use serde_json::Value;

use crate::{
  content::{Content, ContentPatch, ContentType, NewContent},
  error::{DomainError, Violations},
  id::{ContentId, LandingPageId, StoreId, TemplateId, UserId},
  landing::{LandingPage, LandingPagePatch, NewLandingPage},
  lifecycle::{ContentStatus, StoreStatus, SubscriptionStatus},
  storefront::{NewStore, Store, StorePatch},
  template::{NewTemplate, Template, TemplateCategory, TemplatePatch},
  user::{NewUser, User, UserPatch},
  validate::{self, Record},
};

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A `LIMIT`/`OFFSET` window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  u32,
  pub offset: u32,
}

impl Page {
  pub const MAX_LIMIT: u32 = 100;

  /// Build a page from caller-supplied bounds: `limit` must be 1–100
  /// (default 100), `offset` at least 0 (default 0).
  pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, Violations> {
    let mut v = Violations::default();
    let limit = match limit {
      None => Self::MAX_LIMIT,
      Some(n) => match u32::try_from(n) {
        Ok(n) if (1..=Self::MAX_LIMIT).contains(&n) => n,
        _ => {
          v.push("limit", format!("must be between 1 and {}", Self::MAX_LIMIT));
          Self::MAX_LIMIT
        }
      },
    };
    let offset = match offset {
      None => 0,
      Some(n) => u32::try_from(n).unwrap_or_else(|_| {
        v.push("offset", format!("must be between 0 and {}", u32::MAX));
        0
      }),
    };
    v.into_result().map(|()| Self { limit, offset })
  }

  /// Read `limit` and `offset` from query parameters, recording any
  /// violation on the record instead of failing.
  fn from_record(r: &mut Record<'_>) -> Self {
    let limit = r.optional("limit", validate::integer_param);
    let offset = r.optional("offset", validate::integer_param);
    Self::new(limit, offset).unwrap_or_else(|v| {
      r.absorb(v);
      Self::default()
    })
  }
}

impl Default for Page {
  fn default() -> Self { Self { limit: Self::MAX_LIMIT, offset: 0 } }
}

// ─── Filters ─────────────────────────────────────────────────────────────────
//
// Each `from_query` takes the query string as a JSON object of strings and
// reports every bad parameter together.

/// Parameters for [`Repository::list_users`]; ordered by id.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
  pub subscription_status: Option<SubscriptionStatus>,
  pub page:                Page,
}

impl UserFilter {
  pub fn from_query(query: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(query)?;
    let subscription_status =
      r.optional("subscription_status", validate::choice::<SubscriptionStatus>);
    let page = Page::from_record(&mut r);
    r.finish()?;
    Ok(Self { subscription_status, page })
  }
}

/// Parameters for [`Repository::list_templates`]; ordered by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
  pub category:  Option<TemplateCategory>,
  pub is_active: Option<bool>,
  pub page:      Page,
}

impl TemplateFilter {
  pub fn from_query(query: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(query)?;
    let category = r.optional("category", validate::choice::<TemplateCategory>);
    let is_active = r.optional("is_active", validate::boolean_param);
    let page = Page::from_record(&mut r);
    r.finish()?;
    Ok(Self { category, is_active, page })
  }
}

/// Parameters for [`Repository::list_stores`]; ordered by id.
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
  pub user_id: Option<UserId>,
  pub status:  Option<StoreStatus>,
  pub page:    Page,
}

impl StoreFilter {
  pub fn from_query(query: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(query)?;
    let user_id = r.optional("user_id", validate::id_param).map(UserId);
    let status = r.optional("status", validate::choice::<StoreStatus>);
    let page = Page::from_record(&mut r);
    r.finish()?;
    Ok(Self { user_id, status, page })
  }
}

/// Parameters for [`Repository::list_content`]; ordered by `sort_order`,
/// then id.
#[derive(Debug, Clone)]
pub struct ContentFilter {
  pub store_id:     StoreId,
  pub content_type: Option<ContentType>,
  pub status:       Option<ContentStatus>,
  pub page:         Page,
}

impl ContentFilter {
  pub fn for_store(store_id: StoreId) -> Self {
    Self {
      store_id,
      content_type: None,
      status: None,
      page: Page::default(),
    }
  }

  /// `store_id` is required; listings never span stores.
  pub fn from_query(query: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(query)?;
    let store_id = r.required("store_id", validate::id_param);
    let content_type = r.optional("type", validate::choice::<ContentType>);
    let status = r.optional("status", validate::choice::<ContentStatus>);
    let page = Page::from_record(&mut r);
    let Some(store_id) = store_id else {
      return Err(r.into_violations());
    };
    r.finish()?;
    Ok(Self { store_id: StoreId(store_id), content_type, status, page })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a storage backend for the storefront CMS.
///
/// Every mutation runs in a single transaction: uniqueness checks,
/// reference checks and the write itself commit together or not at all.
/// Lookups by id fail with [`Error::NotFound`](crate::Error::NotFound); the
/// `current_*`/`active_*` selectors return `None` when nothing qualifies.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Repository: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user in the `trial` state. Fails on a duplicate email.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn list_users(
    &self,
    filter: UserFilter,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: UserId,
    patch: UserPatch,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Templates ─────────────────────────────────────────────────────────

  fn create_template(
    &self,
    input: NewTemplate,
  ) -> impl Future<Output = Result<Template, Self::Error>> + Send + '_;

  fn get_template(
    &self,
    id: TemplateId,
  ) -> impl Future<Output = Result<Template, Self::Error>> + Send + '_;

  fn list_templates(
    &self,
    filter: TemplateFilter,
  ) -> impl Future<Output = Result<Vec<Template>, Self::Error>> + Send + '_;

  fn update_template(
    &self,
    id: TemplateId,
    patch: TemplatePatch,
  ) -> impl Future<Output = Result<Template, Self::Error>> + Send + '_;

  /// The most recently updated active template, optionally within one
  /// category.
  fn current_template(
    &self,
    category: Option<TemplateCategory>,
  ) -> impl Future<Output = Result<Option<Template>, Self::Error>> + Send + '_;

  // ── Stores ────────────────────────────────────────────────────────────

  /// Create a draft store. The owner and any template must exist; the
  /// domain must be free.
  fn create_store(
    &self,
    input: NewStore,
  ) -> impl Future<Output = Result<Store, Self::Error>> + Send + '_;

  fn get_store(
    &self,
    id: StoreId,
  ) -> impl Future<Output = Result<Store, Self::Error>> + Send + '_;

  fn list_stores(
    &self,
    filter: StoreFilter,
  ) -> impl Future<Output = Result<Vec<Store>, Self::Error>> + Send + '_;

  /// Apply a partial update. Setting `status` to `published` requires the
  /// merged store to pass the completeness check.
  fn update_store(
    &self,
    id: StoreId,
    patch: StorePatch,
  ) -> impl Future<Output = Result<Store, Self::Error>> + Send + '_;

  /// Delete a store together with all of its content.
  fn delete_store(
    &self,
    id: StoreId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The user's most recently updated published store.
  fn current_store(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<Option<Store>, Self::Error>> + Send + '_;

  // ── Content ───────────────────────────────────────────────────────────

  /// Create a content record. Fails if the slug is taken within the store.
  fn create_content(
    &self,
    input: NewContent,
  ) -> impl Future<Output = Result<Content, Self::Error>> + Send + '_;

  fn get_content(
    &self,
    id: ContentId,
  ) -> impl Future<Output = Result<Content, Self::Error>> + Send + '_;

  fn list_content(
    &self,
    filter: ContentFilter,
  ) -> impl Future<Output = Result<Vec<Content>, Self::Error>> + Send + '_;

  fn update_content(
    &self,
    id: ContentId,
    patch: ContentPatch,
  ) -> impl Future<Output = Result<Content, Self::Error>> + Send + '_;

  fn delete_content(
    &self,
    id: ContentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Landing pages ─────────────────────────────────────────────────────

  fn create_landing_page(
    &self,
    input: NewLandingPage,
  ) -> impl Future<Output = Result<LandingPage, Self::Error>> + Send + '_;

  fn get_landing_page(
    &self,
    id: LandingPageId,
  ) -> impl Future<Output = Result<LandingPage, Self::Error>> + Send + '_;

  fn update_landing_page(
    &self,
    id: LandingPageId,
    patch: LandingPagePatch,
  ) -> impl Future<Output = Result<LandingPage, Self::Error>> + Send + '_;

  /// The most recently updated active landing page.
  fn active_landing_page(
    &self,
  ) -> impl Future<Output = Result<Option<LandingPage>, Self::Error>> + Send + '_;
}
