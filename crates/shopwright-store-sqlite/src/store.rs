//! The SQLite implementation of [`Repository`].

use std::path::Path;

use rusqlite::{Connection, TransactionBehavior};
use shopwright_core::{
  content::{Content, ContentPatch, NewContent},
  id::{ContentId, LandingPageId, StoreId, TemplateId, UserId},
  landing::{LandingPage, LandingPagePatch, NewLandingPage},
  repository::{ContentFilter, Repository, StoreFilter, TemplateFilter, UserFilter},
  storefront::{NewStore, Store, StorePatch},
  template::{NewTemplate, Template, TemplateCategory, TemplatePatch},
  user::{NewUser, User, UserPatch},
};

use crate::{Error, Result, content, landing, schema::SCHEMA, stores, templates, users};

// ─── Repository ──────────────────────────────────────────────────────────────

/// A storefront repository backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All access
/// is serialised onto the connection's background thread.
#[derive(Clone)]
pub struct SqliteRepository {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRepository {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  /// Open an in-memory database, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside an `IMMEDIATE` transaction. The write lock is taken up
  /// front so check-then-write sequences cannot interleave. Any error rolls
  /// the whole unit back.
  async fn transact<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx);
        if out.is_ok() {
          tx.commit()?;
        }
        Ok(out)
      })
      .await?
  }

  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Repository for SqliteRepository {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    self.transact(move |conn| users::insert(conn, input)).await
  }

  async fn get_user(&self, id: UserId) -> Result<User> {
    self.read(move |conn| users::fetch(conn, id)).await
  }

  async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>> {
    self.read(move |conn| users::list(conn, &filter)).await
  }

  async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User> {
    self.transact(move |conn| users::update(conn, id, patch)).await
  }

  // ── Templates ─────────────────────────────────────────────────────────────

  async fn create_template(&self, input: NewTemplate) -> Result<Template> {
    self.transact(move |conn| templates::insert(conn, input)).await
  }

  async fn get_template(&self, id: TemplateId) -> Result<Template> {
    self.read(move |conn| templates::fetch(conn, id)).await
  }

  async fn list_templates(&self, filter: TemplateFilter) -> Result<Vec<Template>> {
    self.read(move |conn| templates::list(conn, &filter)).await
  }

  async fn update_template(&self, id: TemplateId, patch: TemplatePatch) -> Result<Template> {
    self.transact(move |conn| templates::update(conn, id, patch)).await
  }

  async fn current_template(
    &self,
    category: Option<TemplateCategory>,
  ) -> Result<Option<Template>> {
    self.read(move |conn| templates::current(conn, category)).await
  }

  // ── Stores ────────────────────────────────────────────────────────────────

  async fn create_store(&self, input: NewStore) -> Result<Store> {
    self.transact(move |conn| stores::insert(conn, input)).await
  }

  async fn get_store(&self, id: StoreId) -> Result<Store> {
    self.read(move |conn| stores::fetch(conn, id)).await
  }

  async fn list_stores(&self, filter: StoreFilter) -> Result<Vec<Store>> {
    self.read(move |conn| stores::list(conn, &filter)).await
  }

  async fn update_store(&self, id: StoreId, patch: StorePatch) -> Result<Store> {
    self.transact(move |conn| stores::update(conn, id, patch)).await
  }

  async fn delete_store(&self, id: StoreId) -> Result<()> {
    self.transact(move |conn| stores::delete(conn, id)).await
  }

  async fn current_store(&self, user_id: UserId) -> Result<Option<Store>> {
    self.read(move |conn| stores::current(conn, user_id)).await
  }

  // ── Content ───────────────────────────────────────────────────────────────

  async fn create_content(&self, input: NewContent) -> Result<Content> {
    self.transact(move |conn| content::insert(conn, input)).await
  }

  async fn get_content(&self, id: ContentId) -> Result<Content> {
    self.read(move |conn| content::fetch(conn, id)).await
  }

  async fn list_content(&self, filter: ContentFilter) -> Result<Vec<Content>> {
    self.read(move |conn| content::list(conn, &filter)).await
  }

  async fn update_content(&self, id: ContentId, patch: ContentPatch) -> Result<Content> {
    self.transact(move |conn| content::update(conn, id, patch)).await
  }

  async fn delete_content(&self, id: ContentId) -> Result<()> {
    self.transact(move |conn| content::delete(conn, id)).await
  }

  // ── Landing pages ─────────────────────────────────────────────────────────

  async fn create_landing_page(&self, input: NewLandingPage) -> Result<LandingPage> {
    self.transact(move |conn| landing::insert(conn, input)).await
  }

  async fn get_landing_page(&self, id: LandingPageId) -> Result<LandingPage> {
    self.read(move |conn| landing::fetch(conn, id)).await
  }

  async fn update_landing_page(
    &self,
    id: LandingPageId,
    patch: LandingPagePatch,
  ) -> Result<LandingPage> {
    self.transact(move |conn| landing::update(conn, id, patch)).await
  }

  async fn active_landing_page(&self) -> Result<Option<LandingPage>> {
    self.read(landing::active).await
  }
}
