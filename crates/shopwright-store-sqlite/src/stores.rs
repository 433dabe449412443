//! Queries against the `stores` table.

use rusqlite::{Connection, OptionalExtension as _, params};
use shopwright_core::{
  Entity, clock,
  id::{StoreId, UserId},
  lifecycle::{Guard, Lifecycle as _, StoreStatus},
  repository::StoreFilter,
  selection::select_current,
  storefront::{NewStore, Store, StorePatch},
};
use tracing::debug;

use crate::{
  Result,
  encode::{RawStore, STORE_COLUMNS, encode_dt},
  sql,
};

fn ensure_domain_free(conn: &Connection, domain: &str, except: Option<StoreId>) -> Result<()> {
  let taken = conn
    .query_row(
      "SELECT id FROM stores WHERE domain = ?1 AND id != ?2",
      params![domain, except.map_or(0, StoreId::get)],
      |r| r.get::<_, i64>(0),
    )
    .optional()?;
  match taken {
    Some(_) => Err(sql::conflict("domain", domain)),
    None => Ok(()),
  }
}

/// Content rows of the store that are not archived.
fn live_content(conn: &Connection, id: StoreId) -> Result<u64> {
  Ok(conn.query_row(
    "SELECT COUNT(*) FROM content WHERE store_id = ?1 AND status != 'archived'",
    params![id.get()],
    |r| r.get(0),
  )?)
}

pub fn insert(conn: &Connection, input: NewStore) -> Result<Store> {
  let input = input.validated()?;
  sql::require_reference(conn, "user_id", Entity::User, input.user_id.get())?;
  if let Some(template_id) = input.template_id {
    sql::require_reference(conn, "template_id", Entity::Template, template_id.get())?;
  }
  ensure_domain_free(conn, &input.domain, None)?;

  let now = clock::now();
  let status = StoreStatus::initial();
  conn
    .execute(
      "INSERT INTO stores (
         user_id, name, description, domain, template_id, ai_config, status,
         theme_colors, custom_css, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
      params![
        input.user_id.get(),
        input.name,
        input.description,
        input.domain,
        input.template_id.map(|t| t.get()),
        input.ai_config,
        status.to_string(),
        input.theme_colors,
        input.custom_css,
        encode_dt(now),
      ],
    )
    .map_err(|e| sql::write_error(e, "domain", &input.domain))?;

  let id = StoreId(conn.last_insert_rowid());
  debug!(%id, user_id = %input.user_id, domain = %input.domain, "created store");

  Ok(Store {
    id,
    user_id: input.user_id,
    name: input.name,
    description: input.description,
    domain: input.domain,
    template_id: input.template_id,
    ai_config: input.ai_config,
    status,
    theme_colors: input.theme_colors,
    custom_css: input.custom_css,
    created_at: now,
    updated_at: now,
  })
}

pub fn fetch(conn: &Connection, id: StoreId) -> Result<Store> {
  let raw = conn
    .query_row(
      &format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1"),
      params![id.get()],
      RawStore::from_row,
    )
    .optional()?;
  match raw {
    Some(raw) => raw.into_store(),
    None => Err(sql::not_found(Entity::Store, id.get())),
  }
}

pub fn list(conn: &Connection, filter: &StoreFilter) -> Result<Vec<Store>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {STORE_COLUMNS} FROM stores
     WHERE (?1 IS NULL OR user_id = ?1)
       AND (?2 IS NULL OR status = ?2)
     ORDER BY id
     LIMIT ?3 OFFSET ?4"
  ))?;
  let raws = stmt
    .query_map(
      params![
        filter.user_id.map(UserId::get),
        filter.status.map(|s| s.to_string()),
        filter.page.limit,
        filter.page.offset,
      ],
      RawStore::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawStore::into_store).collect()
}

pub fn update(conn: &Connection, id: StoreId, patch: StorePatch) -> Result<Store> {
  let patch = patch.validated()?;
  let mut store = fetch(conn, id)?;

  if let Some(domain) = &patch.domain
    && *domain != store.domain
  {
    ensure_domain_free(conn, domain, Some(id))?;
  }
  if let Some(template_id) = patch.template_id.value()
    && store.template_id != Some(*template_id)
  {
    sql::require_reference(conn, "template_id", Entity::Template, template_id.get())?;
  }

  let from = store.status;
  let requested = patch.status;
  store.apply(patch);

  if let Some(next) = requested
    && from.guard(next) == Guard::Completeness
  {
    let blockers = store.publish_blockers(live_content(conn, id)?);
    if !blockers.is_empty() {
      return Err(shopwright_core::Error::IncompleteStore(blockers).into());
    }
  }

  conn
    .execute(
      "UPDATE stores SET
         name = ?2, description = ?3, domain = ?4, template_id = ?5,
         ai_config = ?6, status = ?7, theme_colors = ?8, custom_css = ?9,
         updated_at = ?10
       WHERE id = ?1",
      params![
        id.get(),
        store.name,
        store.description,
        store.domain,
        store.template_id.map(|t| t.get()),
        store.ai_config,
        store.status.to_string(),
        store.theme_colors,
        store.custom_css,
        encode_dt(store.updated_at),
      ],
    )
    .map_err(|e| sql::write_error(e, "domain", &store.domain))?;

  debug!(%id, %from, to = %store.status, "updated store");
  Ok(store)
}

/// Delete the store and, before it, every content row it owns. The foreign
/// key would cascade on its own; deleting dependents first keeps the
/// behaviour independent of `PRAGMA foreign_keys`.
pub fn delete(conn: &Connection, id: StoreId) -> Result<()> {
  sql::require(conn, Entity::Store, id.get())?;
  let content = conn.execute("DELETE FROM content WHERE store_id = ?1", params![id.get()])?;
  conn.execute("DELETE FROM stores WHERE id = ?1", params![id.get()])?;
  debug!(%id, content, "deleted store");
  Ok(())
}

pub fn current(conn: &Connection, user_id: UserId) -> Result<Option<Store>> {
  sql::require(conn, Entity::User, user_id.get())?;
  let mut stmt = conn.prepare(&format!(
    "SELECT {STORE_COLUMNS} FROM stores WHERE user_id = ?1 AND status = 'published'"
  ))?;
  let candidates = stmt
    .query_map(params![user_id.get()], RawStore::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawStore::into_store)
    .collect::<Result<Vec<_>>>()?;
  Ok(select_current(candidates))
}
