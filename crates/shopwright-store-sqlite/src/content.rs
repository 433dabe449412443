//! Queries against the `content` table.

use rusqlite::{Connection, OptionalExtension as _, params};
use shopwright_core::{
  Entity, clock,
  content::{Content, ContentPatch, NewContent},
  id::{ContentId, StoreId},
  repository::ContentFilter,
};
use tracing::debug;

use crate::{
  Result,
  encode::{CONTENT_COLUMNS, RawContent, encode_dt},
  sql,
};

fn ensure_slug_free(
  conn: &Connection,
  store_id: StoreId,
  slug: &str,
  except: Option<ContentId>,
) -> Result<()> {
  let taken = conn
    .query_row(
      "SELECT id FROM content WHERE store_id = ?1 AND slug = ?2 AND id != ?3",
      params![store_id.get(), slug, except.map_or(0, ContentId::get)],
      |r| r.get::<_, i64>(0),
    )
    .optional()?;
  match taken {
    Some(_) => Err(sql::conflict("slug", slug)),
    None => Ok(()),
  }
}

pub fn insert(conn: &Connection, input: NewContent) -> Result<Content> {
  let input = input.validated()?;
  sql::require_reference(conn, "store_id", Entity::Store, input.store_id.get())?;
  ensure_slug_free(conn, input.store_id, &input.slug, None)?;

  let now = clock::now();
  conn
    .execute(
      "INSERT INTO content (
         store_id, type, title, slug, content_data, meta_title,
         meta_description, status, sort_order, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
      params![
        input.store_id.get(),
        input.content_type.to_string(),
        input.title,
        input.slug,
        input.content_data,
        input.meta_title,
        input.meta_description,
        input.status.to_string(),
        input.sort_order,
        encode_dt(now),
      ],
    )
    .map_err(|e| sql::write_error(e, "slug", &input.slug))?;

  let id = ContentId(conn.last_insert_rowid());
  debug!(%id, store_id = %input.store_id, slug = %input.slug, "created content");

  Ok(Content {
    id,
    store_id: input.store_id,
    content_type: input.content_type,
    title: input.title,
    slug: input.slug,
    content_data: input.content_data,
    meta_title: input.meta_title,
    meta_description: input.meta_description,
    status: input.status,
    sort_order: input.sort_order,
    created_at: now,
    updated_at: now,
  })
}

pub fn fetch(conn: &Connection, id: ContentId) -> Result<Content> {
  let raw = conn
    .query_row(
      &format!("SELECT {CONTENT_COLUMNS} FROM content WHERE id = ?1"),
      params![id.get()],
      RawContent::from_row,
    )
    .optional()?;
  match raw {
    Some(raw) => raw.into_content(),
    None => Err(sql::not_found(Entity::Content, id.get())),
  }
}

pub fn list(conn: &Connection, filter: &ContentFilter) -> Result<Vec<Content>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {CONTENT_COLUMNS} FROM content
     WHERE store_id = ?1
       AND (?2 IS NULL OR type = ?2)
       AND (?3 IS NULL OR status = ?3)
     ORDER BY sort_order, id
     LIMIT ?4 OFFSET ?5"
  ))?;
  let raws = stmt
    .query_map(
      params![
        filter.store_id.get(),
        filter.content_type.map(|t| t.to_string()),
        filter.status.map(|s| s.to_string()),
        filter.page.limit,
        filter.page.offset,
      ],
      RawContent::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawContent::into_content).collect()
}

pub fn update(conn: &Connection, id: ContentId, patch: ContentPatch) -> Result<Content> {
  let patch = patch.validated()?;
  let mut content = fetch(conn, id)?;

  if let Some(slug) = &patch.slug
    && *slug != content.slug
  {
    ensure_slug_free(conn, content.store_id, slug, Some(id))?;
  }

  content.apply(patch);
  conn
    .execute(
      "UPDATE content SET
         title = ?2, slug = ?3, content_data = ?4, meta_title = ?5,
         meta_description = ?6, status = ?7, sort_order = ?8, updated_at = ?9
       WHERE id = ?1",
      params![
        id.get(),
        content.title,
        content.slug,
        content.content_data,
        content.meta_title,
        content.meta_description,
        content.status.to_string(),
        content.sort_order,
        encode_dt(content.updated_at),
      ],
    )
    .map_err(|e| sql::write_error(e, "slug", &content.slug))?;

  debug!(%id, status = %content.status, "updated content");
  Ok(content)
}

pub fn delete(conn: &Connection, id: ContentId) -> Result<()> {
  let removed = conn.execute("DELETE FROM content WHERE id = ?1", params![id.get()])?;
  if removed == 0 {
    return Err(sql::not_found(Entity::Content, id.get()));
  }
  debug!(%id, "deleted content");
  Ok(())
}
