//! Queries against the `templates` table.

use rusqlite::{Connection, OptionalExtension as _, params};
use shopwright_core::{
  Entity, clock,
  id::TemplateId,
  repository::TemplateFilter,
  selection::select_current,
  template::{NewTemplate, Template, TemplateCategory, TemplatePatch},
};
use tracing::debug;

use crate::{
  Result,
  encode::{RawTemplate, TEMPLATE_COLUMNS, encode_dt},
  sql,
};

pub fn insert(conn: &Connection, input: NewTemplate) -> Result<Template> {
  let input = input.validated()?;
  let now = clock::now();
  conn.execute(
    "INSERT INTO templates (
       name, description, category, preview_image, template_config,
       is_active, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    params![
      input.name,
      input.description,
      input.category.to_string(),
      input.preview_image,
      input.template_config,
      input.is_active,
      encode_dt(now),
    ],
  )?;

  let id = TemplateId(conn.last_insert_rowid());
  debug!(%id, category = %input.category, "created template");

  Ok(Template {
    id,
    name: input.name,
    description: input.description,
    category: input.category,
    preview_image: input.preview_image,
    template_config: input.template_config,
    is_active: input.is_active,
    created_at: now,
    updated_at: now,
  })
}

pub fn fetch(conn: &Connection, id: TemplateId) -> Result<Template> {
  let raw = conn
    .query_row(
      &format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1"),
      params![id.get()],
      RawTemplate::from_row,
    )
    .optional()?;
  match raw {
    Some(raw) => raw.into_template(),
    None => Err(sql::not_found(Entity::Template, id.get())),
  }
}

pub fn list(conn: &Connection, filter: &TemplateFilter) -> Result<Vec<Template>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TEMPLATE_COLUMNS} FROM templates
     WHERE (?1 IS NULL OR category = ?1)
       AND (?2 IS NULL OR is_active = ?2)
     ORDER BY id
     LIMIT ?3 OFFSET ?4"
  ))?;
  let raws = stmt
    .query_map(
      params![
        filter.category.map(|c| c.to_string()),
        filter.is_active,
        filter.page.limit,
        filter.page.offset,
      ],
      RawTemplate::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawTemplate::into_template).collect()
}

pub fn update(conn: &Connection, id: TemplateId, patch: TemplatePatch) -> Result<Template> {
  let patch = patch.validated()?;
  let mut template = fetch(conn, id)?;
  template.apply(patch);

  conn.execute(
    "UPDATE templates SET
       name = ?2, description = ?3, category = ?4, preview_image = ?5,
       template_config = ?6, is_active = ?7, updated_at = ?8
     WHERE id = ?1",
    params![
      id.get(),
      template.name,
      template.description,
      template.category.to_string(),
      template.preview_image,
      template.template_config,
      template.is_active,
      encode_dt(template.updated_at),
    ],
  )?;

  debug!(%id, active = template.is_active, "updated template");
  Ok(template)
}

pub fn current(
  conn: &Connection,
  category: Option<TemplateCategory>,
) -> Result<Option<Template>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TEMPLATE_COLUMNS} FROM templates
     WHERE is_active = 1 AND (?1 IS NULL OR category = ?1)"
  ))?;
  let candidates = stmt
    .query_map(params![category.map(|c| c.to_string())], RawTemplate::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawTemplate::into_template)
    .collect::<Result<Vec<_>>>()?;
  Ok(select_current(candidates))
}
