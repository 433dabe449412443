//! Queries against the `landing_pages` table.

use rusqlite::{Connection, OptionalExtension as _, params};
use shopwright_core::{
  Entity, clock,
  id::LandingPageId,
  landing::{LandingPage, LandingPagePatch, NewLandingPage},
  selection::select_current,
};
use tracing::debug;

use crate::{
  Result,
  encode::{LANDING_COLUMNS, RawLandingPage, encode_dt},
  sql,
};

pub fn insert(conn: &Connection, input: NewLandingPage) -> Result<LandingPage> {
  let input = input.validated()?;
  let now = clock::now();
  conn.execute(
    "INSERT INTO landing_pages (
       title, subtitle, intro_text, cta_button_text, cta_button_url,
       is_active, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    params![
      input.title,
      input.subtitle,
      input.intro_text,
      input.cta_button_text,
      input.cta_button_url,
      input.is_active,
      encode_dt(now),
    ],
  )?;

  let id = LandingPageId(conn.last_insert_rowid());
  debug!(%id, "created landing page");

  Ok(LandingPage {
    id,
    title: input.title,
    subtitle: input.subtitle,
    intro_text: input.intro_text,
    cta_button_text: input.cta_button_text,
    cta_button_url: input.cta_button_url,
    is_active: input.is_active,
    created_at: now,
    updated_at: now,
  })
}

pub fn fetch(conn: &Connection, id: LandingPageId) -> Result<LandingPage> {
  let raw = conn
    .query_row(
      &format!("SELECT {LANDING_COLUMNS} FROM landing_pages WHERE id = ?1"),
      params![id.get()],
      RawLandingPage::from_row,
    )
    .optional()?;
  match raw {
    Some(raw) => raw.into_landing_page(),
    None => Err(sql::not_found(Entity::LandingPage, id.get())),
  }
}

pub fn update(
  conn: &Connection,
  id: LandingPageId,
  patch: LandingPagePatch,
) -> Result<LandingPage> {
  let patch = patch.validated()?;
  let mut page = fetch(conn, id)?;
  page.apply(patch);

  conn.execute(
    "UPDATE landing_pages SET
       title = ?2, subtitle = ?3, intro_text = ?4, cta_button_text = ?5,
       cta_button_url = ?6, is_active = ?7, updated_at = ?8
     WHERE id = ?1",
    params![
      id.get(),
      page.title,
      page.subtitle,
      page.intro_text,
      page.cta_button_text,
      page.cta_button_url,
      page.is_active,
      encode_dt(page.updated_at),
    ],
  )?;

  debug!(%id, active = page.is_active, "updated landing page");
  Ok(page)
}

pub fn active(conn: &Connection) -> Result<Option<LandingPage>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {LANDING_COLUMNS} FROM landing_pages WHERE is_active = 1"
  ))?;
  let candidates = stmt
    .query_map([], RawLandingPage::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawLandingPage::into_landing_page)
    .collect::<Result<Vec<_>>>()?;
  Ok(select_current(candidates))
}
