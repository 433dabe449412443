//! Queries against the `users` table.

use rusqlite::{Connection, OptionalExtension as _, params};
use shopwright_core::{
  Entity, clock,
  id::UserId,
  lifecycle::{Lifecycle as _, SubscriptionStatus},
  repository::UserFilter,
  user::{NewUser, User, UserPatch},
};
use tracing::debug;

use crate::{
  Result,
  encode::{RawUser, USER_COLUMNS, encode_dt},
  sql,
};

fn ensure_email_free(conn: &Connection, email: &str, except: Option<UserId>) -> Result<()> {
  let taken = conn
    .query_row(
      "SELECT id FROM users WHERE email = ?1 AND id != ?2",
      params![email, except.map_or(0, UserId::get)],
      |r| r.get::<_, i64>(0),
    )
    .optional()?;
  match taken {
    Some(_) => Err(sql::conflict("email", email)),
    None => Ok(()),
  }
}

pub fn insert(conn: &Connection, input: NewUser) -> Result<User> {
  let input = input.validated()?;
  ensure_email_free(conn, input.email.as_str(), None)?;

  let now = clock::now();
  let status = SubscriptionStatus::initial();
  conn
    .execute(
      "INSERT INTO users (
         email, business_name, subscription_status, subscription_plan,
         created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
      params![
        input.email.as_str(),
        input.business_name,
        status.to_string(),
        input.subscription_plan.map(|p| p.to_string()),
        encode_dt(now),
      ],
    )
    .map_err(|e| sql::write_error(e, "email", input.email.as_str()))?;

  let id = UserId(conn.last_insert_rowid());
  debug!(%id, "created user");

  Ok(User {
    id,
    email: input.email,
    business_name: input.business_name,
    subscription_status: status,
    subscription_plan: input.subscription_plan,
    created_at: now,
    updated_at: now,
  })
}

pub fn fetch(conn: &Connection, id: UserId) -> Result<User> {
  let raw = conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
      params![id.get()],
      RawUser::from_row,
    )
    .optional()?;
  match raw {
    Some(raw) => raw.into_user(),
    None => Err(sql::not_found(Entity::User, id.get())),
  }
}

pub fn list(conn: &Connection, filter: &UserFilter) -> Result<Vec<User>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {USER_COLUMNS} FROM users
     WHERE (?1 IS NULL OR subscription_status = ?1)
     ORDER BY id
     LIMIT ?2 OFFSET ?3"
  ))?;
  let raws = stmt
    .query_map(
      params![
        filter.subscription_status.map(|s| s.to_string()),
        filter.page.limit,
        filter.page.offset,
      ],
      RawUser::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawUser::into_user).collect()
}

pub fn update(conn: &Connection, id: UserId, patch: UserPatch) -> Result<User> {
  let patch = patch.validated()?;
  let mut user = fetch(conn, id)?;

  if let Some(email) = &patch.email
    && *email != user.email
  {
    ensure_email_free(conn, email.as_str(), Some(id))?;
  }

  user.apply(patch);
  conn
    .execute(
      "UPDATE users SET
         email = ?2, business_name = ?3, subscription_status = ?4,
         subscription_plan = ?5, updated_at = ?6
       WHERE id = ?1",
      params![
        id.get(),
        user.email.as_str(),
        user.business_name,
        user.subscription_status.to_string(),
        user.subscription_plan.map(|p| p.to_string()),
        encode_dt(user.updated_at),
      ],
    )
    .map_err(|e| sql::write_error(e, "email", user.email.as_str()))?;

  debug!(%id, status = %user.subscription_status, "updated user");
  Ok(user)
}
