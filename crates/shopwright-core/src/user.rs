//! User: a business account that owns storefronts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  clock,
  email::Email,
  error::Violations,
  id::UserId,
  lifecycle::SubscriptionStatus,
  patch::Patch,
  validate::{self, Record, rules},
};

/// The paid tier a user is on, if any.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
  strum::Display, strum::AsRefStr, strum::EnumString, strum::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionPlan {
  Starter,
  Professional,
  Enterprise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:                  UserId,
  /// Unique across all users.
  pub email:               Email,
  pub business_name:       String,
  pub subscription_status: SubscriptionStatus,
  pub subscription_plan:   Option<SubscriptionPlan>,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

impl User {
  /// Merge `patch` into this user and stamp a new `updated_at`. Fields the
  /// patch leaves absent are untouched.
  pub fn apply(&mut self, patch: UserPatch) {
    if let Some(email) = patch.email {
      self.email = email;
    }
    if let Some(name) = patch.business_name {
      self.business_name = name;
    }
    if let Some(status) = patch.subscription_status {
      self.subscription_status = status;
    }
    patch.subscription_plan.apply_to(&mut self.subscription_plan);
    self.updated_at = clock::advance(self.updated_at);
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::repository::Repository::create_user`]. New users always
/// start on a trial.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:             Email,
  pub business_name:     String,
  pub subscription_plan: Option<SubscriptionPlan>,
}

impl NewUser {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let email = r.required("email", validate::email);
    let business_name = r.required("business_name", validate::text);
    let plan = r.nullable("subscription_plan", validate::choice::<SubscriptionPlan>);

    let (Some(email), Some(business_name)) = (email, business_name) else {
      return Err(r.into_violations());
    };
    r.finish()?;
    Ok(Self { email, business_name, subscription_plan: plan.value().copied() })
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    v.check("business_name", rules::non_empty(&self.business_name));
    v.into_result().map(|()| self)
  }
}

/// A partial update of a [`User`].
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
  pub email:               Option<Email>,
  pub business_name:       Option<String>,
  pub subscription_status: Option<SubscriptionStatus>,
  pub subscription_plan:   Patch<SubscriptionPlan>,
}

impl UserPatch {
  pub fn from_json(value: &Value) -> Result<Self, Violations> {
    let mut r = Record::new(value)?;
    let patch = Self {
      email:               r.optional("email", validate::email),
      business_name:       r.optional("business_name", validate::text),
      subscription_status: r.optional(
        "subscription_status",
        validate::choice::<SubscriptionStatus>,
      ),
      subscription_plan:   r.nullable(
        "subscription_plan",
        validate::choice::<SubscriptionPlan>,
      ),
    };
    r.finish().map(|()| patch)
  }

  pub fn validated(self) -> Result<Self, Violations> {
    let mut v = Violations::default();
    if let Some(name) = &self.business_name {
      v.check("business_name", rules::non_empty(name));
    }
    v.into_result().map(|()| self)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn user() -> User {
    let at = clock::now();
    User {
      id:                  UserId(1),
      email:               Email::parse("a@x.com").unwrap(),
      business_name:       "Acme".into(),
      subscription_status: SubscriptionStatus::Trial,
      subscription_plan:   Some(SubscriptionPlan::Starter),
      created_at:          at,
      updated_at:          at,
    }
  }

  #[test]
  fn new_user_reports_every_problem() {
    let body = json!({ "email": "nope", "business_name": "", "subscription_plan": "gold" });
    let v = NewUser::from_json(&body).unwrap_err();
    assert_eq!(v.len(), 3);
    assert!(v.touches("email"));
    assert!(v.touches("business_name"));
    assert!(v.touches("subscription_plan"));
  }

  #[test]
  fn new_user_plan_is_optional() {
    let body = json!({ "email": "a@x.com", "business_name": "Acme" });
    let input = NewUser::from_json(&body).unwrap();
    assert_eq!(input.subscription_plan, None);
  }

  #[test]
  fn patch_rejects_null_for_required_columns() {
    let v = UserPatch::from_json(&json!({ "email": null })).unwrap_err();
    assert!(v.touches("email"));
  }

  #[test]
  fn apply_touches_only_supplied_fields() {
    let mut u = user();
    let before = u.clone();
    let patch =
      UserPatch::from_json(&json!({ "subscription_status": "active" })).unwrap();
    u.apply(patch);

    assert_eq!(u.subscription_status, SubscriptionStatus::Active);
    assert_eq!(u.email, before.email);
    assert_eq!(u.business_name, before.business_name);
    assert_eq!(u.subscription_plan, before.subscription_plan);
    assert_eq!(u.created_at, before.created_at);
    assert!(u.updated_at > before.updated_at);
  }

  #[test]
  fn explicit_null_clears_the_plan() {
    let mut u = user();
    u.apply(UserPatch::from_json(&json!({ "subscription_plan": null })).unwrap());
    assert_eq!(u.subscription_plan, None);
  }

  #[test]
  fn empty_patch_still_advances_updated_at() {
    let mut u = user();
    let before = u.updated_at;
    u.apply(UserPatch::default());
    assert!(u.updated_at > before);
  }
}
