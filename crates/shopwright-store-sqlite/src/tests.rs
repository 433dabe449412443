//! Integration tests for `SqliteRepository` against an in-memory database.

use std::time::Duration;

use shopwright_core::{
  Entity, Error as DomainErr, Patch,
  content::{ContentPatch, ContentType, NewContent},
  email::Email,
  id::{ContentId, StoreId, TemplateId, UserId},
  landing::{LandingPagePatch, NewLandingPage},
  lifecycle::{ContentStatus, StoreStatus, SubscriptionStatus},
  repository::{ContentFilter, Page, Repository, StoreFilter, TemplateFilter, UserFilter},
  storefront::{NewStore, Store, StorePatch},
  template::{NewTemplate, Template, TemplateCategory, TemplatePatch},
  user::{NewUser, SubscriptionPlan, User, UserPatch},
};

use crate::{Error, SqliteRepository};

async fn repo() -> SqliteRepository {
  SqliteRepository::open_in_memory()
    .await
    .expect("in-memory repository")
}

/// Let the wall clock move past the previous write.
async fn tick() { tokio::time::sleep(Duration::from_millis(2)).await; }

fn domain_err(err: Error) -> DomainErr {
  match err {
    Error::Domain(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

fn new_user(email: &str) -> NewUser {
  NewUser {
    email:             Email::parse(email).unwrap(),
    business_name:     "Acme".into(),
    subscription_plan: None,
  }
}

fn new_template(name: &str, category: TemplateCategory) -> NewTemplate {
  NewTemplate {
    name: name.into(),
    description: None,
    category,
    preview_image: None,
    template_config: r#"{"layout":"grid"}"#.into(),
    is_active: true,
  }
}

fn new_store(user_id: UserId, domain: &str) -> NewStore {
  NewStore {
    user_id,
    name: "Corner Shop".into(),
    description: None,
    domain: domain.into(),
    template_id: None,
    ai_config: r#"{"tone":"friendly"}"#.into(),
    theme_colors: None,
    custom_css: None,
  }
}

fn page(store_id: StoreId, slug: &str) -> NewContent {
  NewContent::new(store_id, ContentType::Page, "Home", slug, r#"{"body":"hi"}"#)
}

async fn user(r: &SqliteRepository, email: &str) -> User {
  r.create_user(new_user(email)).await.unwrap()
}

async fn store(r: &SqliteRepository, owner: UserId, domain: &str) -> Store {
  r.create_store(new_store(owner, domain)).await.unwrap()
}

async fn template(r: &SqliteRepository, name: &str) -> Template {
  r.create_template(new_template(name, TemplateCategory::Retail))
    .await
    .unwrap()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_starts_in_trial() {
  let r = repo().await;
  let u = user(&r, "owner@acme.test").await;

  assert_eq!(u.subscription_status, SubscriptionStatus::Trial);
  assert_eq!(u.created_at, u.updated_at);

  let fetched = r.get_user(u.id).await.unwrap();
  assert_eq!(fetched, u);
}

#[tokio::test]
async fn ids_are_distinct() {
  let r = repo().await;
  let a = user(&r, "a@acme.test").await;
  let b = user(&r, "b@acme.test").await;
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
  let r = repo().await;
  user(&r, "dup@acme.test").await;

  let err = domain_err(r.create_user(new_user("dup@acme.test")).await.unwrap_err());
  assert!(matches!(err, DomainErr::UniquenessConflict { field: "email", .. }));

  let users = r.list_users(UserFilter::default()).await.unwrap();
  assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn email_domain_case_does_not_make_a_new_address() {
  let r = repo().await;
  let u = user(&r, "owner@acme.test").await;

  let err = domain_err(r.create_user(new_user("owner@ACME.Test")).await.unwrap_err());
  assert!(matches!(err, DomainErr::UniquenessConflict { field: "email", .. }));
  assert_eq!(r.get_user(u.id).await.unwrap().email.as_str(), "owner@acme.test");
}

#[tokio::test]
async fn email_change_to_taken_address_is_a_conflict() {
  let r = repo().await;
  user(&r, "first@acme.test").await;
  let second = user(&r, "second@acme.test").await;

  let patch = UserPatch {
    email: Some(Email::parse("first@acme.test").unwrap()),
    ..Default::default()
  };
  let err = domain_err(r.update_user(second.id, patch).await.unwrap_err());
  assert!(matches!(err, DomainErr::UniquenessConflict { field: "email", .. }));

  // Re-submitting your own address is not a conflict.
  let patch = UserPatch {
    email: Some(Email::parse("second@acme.test").unwrap()),
    ..Default::default()
  };
  r.update_user(second.id, patch).await.unwrap();
}

#[tokio::test]
async fn update_user_changes_only_provided_fields() {
  let r = repo().await;
  let mut input = new_user("plan@acme.test");
  input.subscription_plan = Some(SubscriptionPlan::Starter);
  let u = r.create_user(input).await.unwrap();

  let patch = UserPatch {
    subscription_status: Some(SubscriptionStatus::Active),
    ..Default::default()
  };
  let updated = r.update_user(u.id, patch).await.unwrap();
  assert_eq!(updated.subscription_status, SubscriptionStatus::Active);
  assert_eq!(updated.subscription_plan, Some(SubscriptionPlan::Starter));
  assert_eq!(updated.business_name, u.business_name);
  assert_eq!(updated.created_at, u.created_at);
  assert!(updated.updated_at > u.updated_at);

  let cleared = r
    .update_user(u.id, UserPatch { subscription_plan: Patch::Null, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(cleared.subscription_plan, None);
}

#[tokio::test]
async fn empty_update_still_advances_updated_at() {
  let r = repo().await;
  let u = user(&r, "noop@acme.test").await;
  let once = r.update_user(u.id, UserPatch::default()).await.unwrap();
  let twice = r.update_user(u.id, UserPatch::default()).await.unwrap();
  assert!(once.updated_at > u.updated_at);
  assert!(twice.updated_at > once.updated_at);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
  let r = repo().await;
  let err = domain_err(r.get_user(UserId(404)).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { entity: Entity::User, id: 404 }));

  let err = domain_err(r.update_user(UserId(404), UserPatch::default()).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { entity: Entity::User, .. }));
}

#[tokio::test]
async fn list_users_filters_and_pages_in_id_order() {
  let r = repo().await;
  let mut ids = Vec::new();
  for n in 0..5 {
    ids.push(user(&r, &format!("u{n}@acme.test")).await.id);
  }
  r.update_user(
    ids[1],
    UserPatch { subscription_status: Some(SubscriptionStatus::Active), ..Default::default() },
  )
  .await
  .unwrap();

  let page = r
    .list_users(UserFilter { page: Page { limit: 2, offset: 2 }, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), ids[2..4].to_vec());

  let active = r
    .list_users(UserFilter {
      subscription_status: Some(SubscriptionStatus::Active),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].id, ids[1]);
}

// ─── Templates ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn current_template_is_most_recently_updated_active_one() {
  let r = repo().await;
  let t1 = template(&r, "one").await;
  tick().await;
  let t2 = template(&r, "two").await;
  tick().await;
  let t3 = template(&r, "three").await;

  let current = r.current_template(None).await.unwrap().unwrap();
  assert_eq!(current.id, t3.id);

  tick().await;
  r.update_template(t1.id, TemplatePatch { name: Some("one again".into()), ..Default::default() })
    .await
    .unwrap();
  let current = r.current_template(None).await.unwrap().unwrap();
  assert_eq!(current.id, t1.id);

  for id in [t1.id, t2.id, t3.id] {
    r.update_template(id, TemplatePatch { is_active: Some(false), ..Default::default() })
      .await
      .unwrap();
  }
  assert!(r.current_template(None).await.unwrap().is_none());
}

#[tokio::test]
async fn current_template_respects_category() {
  let r = repo().await;
  let retail = template(&r, "shop").await;
  tick().await;
  r.create_template(new_template("menu", TemplateCategory::Restaurant))
    .await
    .unwrap();

  let current = r
    .current_template(Some(TemplateCategory::Retail))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(current.id, retail.id);
  assert!(
    r.current_template(Some(TemplateCategory::Blog))
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn list_templates_filters_by_activity() {
  let r = repo().await;
  let t = template(&r, "old").await;
  template(&r, "new").await;
  r.update_template(t.id, TemplatePatch { is_active: Some(false), ..Default::default() })
    .await
    .unwrap();

  let active = r
    .list_templates(TemplateFilter { is_active: Some(true), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "new");
}

#[tokio::test]
async fn deactivating_a_template_leaves_stores_alone() {
  let r = repo().await;
  let owner = user(&r, "t@acme.test").await;
  let t = template(&r, "base").await;
  let mut input = new_store(owner.id, "t.example.com");
  input.template_id = Some(t.id);
  let s = r.create_store(input).await.unwrap();

  r.update_template(t.id, TemplatePatch { is_active: Some(false), ..Default::default() })
    .await
    .unwrap();
  let s = r.get_store(s.id).await.unwrap();
  assert_eq!(s.template_id, Some(t.id));
}

// ─── Stores ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_store_starts_as_normalised_draft() {
  let r = repo().await;
  let owner = user(&r, "s@acme.test").await;
  let s = store(&r, owner.id, "  Shop.Example.COM ").await;

  assert_eq!(s.status, StoreStatus::Draft);
  assert_eq!(s.domain, "shop.example.com");
  assert_eq!(s.created_at, s.updated_at);
}

#[tokio::test]
async fn create_store_checks_references() {
  let r = repo().await;
  let err = domain_err(
    r.create_store(new_store(UserId(99), "x.example.com"))
      .await
      .unwrap_err(),
  );
  assert!(matches!(
    err,
    DomainErr::ReferentialViolation { field: "user_id", entity: Entity::User, id: 99 }
  ));

  let owner = user(&r, "ref@acme.test").await;
  let mut input = new_store(owner.id, "x.example.com");
  input.template_id = Some(TemplateId(7));
  let err = domain_err(r.create_store(input).await.unwrap_err());
  assert!(matches!(err, DomainErr::ReferentialViolation { field: "template_id", .. }));
  assert!(r.list_stores(StoreFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn domain_is_unique_across_owners() {
  let r = repo().await;
  let a = user(&r, "a@acme.test").await;
  let b = user(&r, "b@acme.test").await;
  store(&r, a.id, "shared.example.com").await;

  let err = domain_err(
    r.create_store(new_store(b.id, "SHARED.example.com"))
      .await
      .unwrap_err(),
  );
  assert!(matches!(err, DomainErr::UniquenessConflict { field: "domain", .. }));
}

#[tokio::test]
async fn concurrent_creates_claim_a_domain_once() {
  let r = repo().await;
  let a = user(&r, "a@acme.test").await;
  let b = user(&r, "b@acme.test").await;

  let (first, second) = tokio::join!(
    r.create_store(new_store(a.id, "race.example.com")),
    r.create_store(new_store(b.id, "race.example.com"))
  );

  let outcomes = [first, second];
  assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
  let conflicts = outcomes
    .into_iter()
    .filter_map(Result::err)
    .map(domain_err)
    .filter(|e| matches!(e, DomainErr::UniquenessConflict { field: "domain", .. }))
    .count();
  assert_eq!(conflicts, 1);
  assert_eq!(r.list_stores(StoreFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn publishing_requires_live_content() {
  let r = repo().await;
  let owner = user(&r, "pub@acme.test").await;
  let s = store(&r, owner.id, "pub.example.com").await;
  let publish = || StorePatch { status: Some(StoreStatus::Published), ..Default::default() };

  let err = domain_err(r.update_store(s.id, publish()).await.unwrap_err());
  match err {
    DomainErr::IncompleteStore(missing) => {
      assert_eq!(missing, vec!["store has no unarchived content".to_owned()]);
    }
    other => panic!("expected IncompleteStore, got {other:?}"),
  }
  assert_eq!(r.get_store(s.id).await.unwrap().status, StoreStatus::Draft);

  r.create_content(page(s.id, "home")).await.unwrap();
  let published = r.update_store(s.id, publish()).await.unwrap();
  assert_eq!(published.status, StoreStatus::Published);
}

#[tokio::test]
async fn archived_content_does_not_count_towards_publishing() {
  let r = repo().await;
  let owner = user(&r, "arch@acme.test").await;
  let s = store(&r, owner.id, "arch.example.com").await;
  let c = r.create_content(page(s.id, "home")).await.unwrap();
  r.update_content(c.id, ContentPatch { status: Some(ContentStatus::Archived), ..Default::default() })
    .await
    .unwrap();

  let err = domain_err(
    r.update_store(s.id, StorePatch { status: Some(StoreStatus::Published), ..Default::default() })
      .await
      .unwrap_err(),
  );
  assert!(matches!(err, DomainErr::IncompleteStore(_)));
}

#[tokio::test]
async fn store_can_leave_and_reenter_published() {
  let r = repo().await;
  let owner = user(&r, "cycle@acme.test").await;
  let s = store(&r, owner.id, "cycle.example.com").await;
  r.create_content(page(s.id, "home")).await.unwrap();

  for status in [
    StoreStatus::Published,
    StoreStatus::Maintenance,
    StoreStatus::Draft,
    StoreStatus::Published,
  ] {
    let s = r
      .update_store(s.id, StorePatch { status: Some(status), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(s.status, status);
  }
}

#[tokio::test]
async fn current_store_picks_latest_published() {
  let r = repo().await;
  let owner = user(&r, "cur@acme.test").await;
  assert!(r.current_store(owner.id).await.unwrap().is_none());

  let mut published = Vec::new();
  for domain in ["one.example.com", "two.example.com"] {
    let s = store(&r, owner.id, domain).await;
    r.create_content(page(s.id, "home")).await.unwrap();
    tick().await;
    let s = r
      .update_store(s.id, StorePatch { status: Some(StoreStatus::Published), ..Default::default() })
      .await
      .unwrap();
    published.push(s);
  }
  store(&r, owner.id, "draft.example.com").await;

  let current = r.current_store(owner.id).await.unwrap().unwrap();
  assert_eq!(current.id, published[1].id);

  let err = domain_err(r.current_store(UserId(404)).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { entity: Entity::User, .. }));
}

#[tokio::test]
async fn delete_store_removes_its_content() {
  let r = repo().await;
  let owner = user(&r, "del@acme.test").await;
  let s = store(&r, owner.id, "del.example.com").await;
  let keep = store(&r, owner.id, "keep.example.com").await;
  let gone = r.create_content(page(s.id, "home")).await.unwrap();
  r.create_content(page(keep.id, "home")).await.unwrap();

  r.delete_store(s.id).await.unwrap();

  let err = domain_err(r.get_store(s.id).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { entity: Entity::Store, .. }));
  let err = domain_err(r.get_content(gone.id).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { entity: Entity::Content, .. }));
  assert_eq!(
    r.list_content(ContentFilter::for_store(keep.id))
      .await
      .unwrap()
      .len(),
    1
  );

  let err = domain_err(r.delete_store(s.id).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { .. }));
}

#[tokio::test]
async fn clearing_a_nullable_store_field() {
  let r = repo().await;
  let owner = user(&r, "null@acme.test").await;
  let mut input = new_store(owner.id, "null.example.com");
  input.custom_css = Some("body { color: red }".into());
  let s = r.create_store(input).await.unwrap();

  let s = r
    .update_store(s.id, StorePatch { custom_css: Patch::Null, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(s.custom_css, None);
  assert_eq!(s.name, "Corner Shop");
}

// ─── Content ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn slugs_are_unique_per_store_only() {
  let r = repo().await;
  let owner = user(&r, "slug@acme.test").await;
  let a = store(&r, owner.id, "a.example.com").await;
  let b = store(&r, owner.id, "b.example.com").await;

  r.create_content(page(a.id, "about")).await.unwrap();
  r.create_content(page(b.id, "about")).await.unwrap();

  let err = domain_err(r.create_content(page(a.id, "about")).await.unwrap_err());
  assert!(matches!(err, DomainErr::UniquenessConflict { field: "slug", .. }));
}

#[tokio::test]
async fn content_requires_existing_store() {
  let r = repo().await;
  let err = domain_err(r.create_content(page(StoreId(5), "x")).await.unwrap_err());
  assert!(matches!(err, DomainErr::ReferentialViolation { field: "store_id", .. }));
}

#[tokio::test]
async fn archiving_changes_only_status() {
  let r = repo().await;
  let owner = user(&r, "only@acme.test").await;
  let s = store(&r, owner.id, "only.example.com").await;
  let c = r.create_content(page(s.id, "home")).await.unwrap();

  let archived = r
    .update_content(c.id, ContentPatch { status: Some(ContentStatus::Archived), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(archived.status, ContentStatus::Archived);
  assert_eq!(archived.title, c.title);
  assert_eq!(archived.slug, c.slug);
  assert_eq!(archived.content_data, c.content_data);
  assert_eq!(archived.sort_order, c.sort_order);
  assert!(archived.updated_at > c.updated_at);
  assert_eq!(r.get_content(c.id).await.unwrap(), archived);
}

#[tokio::test]
async fn list_content_orders_by_sort_order_then_id() {
  let r = repo().await;
  let owner = user(&r, "ord@acme.test").await;
  let s = store(&r, owner.id, "ord.example.com").await;

  let mut ids = Vec::new();
  for (slug, order) in [("c", 2), ("a", 1), ("b", 1)] {
    let mut input = page(s.id, slug);
    input.sort_order = order;
    ids.push(r.create_content(input).await.unwrap().id);
  }

  let listed: Vec<ContentId> = r
    .list_content(ContentFilter::for_store(s.id))
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(listed, vec![ids[1], ids[2], ids[0]]);

  let mut filter = ContentFilter::for_store(s.id);
  filter.content_type = Some(ContentType::Product);
  assert!(r.list_content(filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn slug_change_rechecks_uniqueness() {
  let r = repo().await;
  let owner = user(&r, "re@acme.test").await;
  let s = store(&r, owner.id, "re.example.com").await;
  r.create_content(page(s.id, "taken")).await.unwrap();
  let c = r.create_content(page(s.id, "free")).await.unwrap();

  let err = domain_err(
    r.update_content(c.id, ContentPatch { slug: Some("taken".into()), ..Default::default() })
      .await
      .unwrap_err(),
  );
  assert!(matches!(err, DomainErr::UniquenessConflict { field: "slug", .. }));
  assert_eq!(r.get_content(c.id).await.unwrap().slug, "free");
}

#[tokio::test]
async fn delete_content_twice_is_not_found() {
  let r = repo().await;
  let owner = user(&r, "twice@acme.test").await;
  let s = store(&r, owner.id, "twice.example.com").await;
  let c = r.create_content(page(s.id, "home")).await.unwrap();

  r.delete_content(c.id).await.unwrap();
  let err = domain_err(r.delete_content(c.id).await.unwrap_err());
  assert!(matches!(err, DomainErr::NotFound { entity: Entity::Content, .. }));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_writing() {
  let r = repo().await;
  let owner = user(&r, "bad@acme.test").await;
  let s = store(&r, owner.id, "bad.example.com").await;

  let err = domain_err(r.create_content(page(s.id, "Not A Slug")).await.unwrap_err());
  match err {
    DomainErr::Validation(v) => assert!(v.touches("slug")),
    other => panic!("expected Validation, got {other:?}"),
  }
  assert!(
    r.list_content(ContentFilter::for_store(s.id))
      .await
      .unwrap()
      .is_empty()
  );
}

// ─── Landing pages ───────────────────────────────────────────────────────────

fn landing(title: &str) -> NewLandingPage {
  NewLandingPage {
    title: title.into(),
    subtitle: None,
    intro_text: "Build a shop in minutes.".into(),
    cta_button_text: "Start".into(),
    cta_button_url: "https://shopwright.example/signup".into(),
    is_active: true,
  }
}

#[tokio::test]
async fn active_landing_page_tracks_latest_active() {
  let r = repo().await;
  assert!(r.active_landing_page().await.unwrap().is_none());

  let first = r.create_landing_page(landing("First")).await.unwrap();
  tick().await;
  let second = r.create_landing_page(landing("Second")).await.unwrap();
  assert_eq!(r.active_landing_page().await.unwrap().unwrap().id, second.id);

  r.update_landing_page(second.id, LandingPagePatch { is_active: Some(false), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(r.active_landing_page().await.unwrap().unwrap().id, first.id);
  assert!(!r.get_landing_page(second.id).await.unwrap().is_active);
}
