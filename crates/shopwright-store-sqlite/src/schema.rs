//! SQL schema for the Shopwright SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 UTC strings, so text comparison
/// orders them chronologically.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    email               TEXT NOT NULL,
    business_name       TEXT NOT NULL,
    subscription_status TEXT NOT NULL DEFAULT 'trial'
        CHECK (subscription_status IN ('trial', 'active', 'cancelled', 'expired')),
    subscription_plan   TEXT
        CHECK (subscription_plan IN ('starter', 'professional', 'enterprise')),
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    CHECK (created_at <= updated_at)
);

CREATE TABLE IF NOT EXISTS templates (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    description     TEXT,
    category        TEXT NOT NULL
        CHECK (category IN ('retail', 'restaurant', 'services', 'portfolio', 'blog', 'other')),
    preview_image   TEXT,
    template_config TEXT NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    CHECK (created_at <= updated_at)
);

-- Deleting a user removes their stores; templates are never deleted, so the
-- template reference has no cascade.
CREATE TABLE IF NOT EXISTS stores (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    description  TEXT,
    domain       TEXT NOT NULL,
    template_id  INTEGER REFERENCES templates(id),
    ai_config    TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'published', 'maintenance')),
    theme_colors TEXT,
    custom_css   TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    CHECK (created_at <= updated_at)
);

CREATE TABLE IF NOT EXISTS content (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    store_id         INTEGER NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    type             TEXT NOT NULL
        CHECK (type IN ('page', 'product', 'blog_post', 'menu_item', 'testimonial', 'faq')),
    title            TEXT NOT NULL,
    slug             TEXT NOT NULL,
    content_data     TEXT NOT NULL,
    meta_title       TEXT,
    meta_description TEXT,
    status           TEXT NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'published', 'archived')),
    sort_order       INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    CHECK (created_at <= updated_at)
);

CREATE TABLE IF NOT EXISTS landing_pages (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    subtitle        TEXT,
    intro_text      TEXT NOT NULL,
    cta_button_text TEXT NOT NULL,
    cta_button_url  TEXT NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    CHECK (created_at <= updated_at)
);

CREATE UNIQUE INDEX IF NOT EXISTS users_email_key      ON users(email);
CREATE UNIQUE INDEX IF NOT EXISTS stores_domain_key    ON stores(domain);
CREATE UNIQUE INDEX IF NOT EXISTS content_store_slug_key ON content(store_id, slug);

CREATE INDEX IF NOT EXISTS stores_user_idx      ON stores(user_id);
CREATE INDEX IF NOT EXISTS stores_template_idx  ON stores(template_id);
CREATE INDEX IF NOT EXISTS content_order_idx    ON content(store_id, sort_order, id);
CREATE INDEX IF NOT EXISTS templates_active_idx ON templates(is_active);
CREATE INDEX IF NOT EXISTS landing_active_idx   ON landing_pages(is_active);

PRAGMA user_version = 1;
";
