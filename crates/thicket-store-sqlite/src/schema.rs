//! SQL schema for the Thicket SQLite store.
//!
//! The four tables are independent: parent names are copied in as text and
//! there are no foreign keys, so rows never have to agree with each other or
//! with the topic tree.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS theme (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS subtheme (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT,
    theme TEXT
);

CREATE TABLE IF NOT EXISTS subsubtheme (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT,
    theme    TEXT,
    subtheme TEXT
);

CREATE TABLE IF NOT EXISTS article (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT,
    theme       TEXT,
    subtheme    TEXT,
    subsubtheme TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS article_leaf_idx ON article(theme, subtheme, subsubtheme);

PRAGMA user_version = 1;
";
