//! Persisted record types.
//!
//! Parent references (`theme`, `subtheme`, `subsubtheme`) are plain strings.
//! They are not checked against the topic tree or against other tables.

use chrono::{DateTime, Utc};

use crate::content::ContentKey;

/// Store-assigned row identifier. Strictly increasing, never reused.
pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
  pub id:   RecordId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtheme {
  pub id:    RecordId,
  pub name:  String,
  pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsubtheme {
  pub id:       RecordId,
  pub name:     String,
  pub theme:    String,
  pub subtheme: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
  pub id:          RecordId,
  pub name:        String,
  pub theme:       String,
  pub subtheme:    String,
  pub subsubtheme: String,
  pub created_at:  DateTime<Utc>,
}

impl Article {
  /// Key of the content stub that belongs to this article.
  pub fn content_key(&self) -> ContentKey { ContentKey::new(self.id, &self.name) }
}

// ─── Insert inputs ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewTheme {
  pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewSubtheme {
  pub name:  String,
  pub theme: String,
}

#[derive(Debug, Clone)]
pub struct NewSubsubtheme {
  pub name:     String,
  pub theme:    String,
  pub subtheme: String,
}

/// Input for [`RecordStore::add_article`](crate::store::RecordStore::add_article).
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewArticle {
  pub name:        String,
  pub theme:       String,
  pub subtheme:    String,
  pub subsubtheme: String,
}
