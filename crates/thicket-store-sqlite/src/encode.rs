//! Conversions between SQLite rows and the domain record types.
//!
//! Timestamps are stored as RFC 3339 strings. Text columns are nullable in
//! the schema; a NULL is read back as an empty string.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use thicket_core::record::{Article, Subsubtheme, Subtheme, Theme};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
  Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

pub fn theme_from_row(row: &Row<'_>) -> rusqlite::Result<Theme> {
  Ok(Theme { id: row.get(0)?, name: text(row, 1)? })
}

pub fn subtheme_from_row(row: &Row<'_>) -> rusqlite::Result<Subtheme> {
  Ok(Subtheme { id: row.get(0)?, name: text(row, 1)?, theme: text(row, 2)? })
}

pub fn subsubtheme_from_row(row: &Row<'_>) -> rusqlite::Result<Subsubtheme> {
  Ok(Subsubtheme {
    id:       row.get(0)?,
    name:     text(row, 1)?,
    theme:    text(row, 2)?,
    subtheme: text(row, 3)?,
  })
}

// ─── Article ─────────────────────────────────────────────────────────────────

/// Article row with the timestamp still in its stored text form. Parsing
/// happens outside the connection closure so it can fail with our own error.
pub struct RawArticle {
  pub id:          i64,
  pub name:        String,
  pub theme:       String,
  pub subtheme:    String,
  pub subsubtheme: String,
  pub created_at:  String,
}

impl RawArticle {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        text(row, 1)?,
      theme:       text(row, 2)?,
      subtheme:    text(row, 3)?,
      subsubtheme: text(row, 4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      id:          self.id,
      name:        self.name,
      theme:       self.theme,
      subtheme:    self.subtheme,
      subsubtheme: self.subsubtheme,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
