//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row};
use thicket_core::{
  record::{
    Article, NewArticle, NewSubsubtheme, NewSubtheme, NewTheme, RecordId, Subsubtheme,
    Subtheme, Theme,
  },
  store::RecordStore,
};

use crate::{
  Result,
  encode::{RawArticle, encode_dt, subsubtheme_from_row, subtheme_from_row, theme_from_row},
  schema::SCHEMA,
};

const ARTICLE_COLUMNS: &str = "id, name, theme, subtheme, subsubtheme, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Thicket record store backed by a single SQLite file.
///
/// Opening does not create any tables; call [`RecordStore::initialize`] for
/// that. Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  /// Close the connection, surfacing any error from the final flush.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// Run an `INSERT` and return the new row id.
  async fn insert(
    &self,
    sql: &'static str,
    params: Vec<String>,
  ) -> Result<RecordId> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(sql, rusqlite::params_from_iter(params.iter()))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  /// Run a `SELECT` and map every row.
  async fn query_all<T, F>(&self, sql: String, params: Vec<String>, map: F) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| map(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn initialize(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Themes ────────────────────────────────────────────────────────────────

  async fn add_theme(&self, input: NewTheme) -> Result<Theme> {
    let id = self
      .insert("INSERT INTO theme (name) VALUES (?1)", vec![input.name.clone()])
      .await?;
    Ok(Theme { id, name: input.name })
  }

  async fn list_themes(&self) -> Result<Vec<Theme>> {
    self
      .query_all("SELECT id, name FROM theme ORDER BY id".into(), vec![], theme_from_row)
      .await
  }

  // ── Subthemes ─────────────────────────────────────────────────────────────

  async fn add_subtheme(&self, input: NewSubtheme) -> Result<Subtheme> {
    let id = self
      .insert("INSERT INTO subtheme (name, theme) VALUES (?1, ?2)", vec![
        input.name.clone(),
        input.theme.clone(),
      ])
      .await?;
    Ok(Subtheme { id, name: input.name, theme: input.theme })
  }

  async fn list_subthemes(&self) -> Result<Vec<Subtheme>> {
    self
      .query_all(
        "SELECT id, name, theme FROM subtheme ORDER BY id".into(),
        vec![],
        subtheme_from_row,
      )
      .await
  }

  // ── Subsubthemes ──────────────────────────────────────────────────────────

  async fn add_subsubtheme(&self, input: NewSubsubtheme) -> Result<Subsubtheme> {
    let id = self
      .insert(
        "INSERT INTO subsubtheme (name, theme, subtheme) VALUES (?1, ?2, ?3)",
        vec![input.name.clone(), input.theme.clone(), input.subtheme.clone()],
      )
      .await?;
    Ok(Subsubtheme {
      id,
      name: input.name,
      theme: input.theme,
      subtheme: input.subtheme,
    })
  }

  async fn list_subsubthemes(&self) -> Result<Vec<Subsubtheme>> {
    self
      .query_all(
        "SELECT id, name, theme, subtheme FROM subsubtheme ORDER BY id".into(),
        vec![],
        subsubtheme_from_row,
      )
      .await
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn add_article(&self, input: NewArticle) -> Result<Article> {
    let created_at = Utc::now();
    let id = self
      .insert(
        "INSERT INTO article (name, theme, subtheme, subsubtheme, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        vec![
          input.name.clone(),
          input.theme.clone(),
          input.subtheme.clone(),
          input.subsubtheme.clone(),
          encode_dt(created_at),
        ],
      )
      .await?;

    Ok(Article {
      id,
      name: input.name,
      theme: input.theme,
      subtheme: input.subtheme,
      subsubtheme: input.subsubtheme,
      created_at,
    })
  }

  async fn list_articles(&self) -> Result<Vec<Article>> {
    let raws = self
      .query_all(
        format!("SELECT {ARTICLE_COLUMNS} FROM article ORDER BY id"),
        vec![],
        RawArticle::from_row,
      )
      .await?;
    raws.into_iter().map(RawArticle::into_article).collect()
  }

  async fn articles_at<'a>(
    &'a self,
    theme: &'a str,
    subtheme: &'a str,
    subsubtheme: &'a str,
  ) -> Result<Vec<Article>> {
    let raws = self
      .query_all(
        format!(
          "SELECT {ARTICLE_COLUMNS} FROM article
           WHERE theme = ?1 AND subtheme = ?2 AND subsubtheme = ?3
           ORDER BY id"
        ),
        vec![theme.to_owned(), subtheme.to_owned(), subsubtheme.to_owned()],
        RawArticle::from_row,
      )
      .await?;
    raws.into_iter().map(RawArticle::into_article).collect()
  }

  async fn get_article(&self, id: RecordId) -> Result<Option<Article>> {
    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ARTICLE_COLUMNS} FROM article WHERE id = ?1"),
              rusqlite::params![id],
              RawArticle::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }
}
