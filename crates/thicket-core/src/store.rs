//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `thicket-store-sqlite`). The site
//! and admin crates depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::{
  Article, NewArticle, NewSubsubtheme, NewSubtheme, NewTheme, RecordId, Subsubtheme,
  Subtheme, Theme,
};

/// Four independent append-only collections keyed by auto-assigned ids.
///
/// There are no update or delete operations. Listings are ordered by id,
/// which is also insertion order.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the four collections if they do not exist yet. Safe to call any
  /// number of times; existing rows are untouched.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Themes ────────────────────────────────────────────────────────────

  /// Fails if a theme with the same name already exists.
  fn add_theme(
    &self,
    input: NewTheme,
  ) -> impl Future<Output = Result<Theme, Self::Error>> + Send + '_;

  fn list_themes(&self) -> impl Future<Output = Result<Vec<Theme>, Self::Error>> + Send + '_;

  // ── Subthemes ─────────────────────────────────────────────────────────

  fn add_subtheme(
    &self,
    input: NewSubtheme,
  ) -> impl Future<Output = Result<Subtheme, Self::Error>> + Send + '_;

  fn list_subthemes(
    &self,
  ) -> impl Future<Output = Result<Vec<Subtheme>, Self::Error>> + Send + '_;

  // ── Subsubthemes ──────────────────────────────────────────────────────

  fn add_subsubtheme(
    &self,
    input: NewSubsubtheme,
  ) -> impl Future<Output = Result<Subsubtheme, Self::Error>> + Send + '_;

  fn list_subsubthemes(
    &self,
  ) -> impl Future<Output = Result<Vec<Subsubtheme>, Self::Error>> + Send + '_;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Insert an article. `id` and `created_at` are set by the store.
  fn add_article(
    &self,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  fn list_articles(
    &self,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  /// Articles whose three parent fields equal the arguments exactly.
  fn articles_at<'a>(
    &'a self,
    theme: &'a str,
    subtheme: &'a str,
    subsubtheme: &'a str,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + 'a;

  /// Retrieve an article by id. Returns `None` if not found.
  fn get_article(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;
}
