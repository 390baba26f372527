//! Error types for `thicket-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The article name cannot be turned into a content file name.
  #[error("invalid article name: {0:?}")]
  InvalidArticleName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
