//! Article content keys and the stub file format.
//!
//! Every article has one stub file named `{id}-{name}.html` in the content
//! directory. The id is a decimal integer without `-`, so the first `-`
//! always splits the key unambiguously and the mapping is injective.

use crate::{Error, Result, record::RecordId};

/// Written verbatim into every new stub.
pub const STUB_TEMPLATE: &str =
  "{% extends 'article.html' %}\n{% block content %}\n\n\n{% endblock %}";

const BLOCK_START: &str = "{% block content %}";
const BLOCK_END: &str = "{% endblock %}";

/// `{id}-{name}`, the lookup key for an article's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
  pub fn new(id: RecordId, name: &str) -> Self { Self(format!("{id}-{name}")) }

  /// File name of the stub inside the content directory.
  pub fn file_name(&self) -> String { format!("{}.html", self.0) }
}

/// Reject names that cannot live as a single file in the content directory.
pub fn validate_article_name(name: &str) -> Result<()> {
  if name.is_empty() || name.contains(['/', '\\', '\0']) {
    return Err(Error::InvalidArticleName(name.to_owned()));
  }
  Ok(())
}

/// Body of the `content` block of a stub. Files without the block markers
/// are returned unchanged.
pub fn extract_content_block(stub: &str) -> &str {
  let Some(start) = stub.find(BLOCK_START) else {
    return stub;
  };
  let body = &stub[start + BLOCK_START.len()..];
  match body.find(BLOCK_END) {
    Some(end) => &body[..end],
    None => body,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn key_combines_id_and_name() {
    let key = ContentKey::new(7, "Page tables");
    assert_eq!(key.file_name(), "7-Page tables.html");
  }

  #[test]
  fn keys_with_dashes_in_name_stay_distinct() {
    assert_ne!(ContentKey::new(1, "2-x"), ContentKey::new(12, "x"));
    assert_ne!(ContentKey::new(1, "-x"), ContentKey::new(1, "x"));
  }

  #[test]
  fn rejects_path_like_names() {
    assert!(validate_article_name("").is_err());
    assert!(validate_article_name("../etc").is_err());
    assert!(validate_article_name("a\\b").is_err());
    assert!(validate_article_name("Fischer: game 1").is_ok());
  }

  #[test]
  fn fresh_stub_has_blank_content() {
    assert_eq!(extract_content_block(STUB_TEMPLATE), "\n\n\n");
  }

  #[test]
  fn extracts_edited_content() {
    let stub = "{% extends 'article.html' %}\n{% block content %}\n<p>e4 e5</p>\n{% endblock %}";
    assert_eq!(extract_content_block(stub).trim(), "<p>e4 e5</p>");
    assert_eq!(extract_content_block("<p>raw</p>"), "<p>raw</p>");
  }
}
