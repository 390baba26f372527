//! The static topic tree: theme → subtheme → ordered subsubtheme names.
//!
//! The tree drives navigation and decides which request paths are valid. It
//! is independent of the `theme`/`subtheme`/`subsubtheme` tables in the
//! record store; the two are allowed to disagree.

/// A second-level node: a subtheme and its leaf names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubthemeNode {
  pub name:         String,
  pub subsubthemes: Vec<String>,
}

impl SubthemeNode {
  pub fn new(name: &str, subsubthemes: &[&str]) -> Self {
    Self {
      name:         name.to_owned(),
      subsubthemes: subsubthemes.iter().map(|s| (*s).to_owned()).collect(),
    }
  }

  /// The leaf called `name`, if this subtheme has one.
  pub fn subsubtheme(&self, name: &str) -> Option<&str> {
    self.subsubthemes.iter().map(String::as_str).find(|s| *s == name)
  }
}

/// A top-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeNode {
  pub name:      String,
  pub subthemes: Vec<SubthemeNode>,
}

impl ThemeNode {
  pub fn new(name: &str, subthemes: Vec<SubthemeNode>) -> Self {
    Self { name: name.to_owned(), subthemes }
  }

  pub fn subtheme(&self, name: &str) -> Option<&SubthemeNode> {
    self.subthemes.iter().find(|s| s.name == name)
  }

  pub fn subtheme_names(&self) -> Vec<&str> {
    self.subthemes.iter().map(|s| s.name.as_str()).collect()
  }
}

/// The whole taxonomy. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTree {
  themes: Vec<ThemeNode>,
}

impl TopicTree {
  pub fn new(themes: Vec<ThemeNode>) -> Self { Self { themes } }

  /// The site's built-in taxonomy.
  pub fn builtin() -> Self {
    Self::new(vec![
      ThemeNode::new("Computer Science", vec![
        SubthemeNode::new("OS", &["MIT 6.828", "Andoriod"]),
        SubthemeNode::new("Network", &["Protocols"]),
        SubthemeNode::new("Hack", &["Web Penetraion", "DoS"]),
        SubthemeNode::new("Quantum Computation", &["Algorithms", "Programming"]),
      ]),
      ThemeNode::new("Chess", vec![
        SubthemeNode::new("Opening", &["Sicilian", "Scotland", "English"]),
        SubthemeNode::new("Tactics", &["Decoy&Deflection", "Stalemate"]),
        SubthemeNode::new("Endgame", &["Pawn and King"]),
        SubthemeNode::new("Positional", &["Exchange", "Sacrifice"]),
        SubthemeNode::new("Books", &[
          "Fischer: My 60 memorable games",
          "Nimzowitsch: My system",
        ]),
      ]),
    ])
  }

  pub fn themes(&self) -> &[ThemeNode] { &self.themes }

  pub fn theme_names(&self) -> Vec<&str> {
    self.themes.iter().map(|t| t.name.as_str()).collect()
  }

  pub fn theme(&self, name: &str) -> Option<&ThemeNode> {
    self.themes.iter().find(|t| t.name == name)
  }
}

impl Default for TopicTree {
  fn default() -> Self { Self::builtin() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_themes_keep_configured_order() {
    let tree = TopicTree::builtin();
    assert_eq!(tree.theme_names(), vec!["Computer Science", "Chess"]);
  }

  #[test]
  fn builtin_subthemes_keep_configured_order() {
    let tree = TopicTree::builtin();
    let chess = tree.theme("Chess").unwrap();
    assert_eq!(chess.subtheme_names(), vec![
      "Opening",
      "Tactics",
      "Endgame",
      "Positional",
      "Books"
    ]);
    let os = tree.theme("Computer Science").unwrap().subtheme("OS").unwrap();
    assert_eq!(os.subsubthemes, vec!["MIT 6.828", "Andoriod"]);
  }

  #[test]
  fn lookups_are_exact() {
    let tree = TopicTree::builtin();
    assert!(tree.theme("chess").is_none());
    assert!(tree.theme(" Chess").is_none());
    let tactics = tree.theme("Chess").unwrap().subtheme("Tactics").unwrap();
    assert_eq!(tactics.subsubtheme("Decoy&Deflection"), Some("Decoy&Deflection"));
    assert!(tactics.subsubtheme("decoy&deflection").is_none());
  }
}
