//! Hierarchy resolution: request path → what to show.
//!
//! Resolution runs in two stages. [`TopicTree::locate`] walks the static tree
//! and needs nothing else; [`resolve`] adds the record-store lookups for the
//! leaf and article levels.
//!
//! An unknown theme is [`Resolution::NotFound`]. A mismatch at any deeper
//! level, and an article id that is ill-formed or unknown, is
//! [`Resolution::Silent`]: the caller answers with an empty body rather than
//! the not-found page.

use crate::{
  record::{Article, RecordId},
  store::RecordStore,
  topic::{SubthemeNode, ThemeNode, TopicTree},
};

/// A request path of zero to four segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicPath {
  Root,
  Theme(String),
  Subtheme(String, String),
  Subsubtheme(String, String, String),
  /// The last segment is the raw, still unparsed article id.
  Article(String, String, String, String),
}

impl TopicPath {
  /// Build a path from its segments. More than four segments has no meaning
  /// and yields `None`.
  pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Option<Self> {
    let s = |i: usize| segments[i].as_ref().to_owned();
    match segments.len() {
      0 => Some(Self::Root),
      1 => Some(Self::Theme(s(0))),
      2 => Some(Self::Subtheme(s(0), s(1))),
      3 => Some(Self::Subsubtheme(s(0), s(1), s(2))),
      4 => Some(Self::Article(s(0), s(1), s(2), s(3))),
      _ => None,
    }
  }
}

/// Outcome of the tree-only stage.
#[derive(Debug, PartialEq, Eq)]
pub enum Located<'t> {
  Root,
  Theme(&'t ThemeNode),
  Subtheme(&'t ThemeNode, &'t SubthemeNode),
  /// All three levels matched. Article paths stop here too.
  Leaf {
    theme:       &'t ThemeNode,
    subtheme:    &'t SubthemeNode,
    subsubtheme: &'t str,
  },
  NotFound,
  Silent,
}

impl TopicTree {
  /// Match each segment of `path` at its depth, in order.
  pub fn locate(&self, path: &TopicPath) -> Located<'_> {
    match path {
      TopicPath::Root => Located::Root,
      TopicPath::Theme(t) => match self.theme(t) {
        Some(node) => Located::Theme(node),
        None => Located::NotFound,
      },
      TopicPath::Subtheme(t, s) => {
        match self.theme(t).and_then(|node| node.subtheme(s).map(|sub| (node, sub))) {
          Some((node, sub)) => Located::Subtheme(node, sub),
          None => Located::Silent,
        }
      }
      TopicPath::Subsubtheme(t, s, ss) | TopicPath::Article(t, s, ss, _) => {
        self.locate_leaf(t, s, ss)
      }
    }
  }

  fn locate_leaf(&self, theme: &str, subtheme: &str, subsubtheme: &str) -> Located<'_> {
    let Some(theme) = self.theme(theme) else {
      return Located::Silent;
    };
    let Some(sub_node) = theme.subtheme(subtheme) else {
      return Located::Silent;
    };
    match sub_node.subsubtheme(subsubtheme) {
      Some(leaf) => Located::Leaf { theme, subtheme: sub_node, subsubtheme: leaf },
      None => Located::Silent,
    }
  }
}

/// What the renderer should show for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Themes(Vec<String>),
  Subthemes {
    theme:     String,
    subthemes: Vec<String>,
  },
  Subsubthemes {
    theme:        String,
    subtheme:     String,
    subsubthemes: Vec<String>,
  },
  Articles {
    theme:       String,
    subtheme:    String,
    subsubtheme: String,
    articles:    Vec<Article>,
  },
  Article {
    theme:       String,
    subtheme:    String,
    subsubtheme: String,
    article:     Article,
  },
  /// Unknown theme; render the not-found page.
  NotFound,
  /// Deeper mismatch; respond with no body.
  Silent,
}

/// Resolve `path` against `tree`, querying `store` for leaf and article
/// paths. Store failures are returned unchanged.
pub async fn resolve<S: RecordStore>(
  tree: &TopicTree,
  store: &S,
  path: &TopicPath,
) -> Result<Resolution, S::Error> {
  let (theme, subtheme, subsubtheme) = match tree.locate(path) {
    Located::Root => {
      let names = tree.theme_names().into_iter().map(str::to_owned).collect();
      return Ok(Resolution::Themes(names));
    }
    Located::Theme(node) => {
      return Ok(Resolution::Subthemes {
        theme:     node.name.clone(),
        subthemes: node.subtheme_names().into_iter().map(str::to_owned).collect(),
      });
    }
    Located::Subtheme(theme, sub) => {
      return Ok(Resolution::Subsubthemes {
        theme:        theme.name.clone(),
        subtheme:     sub.name.clone(),
        subsubthemes: sub.subsubthemes.clone(),
      });
    }
    Located::NotFound => return Ok(Resolution::NotFound),
    Located::Silent => return Ok(Resolution::Silent),
    Located::Leaf { theme, subtheme, subsubtheme } => {
      (theme.name.as_str(), subtheme.name.as_str(), subsubtheme)
    }
  };

  if let TopicPath::Article(_, _, _, raw_id) = path {
    let Ok(id) = raw_id.parse::<RecordId>() else {
      return Ok(Resolution::Silent);
    };
    return Ok(match store.get_article(id).await? {
      Some(article) => Resolution::Article {
        theme: theme.to_owned(),
        subtheme: subtheme.to_owned(),
        subsubtheme: subsubtheme.to_owned(),
        article,
      },
      None => Resolution::Silent,
    });
  }

  let articles = store.articles_at(theme, subtheme, subsubtheme).await?;
  Ok(Resolution::Articles {
    theme: theme.to_owned(),
    subtheme: subtheme.to_owned(),
    subsubtheme: subsubtheme.to_owned(),
    articles,
  })
}
