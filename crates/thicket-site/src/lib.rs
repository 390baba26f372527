//! HTTP surface of the Thicket site.
//!
//! Exposes an axum [`Router`] that resolves `/{theme}/…/{leaf}.html` paths
//! against the static [`TopicTree`] and renders pages from any
//! [`RecordStore`].

pub mod error;
pub mod render;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::{Path, State, rejection::PathRejection},
  http::{Method, StatusCode},
  response::{Html, IntoResponse, Response},
  routing::any,
};
use serde::Deserialize;
use thicket_core::{
  resolve::{Resolution, TopicPath, resolve},
  store::RecordStore,
  topic::TopicTree,
};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `thicket.toml` and the
/// `THICKET_*` environment.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  /// Directory holding the `{id}-{name}.html` article stubs.
  pub content_dir: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RecordStore> {
  pub store:  Arc<S>,
  pub tree:   Arc<TopicTree>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the site.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + Clone + 'static,
{
  Router::new()
    .route("/",        any(root_handler::<S>))
    .route("/{*path}", any(page_handler::<S>))
    .fallback(not_found_handler)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Split `Chess/Opening.html` into its segments. The final segment must
/// carry the `.html` suffix and no segment may be empty.
fn parse_page_path(path: &str) -> Option<TopicPath> {
  let stem = path.strip_suffix(".html")?;
  let segments: Vec<&str> = stem.split('/').collect();
  if segments.iter().any(|s| s.is_empty()) {
    return None;
  }
  TopicPath::from_segments(&segments)
}

fn not_found_page() -> Response {
  (StatusCode::NOT_FOUND, Html(render::not_found())).into_response()
}

fn is_read(method: &Method) -> bool { method == Method::GET || method == Method::HEAD }

// ─── Route handlers ──────────────────────────────────────────────────────────

async fn root_handler<S>(State(state): State<AppState<S>>, method: Method) -> Response
where
  S: RecordStore + Clone + 'static,
{
  if !is_read(&method) {
    return not_found_page();
  }
  show(&state, &TopicPath::Root).await.into_response_or_err()
}

async fn page_handler<S>(
  State(state): State<AppState<S>>,
  method: Method,
  path: Result<Path<String>, PathRejection>,
) -> Response
where
  S: RecordStore + Clone + 'static,
{
  if !is_read(&method) {
    return not_found_page();
  }
  // A path that does not decode to UTF-8 cannot name any page.
  let Ok(Path(path)) = path else {
    return not_found_page();
  };
  match parse_page_path(&path) {
    Some(topic_path) => show(&state, &topic_path).await.into_response_or_err(),
    None => not_found_page(),
  }
}

async fn not_found_handler() -> Response { not_found_page() }

/// Resolve `path` and render the matching page.
async fn show<S>(state: &AppState<S>, path: &TopicPath) -> Result<Response, Error>
where
  S: RecordStore + Clone + 'static,
{
  let resolution = resolve(&state.tree, state.store.as_ref(), path)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let html = match resolution {
    Resolution::Themes(themes) => render::index(&themes),
    Resolution::Subthemes { theme, subthemes } => render::theme(&theme, &subthemes),
    Resolution::Subsubthemes { theme, subtheme, subsubthemes } => {
      render::subtheme(&theme, &subtheme, &subsubthemes)
    }
    Resolution::Articles { theme, subtheme, subsubtheme, articles } => {
      render::subsubtheme(&theme, &subtheme, &subsubtheme, &articles)
    }
    Resolution::Article { theme, subtheme, subsubtheme, article } => {
      let stub_path = state.config.content_dir.join(article.content_key().file_name());
      let stub = tokio::fs::read_to_string(&stub_path).await?;
      let content = thicket_core::content::extract_content_block(&stub);
      render::article(&theme, &subtheme, &subsubtheme, &article, content)
    }
    Resolution::NotFound => {
      tracing::debug!(?path, "unknown theme");
      return Ok(not_found_page());
    }
    Resolution::Silent => {
      tracing::debug!(?path, "no match below theme level");
      return Ok(StatusCode::OK.into_response());
    }
  };

  Ok(Html(html).into_response())
}

// ─── Helper trait ────────────────────────────────────────────────────────────

trait IntoResponseOrErr {
  fn into_response_or_err(self) -> Response;
}

impl IntoResponseOrErr for Result<Response, Error> {
  fn into_response_or_err(self) -> Response {
    match self {
      Ok(r)  => r,
      Err(e) => e.into_response(),
    }
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{body::Body, http::Request};
  use thicket_core::{
    content::STUB_TEMPLATE,
    record::NewArticle,
    topic::{SubthemeNode, ThemeNode},
  };
  use thicket_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  struct Site {
    state:   AppState<SqliteStore>,
    content: tempfile::TempDir,
  }

  async fn make_site() -> Site {
    let store   = SqliteStore::open_in_memory().await.unwrap();
    store.initialize().await.unwrap();
    let content = tempfile::tempdir().unwrap();

    let state = AppState {
      store:  Arc::new(store),
      tree:   Arc::new(TopicTree::builtin()),
      config: Arc::new(ServerConfig {
        host:        "127.0.0.1".to_string(),
        port:        5000,
        store_path:  PathBuf::from(":memory:"),
        content_dir: content.path().to_path_buf(),
      }),
    };
    Site { state, content }
  }

  async fn get(state: AppState<SqliteStore>, uri: &str) -> (StatusCode, String) {
    request(state, "GET", uri).await
  }

  async fn request(state: AppState<SqliteStore>, method: &str, uri: &str) -> (StatusCode, String) {
    let req  = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
  }

  async fn add_article(site: &Site, name: &str, leaf: [&str; 3]) -> thicket_core::record::Article {
    site
      .state
      .store
      .add_article(NewArticle {
        name:        name.into(),
        theme:       leaf[0].into(),
        subtheme:    leaf[1].into(),
        subsubtheme: leaf[2].into(),
      })
      .await
      .unwrap()
  }

  // ── Upper levels ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn home_lists_every_theme() {
    let site = make_site().await;
    let (status, body) = get(site.state.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/Computer%20Science.html"), "{body}");
    assert!(body.contains("/Chess.html"), "{body}");
  }

  #[tokio::test]
  async fn index_html_is_an_ordinary_theme_path() {
    let site = make_site().await;
    let (status, body) = get(site.state.clone(), "/index.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"), "{body}");

    // A tree that has a theme called `index` serves it there.
    let mut state = site.state;
    state.tree = Arc::new(TopicTree::new(vec![ThemeNode::new("index", vec![
      SubthemeNode::new("x", &["y"]),
    ])]));
    let (status, body) = get(state, "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/index/x.html"), "{body}");
  }

  #[tokio::test]
  async fn undecodable_path_renders_not_found_with_404() {
    let site = make_site().await;
    for uri in ["/%FF.html", "/Chess/%C3%28.html"] {
      let (status, body) = get(site.state.clone(), uri).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
      assert!(body.contains("Page not found"), "{uri}: {body}");
    }
  }

  #[tokio::test]
  async fn theme_page_lists_subthemes_in_order() {
    let site = make_site().await;
    for theme in site.state.tree.themes() {
      let uri = render::href(&[theme.name.as_str()]);
      let (status, body) = get(site.state.clone(), &uri).await;
      assert_eq!(status, StatusCode::OK);

      let mut last = 0;
      for sub in &theme.subthemes {
        let needle = format!(">{}</a></li>", quick_xml::escape::escape(&sub.name));
        let pos = body.find(&needle).unwrap_or_else(|| panic!("{needle} missing: {body}"));
        assert!(pos > last, "{} out of order", sub.name);
        last = pos;
      }
    }
  }

  #[tokio::test]
  async fn unknown_theme_renders_not_found_page() {
    let site = make_site().await;
    let (status, body) = get(site.state, "/Cooking.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
  }

  #[tokio::test]
  async fn subtheme_page_lists_subsubthemes() {
    let site = make_site().await;
    let (status, body) = get(site.state, "/Chess/Books.html").await;
    assert_eq!(status, StatusCode::OK);
    let first  = body.find("Fischer: My 60 memorable games").unwrap();
    let second = body.find("Nimzowitsch: My system").unwrap();
    assert!(first < second);
  }

  #[tokio::test]
  async fn bad_subtheme_gives_empty_body() {
    let site = make_site().await;
    let (status, body) = get(site.state.clone(), "/Chess/OS.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty(), "{body}");

    let (status, body) = get(site.state, "/Cooking/OS.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty(), "{body}");
  }

  // ── Leaves and articles ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn leaf_lists_only_its_own_articles() {
    let site = make_site().await;
    let lab = add_article(&site, "Lab util", ["Computer Science", "OS", "MIT 6.828"]).await;
    add_article(&site, "Binder", ["Computer Science", "OS", "Andoriod"]).await;

    let (status, body) = get(site.state.clone(), "/Computer%20Science/OS/MIT%206.828.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Lab util"), "{body}");
    assert!(body.contains(&format!("/MIT%206.828/{}.html", lab.id)), "{body}");
    assert!(!body.contains("Binder"), "{body}");

    let (_, other) = get(site.state, "/Computer%20Science/OS/Andoriod.html").await;
    assert!(!other.contains("Lab util"), "{other}");
  }

  #[tokio::test]
  async fn leaf_outside_tree_gives_empty_body() {
    let site = make_site().await;
    let (status, body) = get(site.state, "/Chess/Opening/Najdorf.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
  }

  #[tokio::test]
  async fn article_page_embeds_stub_content() {
    let site = make_site().await;
    let a = add_article(&site, "Dragon", ["Chess", "Opening", "Sicilian"]).await;
    let stub = STUB_TEMPLATE.replace("\n\n\n", "\n<p>g6 and Bg7</p>\n");
    std::fs::write(site.content.path().join(a.content_key().file_name()), stub).unwrap();

    let (status, body) = get(site.state, &format!("/Chess/Opening/Sicilian/{}.html", a.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>g6 and Bg7</p>"), "{body}");
    assert!(!body.contains("{% block"), "{body}");
    assert!(body.contains("<title>Dragon</title>"), "{body}");
  }

  #[tokio::test]
  async fn unknown_or_malformed_article_id_gives_empty_body() {
    let site = make_site().await;
    for uri in [
      "/Chess/Opening/Sicilian/42.html",
      "/Chess/Opening/Sicilian/abc.html",
      "/Chess/Opening/Najdorf/1.html",
    ] {
      let (status, body) = get(site.state.clone(), uri).await;
      assert_eq!(status, StatusCode::OK, "{uri}");
      assert!(body.is_empty(), "{uri}: {body}");
    }
  }

  #[tokio::test]
  async fn missing_stub_is_a_server_error() {
    let site = make_site().await;
    let a = add_article(&site, "Lost", ["Chess", "Opening", "English"]).await;
    let (status, _) = get(site.state, &format!("/Chess/Opening/English/{}.html", a.id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  }

  // ── Unmatched ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unmatched_paths_render_not_found_with_404() {
    let site = make_site().await;
    for uri in [
      "/Chess",
      "/Chess/",
      "/Chess//Tactics.html",
      "/a/b/c/d/e.html",
      "/style.css",
    ] {
      let (status, body) = get(site.state.clone(), uri).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
      assert!(body.contains("Page not found"), "{uri}");
    }
  }

  #[tokio::test]
  async fn non_get_methods_are_not_found() {
    let site = make_site().await;
    let (status, _) = request(site.state, "POST", "/Chess.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[test]
  fn page_paths_parse_by_segment_count() {
    assert_eq!(parse_page_path("index.html"), Some(TopicPath::Theme("index".into())));
    assert_eq!(parse_page_path("Chess.html"), Some(TopicPath::Theme("Chess".into())));
    assert_eq!(parse_page_path("Chess"), None);
    assert_eq!(parse_page_path(".html"), None);
  }
}
