//! HTML page rendering.
//!
//! Pages are written event by event with quick-xml's [`Writer`], which
//! escapes text and attribute values. Every page shares one layout with a
//! breadcrumb back to the site root. The body of an article stub is authored
//! HTML and is written through unescaped.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};
use thicket_core::record::Article;

// ─── Links ───────────────────────────────────────────────────────────────────

/// Percent-encode one path segment. Only RFC 3986 unreserved bytes pass.
pub fn encode_segment(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for b in s.bytes() {
    if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
      out.push(b as char);
    } else {
      out.push_str(&format!("%{b:02X}"));
    }
  }
  out
}

/// `/{a}/{b}.html` for the given segments.
pub fn href(segments: &[&str]) -> String {
  let encoded: Vec<String> = segments.iter().map(|s| encode_segment(s)).collect();
  format!("/{}.html", encoded.join("/"))
}

// ─── Page builder ────────────────────────────────────────────────────────────

struct Page {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Page {
  /// Open the document up to and including the `<h1>`.
  fn new(title: &str, ancestors: &[&str]) -> Self {
    let mut page = Self { writer: Writer::new(Cursor::new(Vec::new())) };
    page
      .writer
      .write_event(Event::DocType(BytesText::from_escaped("html")))
      .unwrap();
    page.start("html");
    page.start("head");
    page.empty_with_attr("meta", &[("charset", "utf-8")]);
    page.text_elem("title", title);
    page.end("head");
    page.start("body");
    page.breadcrumb(ancestors);
    page.text_elem("h1", title);
    page
  }

  fn finish(mut self) -> String {
    self.end("body");
    self.end("html");
    let bytes = self.writer.into_inner().into_inner();
    String::from_utf8_lossy(&bytes).into_owned()
  }

  fn start(&mut self, tag: &str) {
    self.writer.write_event(Event::Start(BytesStart::new(tag))).unwrap();
  }

  fn end(&mut self, tag: &str) {
    self.writer.write_event(Event::End(BytesEnd::new(tag))).unwrap();
  }

  fn text(&mut self, text: &str) {
    self.writer.write_event(Event::Text(BytesText::new(text))).unwrap();
  }

  /// Write pre-built markup as-is.
  fn raw(&mut self, html: &str) {
    self
      .writer
      .write_event(Event::Text(BytesText::from_escaped(html)))
      .unwrap();
  }

  fn text_elem(&mut self, tag: &str, text: &str) {
    self.start(tag);
    self.text(text);
    self.end(tag);
  }

  fn empty_with_attr(&mut self, tag: &str, attrs: &[(&str, &str)]) {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, *v));
    }
    self.writer.write_event(Event::Empty(el)).unwrap();
  }

  fn link(&mut self, href: &str, text: &str) {
    let mut el = BytesStart::new("a");
    el.push_attribute(("href", href));
    self.writer.write_event(Event::Start(el)).unwrap();
    self.text(text);
    self.end("a");
  }

  /// Breadcrumb over the ancestors of the current page (root excluded).
  fn breadcrumb(&mut self, ancestors: &[&str]) {
    self.start("nav");
    self.link("/", "Home");
    for depth in 1..=ancestors.len() {
      self.text(" / ");
      self.link(&href(&ancestors[..depth]), ancestors[depth - 1]);
    }
    self.end("nav");
  }

  /// `<ul>` of links, one per child name under `parent`.
  fn link_list(&mut self, parent: &[&str], names: &[String]) {
    self.start("ul");
    for name in names {
      let mut segments = parent.to_vec();
      segments.push(name);
      self.start("li");
      self.link(&href(&segments), name);
      self.end("li");
    }
    self.end("ul");
  }
}

// ─── Pages ───────────────────────────────────────────────────────────────────

pub fn index(themes: &[String]) -> String {
  let mut page = Page::new("Themes", &[]);
  page.link_list(&[], themes);
  page.finish()
}

pub fn theme(theme: &str, subthemes: &[String]) -> String {
  let mut page = Page::new(theme, &[]);
  page.link_list(&[theme], subthemes);
  page.finish()
}

pub fn subtheme(theme: &str, subtheme: &str, subsubthemes: &[String]) -> String {
  let mut page = Page::new(subtheme, &[theme]);
  page.link_list(&[theme, subtheme], subsubthemes);
  page.finish()
}

pub fn subsubtheme(
  theme: &str,
  subtheme: &str,
  subsubtheme: &str,
  articles: &[Article],
) -> String {
  let mut page = Page::new(subsubtheme, &[theme, subtheme]);
  page.start("ul");
  for article in articles {
    let id = article.id.to_string();
    page.start("li");
    page.link(&href(&[theme, subtheme, subsubtheme, id.as_str()]), &article.name);
    page.text(" ");
    page.text_elem("time", &article.created_at.format("%Y-%m-%d").to_string());
    page.end("li");
  }
  page.end("ul");
  page.finish()
}

/// Article page around the `content` block of its stub.
pub fn article(
  theme: &str,
  subtheme: &str,
  subsubtheme: &str,
  article: &Article,
  content: &str,
) -> String {
  let mut page = Page::new(&article.name, &[theme, subtheme, subsubtheme]);
  page.start("p");
  page.text_elem("time", &article.created_at.format("%Y-%m-%d %H:%M").to_string());
  page.end("p");
  page.start("article");
  page.raw(content);
  page.end("article");
  page.finish()
}

pub fn not_found() -> String {
  let mut page = Page::new("Page not found", &[]);
  page.text_elem("p", "The page you asked for does not exist.");
  page.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn segments_are_percent_encoded() {
    assert_eq!(href(&["Computer Science", "OS"]), "/Computer%20Science/OS.html");
    assert_eq!(encode_segment("Decoy&Deflection"), "Decoy%26Deflection");
    assert_eq!(encode_segment("MIT 6.828"), "MIT%206.828");
  }

  #[test]
  fn names_are_escaped() {
    let html = theme("Chess", &["<script>".to_string()]);
    assert!(html.contains("&lt;script&gt;"), "{html}");
    assert!(!html.contains("<script>"), "{html}");
  }

  #[test]
  fn ampersand_names_are_escaped_in_text() {
    let html = subtheme("Chess", "Tactics", &["Decoy&Deflection".to_string()]);
    assert!(html.contains(">Decoy&amp;Deflection</a>"), "{html}");
    assert!(html.contains("/Chess/Tactics/Decoy%26Deflection.html"), "{html}");
  }

  #[test]
  fn breadcrumb_links_every_ancestor() {
    let html = subtheme("Chess", "Tactics", &["Stalemate".to_string()]);
    assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
    assert!(html.contains("<a href=\"/\">Home</a>"), "{html}");
    assert!(html.contains("<a href=\"/Chess.html\">Chess</a>"), "{html}");
    assert!(html.contains("/Chess/Tactics/Stalemate.html"), "{html}");
  }

  #[test]
  fn article_content_is_written_unescaped() {
    let a = Article {
      id:          3,
      name:        "Dragon".into(),
      theme:       "Chess".into(),
      subtheme:    "Opening".into(),
      subsubtheme: "Sicilian".into(),
      created_at:  chrono::Utc::now(),
    };
    let html = article("Chess", "Opening", "Sicilian", &a, "<p>g6</p>");
    assert!(html.contains("<article><p>g6</p></article>"), "{html}");
  }
}
