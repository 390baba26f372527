//! The administrative commands.
//!
//! Each command is one insert or listing against the record store, followed
//! by a confirmation line on `out`. Nothing is retried; the first error ends
//! the command.

use std::{
  io::{self, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use thicket_core::{
  content::{ContentKey, STUB_TEMPLATE, validate_article_name},
  record::{NewArticle, NewSubsubtheme, NewSubtheme, NewTheme},
  store::RecordStore,
};
use tokio::io::AsyncWriteExt as _;

/// Which listings `show` prints. Each flag is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowKinds {
  pub theme:       bool,
  pub subtheme:    bool,
  pub subsubtheme: bool,
  pub article:     bool,
}

pub async fn init<S: RecordStore>(store: &S, out: &mut impl Write) -> Result<()> {
  store.initialize().await.context("failed to create tables")?;
  writeln!(out, "Initialized database.")?;
  Ok(())
}

pub async fn new_theme<S: RecordStore>(
  store: &S,
  theme: String,
  out: &mut impl Write,
) -> Result<()> {
  let row = store
    .add_theme(NewTheme { name: theme })
    .await
    .context("failed to insert theme")?;
  tracing::debug!(id = row.id, "theme inserted");
  writeln!(out, "Create theme {}.", row.name)?;
  Ok(())
}

pub async fn new_subtheme<S: RecordStore>(
  store: &S,
  theme: String,
  subtheme: String,
  out: &mut impl Write,
) -> Result<()> {
  let row = store
    .add_subtheme(NewSubtheme { name: subtheme, theme })
    .await
    .context("failed to insert subtheme")?;
  tracing::debug!(id = row.id, "subtheme inserted");
  writeln!(out, "Create subtheme {} under {}.", row.name, row.theme)?;
  Ok(())
}

pub async fn new_subsubtheme<S: RecordStore>(
  store: &S,
  theme: String,
  subtheme: String,
  subsubtheme: String,
  out: &mut impl Write,
) -> Result<()> {
  let row = store
    .add_subsubtheme(NewSubsubtheme { name: subsubtheme, theme, subtheme })
    .await
    .context("failed to insert subsubtheme")?;
  tracing::debug!(id = row.id, "subsubtheme inserted");
  writeln!(
    out,
    "Create subsubtheme {} under {}/{}.",
    row.name, row.theme, row.subtheme
  )?;
  Ok(())
}

/// Insert the article row, then write its stub into `content_dir`.
///
/// The stub is never overwritten. If a file with the derived name already
/// exists the command fails after the row has been inserted.
pub async fn new_article<S: RecordStore>(
  store: &S,
  content_dir: &Path,
  input: NewArticle,
  out: &mut impl Write,
) -> Result<PathBuf> {
  validate_article_name(&input.name)?;

  let article = store
    .add_article(input)
    .await
    .context("failed to insert article")?;
  let path = write_stub(content_dir, &article.content_key()).await?;
  tracing::info!(id = article.id, path = %path.display(), "stub written");

  writeln!(
    out,
    "Create article {} under {}/{}/{}.",
    article.name, article.theme, article.subtheme, article.subsubtheme
  )?;
  Ok(path)
}

async fn write_stub(content_dir: &Path, key: &ContentKey) -> Result<PathBuf> {
  tokio::fs::create_dir_all(content_dir)
    .await
    .with_context(|| format!("failed to create {}", content_dir.display()))?;

  let path = content_dir.join(key.file_name());
  let mut file = match tokio::fs::OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(&path)
    .await
  {
    Ok(f) => f,
    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
      anyhow::bail!("refusing to overwrite existing stub {}", path.display());
    }
    Err(e) => {
      return Err(e).with_context(|| format!("failed to create {}", path.display()));
    }
  };

  file.write_all(STUB_TEMPLATE.as_bytes()).await?;
  file.flush().await?;
  Ok(path)
}

pub async fn show<S: RecordStore>(
  store: &S,
  kinds: ShowKinds,
  out: &mut impl Write,
) -> Result<()> {
  if kinds.theme {
    writeln!(out, "- [All Themes]")?;
    for item in store.list_themes().await? {
      writeln!(out, "-- id={}, name={}", item.id, item.name)?;
    }
    end_listing(out)?;
  }

  if kinds.subtheme {
    writeln!(out, "- [All Subthemes]")?;
    for item in store.list_subthemes().await? {
      writeln!(out, "-- id={}, name={}, theme={}", item.id, item.name, item.theme)?;
    }
    end_listing(out)?;
  }

  if kinds.subsubtheme {
    writeln!(out, "- [All Subsubthemes]")?;
    for item in store.list_subsubthemes().await? {
      writeln!(
        out,
        "-- id={}, name={}, theme={}, subtheme={}",
        item.id, item.name, item.theme, item.subtheme
      )?;
    }
    end_listing(out)?;
  }

  if kinds.article {
    writeln!(out, "- [All Articles]")?;
    for item in store.list_articles().await? {
      writeln!(
        out,
        "-- id={}, name={}, theme={}, subtheme={}, subsubtheme={}",
        item.id, item.name, item.theme, item.subtheme, item.subsubtheme
      )?;
    }
    end_listing(out)?;
  }

  Ok(())
}

fn end_listing(out: &mut impl Write) -> io::Result<()> {
  writeln!(out, "- [End]")?;
  writeln!(out, "\n")
}
