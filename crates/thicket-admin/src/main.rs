//! `thicket-admin`: operator commands for the Thicket record store.
//!
//! # Usage
//!
//! ```text
//! thicket-admin init
//! thicket-admin new-theme --theme Chess
//! thicket-admin new-article --theme Chess --subtheme Opening \
//!   --subsubtheme Sicilian --article Dragon
//! thicket-admin show --theme --article
//! ```

mod commands;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::ShowKinds;
use serde::Deserialize;
use thicket_core::{paths::expand_tilde, record::NewArticle};
use thicket_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "thicket-admin", about = "Populate the Thicket record store")]
struct Args {
  /// Path to a TOML config file (store_path, content_dir).
  #[arg(short, long, value_name = "FILE", default_value = "thicket.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the record tables. Existing data is kept.
  Init,
  /// Insert a theme row.
  NewTheme {
    #[arg(long)]
    theme: String,
  },
  /// Insert a subtheme row.
  NewSubtheme {
    #[arg(long)]
    theme:    String,
    #[arg(long)]
    subtheme: String,
  },
  /// Insert a subsubtheme row.
  NewSubsubtheme {
    #[arg(long)]
    theme:       String,
    #[arg(long)]
    subtheme:    String,
    #[arg(long)]
    subsubtheme: String,
  },
  /// Insert an article row and write its content stub.
  NewArticle {
    #[arg(long)]
    theme:       String,
    #[arg(long)]
    subtheme:    String,
    #[arg(long)]
    subsubtheme: String,
    #[arg(long)]
    article:     String,
  },
  /// List rows of the selected kinds.
  Show {
    #[arg(long)]
    theme:       bool,
    #[arg(long)]
    subtheme:    bool,
    #[arg(long)]
    subsubtheme: bool,
    #[arg(long)]
    article:     bool,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// The subset of `thicket.toml` the admin tool reads.
#[derive(Deserialize, Debug)]
struct AdminConfig {
  store_path:  PathBuf,
  content_dir: PathBuf,
}

fn load_config(path: PathBuf) -> Result<AdminConfig> {
  let settings = config::Config::builder()
    .set_default("store_path", "db.sqlite")?
    .set_default("content_dir", "templates/articles")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("THICKET"))
    .build()
    .context("failed to read config file")?;
  let mut cfg: AdminConfig = settings
    .try_deserialize()
    .context("failed to deserialise AdminConfig")?;
  cfg.store_path = expand_tilde(&cfg.store_path);
  cfg.content_dir = expand_tilde(&cfg.content_dir);
  Ok(cfg)
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let cfg = load_config(args.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  // Close the store whether or not the command succeeded.
  let result = run(&store, &cfg, args.command).await;
  let closed = store.close().await;
  settle(result, closed)
}

/// The command's own error takes precedence over a failure to close.
fn settle(result: Result<()>, closed: thicket_store_sqlite::Result<()>) -> Result<()> {
  result?;
  closed.context("failed to close store")
}

async fn run(store: &SqliteStore, cfg: &AdminConfig, command: Command) -> Result<()> {
  let mut out = io::stdout().lock();
  match command {
    Command::Init => commands::init(store, &mut out).await,
    Command::NewTheme { theme } => commands::new_theme(store, theme, &mut out).await,
    Command::NewSubtheme { theme, subtheme } => {
      commands::new_subtheme(store, theme, subtheme, &mut out).await
    }
    Command::NewSubsubtheme { theme, subtheme, subsubtheme } => {
      commands::new_subsubtheme(store, theme, subtheme, subsubtheme, &mut out).await
    }
    Command::NewArticle { theme, subtheme, subsubtheme, article } => {
      let input = NewArticle { name: article, theme, subtheme, subsubtheme };
      commands::new_article(store, &cfg.content_dir, input, &mut out)
        .await
        .map(drop)
    }
    Command::Show { theme, subtheme, subsubtheme, article } => {
      let kinds = ShowKinds { theme, subtheme, subsubtheme, article };
      commands::show(store, kinds, &mut out).await
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_error_wins_over_close_error() {
    let closed = Err(thicket_store_sqlite::Error::DateParse("close".into()));
    let err = settle(Err(anyhow::anyhow!("duplicate theme")), closed).unwrap_err();
    assert_eq!(err.to_string(), "duplicate theme");
  }

  #[test]
  fn close_error_surfaces_after_success() {
    let closed = Err(thicket_store_sqlite::Error::DateParse("close".into()));
    let err = settle(Ok(()), closed).unwrap_err();
    assert_eq!(err.to_string(), "failed to close store");
  }

  #[test]
  fn show_flags_are_independent() {
    let args = Args::try_parse_from(["thicket-admin", "show", "--article", "--theme"]).unwrap();
    match args.command {
      Command::Show { theme, subtheme, subsubtheme, article } => {
        assert!(theme && article && !subtheme && !subsubtheme);
      }
      other => panic!("unexpected {other:?}"),
    }
  }
}
