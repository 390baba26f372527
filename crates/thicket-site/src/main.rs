//! Thicket site server binary.
//!
//! Reads `thicket.toml` (or the path given with `--config`) layered under
//! `THICKET_*` environment variables, opens the SQLite record store, and
//! serves the site over HTTP until interrupted.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use thicket_core::{paths::expand_tilde, store::RecordStore, topic::TopicTree};
use thicket_site::{AppState, ServerConfig};
use thicket_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Thicket site server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "thicket.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5000_i64)?
    .set_default("store_path", "db.sqlite")?
    .set_default("content_dir", "templates/articles")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("THICKET"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.store_path = expand_tilde(&server_cfg.store_path);
  server_cfg.content_dir = expand_tilde(&server_cfg.content_dir);

  // Open SQLite store; the schema is created if this is a fresh file.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;
  store
    .initialize()
    .await
    .context("failed to initialise store schema")?;

  // Build application state.
  let state = AppState {
    store:  Arc::new(store),
    tree:   Arc::new(TopicTree::builtin()),
    config: Arc::new(server_cfg.clone()),
  };

  let app = thicket_site::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!("failed to install Ctrl-C handler: {e}");
    std::future::pending::<()>().await;
  }
}
