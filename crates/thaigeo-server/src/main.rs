//! thaigeo server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and either serves the HTTP API or runs one maintenance command.
//!
//! ```
//! thaigeo                 # serve
//! thaigeo import          # run one import and print the summary
//! thaigeo stats           # print row counts
//! thaigeo clear           # delete every row
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use thaigeo_api::AppState;
use thaigeo_import::{HttpSource, Importer};
use thaigeo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Thai geography reference server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Run a single import against the configured source.
  Import,
  /// Print row counts next to the expected totals.
  Stats,
  /// Delete all subdistricts, districts and provinces.
  Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to read configuration")?;

  let store_path = expand_tilde(&cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let source = HttpSource::new(cfg.source.urls.clone()).context("failed to build HTTP client")?;
  let importer = Arc::new(Importer::new(
    Arc::new(store),
    source,
    cfg.source.layout.resolve(),
  ));

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&cfg, importer).await,
    Command::Import => {
      let summary = importer.run().await.context("import failed")?;
      print_json(&summary)
    }
    Command::Stats => {
      let stats = importer.stats().await;
      print_json(&serde_json::json!({ "stats": stats, "expected": cfg.expected }))
    }
    Command::Clear => {
      let deleted = importer.reset().await.context("clear failed")?;
      print_json(&serde_json::json!({ "deleted": deleted }))
    }
  }
}

async fn serve(
  cfg:      &ServerConfig,
  importer: Arc<Importer<SqliteStore, HttpSource>>,
) -> anyhow::Result<()> {
  let state = AppState { importer, expected: cfg.expected };
  let app = thaigeo_api::app(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
