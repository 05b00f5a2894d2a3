//! Patterns Server - HTTP front end for the caching pattern directory.
//!
//! Serves `GET`/`HEAD /patterns` from a [`PatternDirectory`] backed by either
//! an in-memory or a SQLite transient store.

mod handler;
mod server;

use anyhow::{Context, Result};
use clap::Parser;
use patterns_core::{
    DirectoryConfig, MemoryTransientStore, PatternDirectory, SqliteTransientStore, TransientStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "patterns-server")]
#[command(about = "Caching proxy for the block pattern directory")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite file for the transient store (in-memory when omitted)
    #[arg(long)]
    cache_db: Option<PathBuf>,

    /// Keep the transient store in the user cache directory
    #[arg(long, conflicts_with = "cache_db")]
    persistent_cache: bool,
}

impl Args {
    fn cache_db_path(&self) -> Result<Option<PathBuf>> {
        if let Some(ref path) = self.cache_db {
            return Ok(Some(path.clone()));
        }
        if !self.persistent_cache {
            return Ok(None);
        }
        let dir = dirs::cache_dir()
            .context("No user cache directory on this platform")?
            .join("patterns-server");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Some(dir.join("transients.db")))
    }
}

fn init_logging(args: &Args) {
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    info!("Starting patterns server");

    let config = match args.config {
        Some(ref path) => DirectoryConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DirectoryConfig::default(),
    };

    let store: Arc<dyn TransientStore> = match args.cache_db_path()? {
        Some(path) => {
            info!("Using SQLite transient store at {}", path.display());
            let store = SqliteTransientStore::new(&path)?;
            let removed = store.cleanup_expired()?;
            if removed > 0 {
                info!("Removed {} expired cache entries", removed);
            }
            Arc::new(store)
        }
        None => {
            info!(
                "Using in-memory transient store ({} entries)",
                config.memory_cache_capacity
            );
            Arc::new(MemoryTransientStore::new(config.memory_cache_capacity))
        }
    };

    let directory = PatternDirectory::builder()
        .config(config)
        .store(store)
        .build()?;

    let addr = server::start_server(directory, &args.host, args.port).await?;
    info!("Patterns server running on http://{}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
