//! Receptor Server - serves the actual LRP API over an in-memory store.
//!
//! Configuration is via environment variables (see `receptor::config`), with
//! command line flags taking precedence:
//! - RECEPTOR_HTTP_ADDR / --addr: HTTP bind address (default: 0.0.0.0:8887)
//! - RECEPTOR_SEED_FILE / --seed-file: JSON fixture of actual LRP groups

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use receptor::{
    MemoryBackend, ReceptorServer, config::Config,
    observability::{self, ObservabilityOptions},
};

#[derive(Parser, Debug)]
#[command(
    name = "receptor-server",
    about = "Serve the actual LRP API backed by an in-memory store"
)]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long)]
    addr: Option<SocketAddr>,
    /// JSON list of actual LRP groups to preload.
    #[arg(long)]
    seed_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    observability::init(ObservabilityOptions::default());

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(addr) = args.addr {
        config.receptor.addr = addr;
    }
    if let Some(seed_file) = args.seed_file {
        config.seed_file = Some(seed_file);
    }

    let backend = match &config.seed_file {
        Some(path) => MemoryBackend::from_seed_file(path)
            .with_context(|| format!("failed to seed backend from {}", path.display()))?,
        None => MemoryBackend::new(),
    };
    info!(groups = backend.len(), "memory backend ready");

    let server = ReceptorServer::start(config.receptor.clone(), Arc::new(backend)).await?;
    info!(addr = %server.addr(), "receptor listening");

    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutting down receptor");
    server.shutdown().await;

    Ok(())
}
