//! HTTP server exposing filtered feeds.
//!
//! `GET /rss?url=<feed>&filter=shorts&excludetext=spoiler` returns the feed
//! with the matching entries removed.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{FeedFilterOrchestrator, FilterConfig, router};

#[derive(Parser, Debug)]
#[command(name = "feedfilter-server")]
#[command(about = "Serve Atom/RSS feeds with unwanted entries removed", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "FEEDFILTER_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Maximum number of entries evaluated at once
    #[arg(long, env = "FEEDFILTER_POOL_SIZE")]
    pool_size: Option<usize>,

    /// Seconds one entry may take before the request fails
    #[arg(long, env = "FEEDFILTER_TASK_TIMEOUT_SECS", default_value_t = 20)]
    task_timeout_secs: u64,

    /// Timeout for every outbound HTTP request, in seconds
    #[arg(long, env = "FEEDFILTER_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    http_timeout_secs: u64,

    /// Base URL of the video site
    #[arg(long, env = "FEEDFILTER_VIDEO_BASE_URL", default_value = video_client::DEFAULT_BASE_URL)]
    video_base_url: String,
}

impl Args {
    fn config(&self) -> FilterConfig {
        let config = FilterConfig::new()
            .with_task_timeout(Duration::from_secs(self.task_timeout_secs))
            .with_http_timeout(Duration::from_secs(self.http_timeout_secs))
            .with_video_base_url(self.video_base_url.as_str());
        match self.pool_size {
            Some(size) => config.with_pool_size(size),
            None => config,
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();
    info!(
        "Starting feedfilter-server on {} (pool size {}, task timeout {:?})",
        args.bind, config.pool_size, config.task_timeout
    );

    let orchestrator =
        FeedFilterOrchestrator::from_config(&config).context("Failed to build orchestrator")?;

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
