use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use feed_doc::FeedDocument;
use feed_source::{FeedSource, FileFeedSource, HttpFeedSource};
use pipeline::{entry_title, FilterRequest, VideoIdentity, ID_ELEMENT};
use server::{FeedFilterOrchestrator, FilterConfig, FilteredFeed};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// feedfilter - remove unwanted entries from Atom/RSS feeds
#[derive(Parser)]
#[command(name = "feedfilter")]
#[command(about = "Filter shorts, region-locked videos and keywords out of feeds", long_about = None)]
struct Cli {
    /// Maximum number of entries evaluated at once
    #[arg(long, global = true)]
    pool_size: Option<usize>,

    /// Seconds one entry may take before filtering fails
    #[arg(long, global = true, default_value = "20")]
    task_timeout_secs: u64,

    /// Base URL of the video site
    #[arg(long, global = true, default_value = video_client::DEFAULT_BASE_URL)]
    video_base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Location {
    /// Feed URL, or a local path with --file
    location: String,

    /// Read the feed from the local filesystem instead of over HTTP
    #[arg(long)]
    file: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a feed and print the result
    Filter {
        #[command(flatten)]
        location: Location,

        /// Named filter to apply (shorts, country); may be repeated
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Remove entries containing this text; may be repeated
        #[arg(long = "exclude-text")]
        exclude_text: Vec<String>,

        /// Keep only entries containing this text; may be repeated
        #[arg(long = "include-text")]
        include_text: Vec<String>,

        /// Write the filtered feed here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the entries of a feed with their video ids
    Entries {
        #[command(flatten)]
        location: Location,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays a clean feed
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Commands::Filter {
            location,
            filters,
            exclude_text,
            include_text,
            output,
        } => {
            let request = FilterRequest {
                filters,
                exclude_terms: exclude_text,
                include_terms: include_text,
            };
            handle_filter(&config, &location, &request, output).await?
        }
        Commands::Entries { location } => handle_entries(&config, &location).await?,
    }

    Ok(())
}

impl Cli {
    fn config(&self) -> FilterConfig {
        let config = FilterConfig::new()
            .with_task_timeout(Duration::from_secs(self.task_timeout_secs))
            .with_video_base_url(self.video_base_url.as_str());
        match self.pool_size {
            Some(size) => config.with_pool_size(size),
            None => config,
        }
    }
}

fn feed_source(config: &FilterConfig, location: &Location) -> Result<Arc<dyn FeedSource>> {
    if location.file {
        Ok(Arc::new(FileFeedSource))
    } else {
        let source = HttpFeedSource::new(config.http_timeout, &config.user_agent)
            .context("Failed to build feed client")?;
        Ok(Arc::new(source))
    }
}

/// Handle the 'filter' command
async fn handle_filter(
    config: &FilterConfig,
    location: &Location,
    request: &FilterRequest,
    output: Option<PathBuf>,
) -> Result<()> {
    let start = Instant::now();
    let orchestrator = FeedFilterOrchestrator::from_config(config)?
        .with_source(feed_source(config, location)?);

    let filtered = orchestrator
        .filter_feed(&location.location, request)
        .await
        .with_context(|| format!("Failed to filter {}", location.location))?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &filtered.xml)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote filtered feed to {}", path.display());
        }
        None => println!("{}", filtered.xml),
    }

    print_summary(&filtered, start.elapsed());
    Ok(())
}

/// Handle the 'entries' command
async fn handle_entries(config: &FilterConfig, location: &Location) -> Result<()> {
    let source = feed_source(config, location)?;
    let fetched = source
        .fetch(&location.location)
        .await
        .with_context(|| format!("Failed to fetch {}", location.location))?;
    let doc = FeedDocument::parse(&fetched.body)
        .with_context(|| format!("Failed to parse {}", location.location))?;

    let entries = doc.root().entries();
    println!(
        "{}",
        format!("{} entries in {}", entries.len(), location.location)
            .bold()
            .blue()
    );
    for (i, entry) in entries.iter().enumerate() {
        let id = entry
            .child(ID_ELEMENT)
            .and_then(|id| id.text())
            .unwrap_or_default();
        let video = match VideoIdentity::from_entry(entry) {
            Ok(identity) => identity.video_id().green(),
            Err(err) => err.to_string().red(),
        };
        println!(
            "{}. {} [{}] {}",
            (i + 1).to_string().green(),
            entry_title(entry),
            id,
            video
        );
    }
    Ok(())
}

/// Coloured summary on stderr so it never mixes with the feed on stdout
fn print_summary(filtered: &FilteredFeed, elapsed: Duration) {
    eprintln!(
        "{} Filtered in {:.2?}: {} removed, {} kept",
        "✓".green(),
        elapsed,
        filtered.removed.len(),
        filtered.remaining.len()
    );
    for title in &filtered.removed {
        eprintln!("  {} {}", "-".red(), title);
    }
    for title in &filtered.remaining {
        eprintln!("  {} {}", "+".green(), title);
    }
}
