use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use reels::app::App;
use reels::config::Config;
use reels::feed::{generate_engagement, MediaFeedGenerator};
use reels::media::{EngagementCounters, MediaItem};
use reels::ui;

#[derive(Parser, Debug)]
#[command(name = "reels", about = "Vertically scrolling media feed for the terminal")]
struct Args {
    /// Seed for engagement counters
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Cards generated at startup
    #[arg(long, value_name = "N")]
    initial_batch: Option<usize>,

    /// Cards appended each time the feed runs low
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Config file (default: ~/.config/reels/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print N generated cards with their engagement as JSON and exit
    #[arg(long, value_name = "N")]
    dump: Option<usize>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Serialize)]
struct FeedDump {
    items: Vec<MediaItem>,
    engagement: EngagementCounters,
}

/// Route logs to a file when one is configured. The TUI owns the terminal,
/// so otherwise logs go to stderr only when `RUST_LOG` asks for them.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let path = args.config.clone().or_else(Config::default_path);
    let mut config = match &path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::default(),
    };

    // CLI flags win over the file
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(n) = args.initial_batch {
        config.initial_batch = n;
    }
    if let Some(n) = args.page_size {
        config.page_size = n;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    config.validate().context("Invalid settings")?;
    Ok(config)
}

fn dump_feed(count: usize, seed: Option<i64>) -> Result<()> {
    let items = MediaFeedGenerator::new().generate_batch(count);
    let ids: Vec<&str> = items.iter().map(MediaItem::id).collect();
    let engagement = generate_engagement(&ids, seed);
    let json = serde_json::to_string_pretty(&FeedDump { items, engagement })
        .context("Failed to serialize feed")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(config.log_file.as_ref())?;

    if let Some(count) = args.dump {
        return dump_feed(count, config.seed);
    }

    let mut app = App::new(&config).context("Failed to create application")?;
    ui::run(&mut app, config.frame_interval()).await?;

    tracing::info!(cards = app.feed.len(), "Exited");
    Ok(())
}
