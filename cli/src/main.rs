//! NetBird dashboard: terminal front end
//!
//! ```sh
//! # Compare the running version with the published release descriptor
//! netbird-dash check-update --current 0.27.0 --release release.json
//!
//! # Show page 2 of a JSON record list, 10 records per page
//! netbird-dash browse --records peers.json --page 2 --page-size 10
//!
//! # Re-check periodically until Ctrl+C
//! netbird-dash watch --current 0.27.0 --release release.json
//!
//! # Validate config without doing anything
//! netbird-dash --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use netbird_dash::application::services::{ReleaseCache, ReleaseMonitor};
use netbird_dash::application::{FetchState, PageFetcher};
use netbird_dash::config::AppConfig;
use netbird_dash::domain::{ReleaseSource, Version};
use netbird_dash::infrastructure::{JsonFilePageSource, JsonFileReleaseSource};
use netbird_dash::interfaces::terminal::{render_state, render_update_status, LoadingIndicator};
use netbird_dash::notifications::{Event, EventBus};
use netbird_dash::shared::{listen_for_shutdown_signals, ShutdownSignal};
use netbird_dash::{default_config_path, init_tracing};

/// NetBird dashboard: paginated record browsing and update checks.
#[derive(Parser, Debug)]
#[command(
    name = "netbird-dash",
    version,
    about = "Paginated record browsing and NetBird update checks",
    long_about = "NetBird dashboard terminal front end.\n\n\
                  Default config: ~/.config/netbird-dash/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "NETBIRD_DASH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check once whether a newer release is published.
    CheckUpdate {
        /// Running version, e.g. 0.27.0
        #[arg(long)]
        current: Option<Version>,

        /// JSON release descriptor.
        #[arg(long)]
        release: Option<PathBuf>,
    },

    /// Fetch and print one page of a JSON record array.
    Browse {
        /// JSON file holding an array of records.
        #[arg(long)]
        records: PathBuf,

        /// Page number (1-based).
        #[arg(long)]
        page: Option<u32>,

        /// Records per page.
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Check for updates periodically until interrupted.
    Watch {
        /// Running version, e.g. 0.27.0
        #[arg(long)]
        current: Option<Version>,

        /// JSON release descriptor.
        #[arg(long)]
        release: Option<PathBuf>,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // ── Load configuration ──────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    // ── Config validation mode ──────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file    : {}", config_path.display());
        println!("   Log level      : {}", config.logging.level);
        println!(
            "   Page size      : {} (max {})",
            config.pagination.default_page_size, config.pagination.max_page_size
        );
        println!("   Fetch attempts : {}", config.fetch.max_attempts);
        println!(
            "   Check interval : {}s",
            config.release.check_interval_secs
        );
        return Ok(());
    }

    match cli.command {
        Some(Command::CheckUpdate { current, release }) => {
            check_update(&config, current, release).await
        }
        Some(Command::Browse {
            records,
            page,
            page_size,
        }) => browse(&config, records, page, page_size).await,
        Some(Command::Watch { current, release }) => watch(&config, current, release).await,
        None => Err("no command given, see --help".into()),
    }
}

fn release_inputs(
    config: &AppConfig,
    current: Option<Version>,
    release: Option<PathBuf>,
) -> CliResult<(Version, Arc<dyn ReleaseSource>)> {
    let current = current
        .or(config.release.current_version)
        .ok_or("running version unknown: pass --current or set release.current_version")?;
    let path = release
        .or_else(|| config.release.source_path.clone())
        .ok_or("release source unknown: pass --release or set release.source_path")?;

    Ok((current, Arc::new(JsonFileReleaseSource::new(path))))
}

async fn check_update(
    config: &AppConfig,
    current: Option<Version>,
    release: Option<PathBuf>,
) -> CliResult<()> {
    let (current, source) = release_inputs(config, current, release)?;
    let monitor = ReleaseMonitor::new(source, current, ReleaseCache::shared(), EventBus::new());

    let status = monitor.check_now().await?;
    println!("{}", render_update_status(&status));
    Ok(())
}

async fn browse(
    config: &AppConfig,
    records: PathBuf,
    page: Option<u32>,
    page_size: Option<u32>,
) -> CliResult<()> {
    let params = config.pagination.params(page, page_size);
    let source = Arc::new(JsonFilePageSource::<serde_json::Value>::new(records));
    let fetcher = PageFetcher::<serde_json::Value>::new(source).with_retry(config.fetch.clone());

    fetcher.fetch_page(params.page, params.page_size);
    eprintln!("{}", LoadingIndicator::new());

    let snapshot = fetcher.settled().await;
    println!("{}", render_state(&snapshot.state));

    match snapshot.state {
        FetchState::Failed(failure) => Err(failure.error.into()),
        _ => Ok(()),
    }
}

async fn watch(
    config: &AppConfig,
    current: Option<Version>,
    release: Option<PathBuf>,
) -> CliResult<()> {
    let (current, source) = release_inputs(config, current, release)?;
    let event_bus = EventBus::new();
    let mut events = event_bus.subscribe();

    let monitor = Arc::new(
        ReleaseMonitor::new(source, current, ReleaseCache::shared(), event_bus)
            .with_config(config.monitor_config()),
    );

    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));
    let handle = monitor.start(shutdown.clone());

    info!("Press Ctrl+C to stop watching.");

    loop {
        tokio::select! {
            message = events.recv() => match message.map(|m| m.event) {
                Some(Event::UpdateAvailable(update)) => println!(
                    "Update available: {} -> {}\nDownload: {}",
                    update.current_version, update.latest_version, update.url
                ),
                Some(Event::ReleaseCheckFailed(failure)) => {
                    eprintln!("Error: {}", failure.reason)
                }
                Some(_) => {}
                None => break,
            },
            _ = shutdown.wait() => break,
        }
    }

    handle.await?;
    Ok(())
}
