//! kcouper main entry point
//!
//! This is the command-line interface for the coupon harvester.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kcouper::api::{bootstrap, ApiClient};
use kcouper::clock;
use kcouper::config::{load_config_with_hash, Config, LoggingConfig};
use kcouper::harvest::{Checker, Harvester};
use kcouper::menu::{query_single_items, write_single_items};
use kcouper::output::{load_existing_catalog, write_catalog};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Exit code of `check` when a voucher exists in a watched range
const EXIT_VOUCHER_FOUND: u8 = 2;

/// kcouper: coupon harvester for the ordering API
///
/// Probes voucher codes, validates them against the ordering API and writes
/// a price-sorted catalog for the coupon browser.
#[derive(Parser, Debug)]
#[command(name = "kcouper")]
#[command(version = "1.0.0")]
#[command(about = "Coupon harvester for the ordering API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (environment variables override it)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the coupon ranges and write coupon.json / coupon.js
    Harvest {
        /// Start from the existing catalog: keep live coupons, drop expired ones
        #[arg(long)]
        incremental: bool,
    },

    /// Probe the check ranges and exit with status 2 if any voucher exists
    Check,

    /// Query the single-item menu and write single.json / single.js
    Menu,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(cli.config.as_deref())
        .context("Failed to load configuration")?;

    setup_logging(cli.verbose, cli.quiet, &config.logging)?;
    match config_hash {
        Some(hash) => tracing::info!("Configuration loaded (hash: {})", hash),
        None => tracing::info!("Configuration loaded from environment"),
    }

    let client = ApiClient::new(&config.api, config.retry.clone())?;
    let today = clock::today();
    tracing::info!(
        "Using shop {} at {} for {}",
        config.shop.code,
        client.base_url(),
        today
    );
    bootstrap(&client, &config.shop.code, today).await?;

    match cli.command {
        Command::Harvest { incremental } => {
            handle_harvest(&config, &client, today, incremental).await?;
        }
        Command::Check => {
            if !handle_check(&config, &client, today).await? {
                eprintln!("new coupon exist, check log for details");
                return Ok(ExitCode::from(EXIT_VOUCHER_FOUND));
            }
        }
        Command::Menu => handle_menu(&config, &client).await?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds the stdout and file log layers from verbosity flags
fn setup_logging(verbose: u8, quiet: bool, config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kcouper=info,warn"),
            1 => EnvFilter::new("kcouper=debug,info"),
            2 => EnvFilter::new("kcouper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = match &config.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Runs a full or incremental harvest and writes the catalog
async fn handle_harvest(
    config: &Config,
    client: &ApiClient,
    today: NaiveDate,
    incremental: bool,
) -> anyhow::Result<()> {
    let existing = if incremental {
        let existing = load_existing_catalog(&config.output.directory)?;
        if existing.is_none() {
            tracing::warn!(
                "No existing catalog in {}, harvesting from scratch",
                config.output.directory.display()
            );
        }
        existing
    } else {
        None
    };

    if config.harvest.ranges.is_empty() {
        tracing::warn!("No coupon ranges configured (set [harvest] ranges or COUPON_RANGES)");
    }

    let harvester = Harvester::new(
        client,
        &config.shop.code,
        today,
        config.pacing.clone(),
        &config.harvest.exclude_names,
    );
    let catalog = match harvester.run(&config.harvest.ranges, existing).await {
        Ok(catalog) => catalog,
        Err(e) => {
            let (partial, source) = e.into_partial_catalog();
            if let Some(partial) = partial {
                write_catalog(&partial, &config.output.directory)?;
                tracing::warn!("Partial catalog written: {} coupons", partial.count());
            }
            return Err(source.into());
        }
    };
    write_catalog(&catalog, &config.output.directory)?;

    tracing::info!(
        "Catalog written: {} coupons, last update {}",
        catalog.count(),
        catalog.last_update()
    );
    Ok(())
}

/// Returns false when a watched range contains a voucher
async fn handle_check(
    config: &Config,
    client: &ApiClient,
    today: NaiveDate,
) -> anyhow::Result<bool> {
    if config.harvest.check_ranges.is_empty() {
        tracing::warn!("No check ranges configured (set [harvest] check-ranges or CHECK_RANGES)");
    }

    let checker = Checker::new(client, &config.shop.code, today, config.pacing.clone());
    let report = checker.run(&config.harvest.check_ranges).await?;
    Ok(!report.has_detections())
}

async fn handle_menu(config: &Config, client: &ApiClient) -> anyhow::Result<()> {
    let items = query_single_items(client).await?;
    write_single_items(&items, &config.output.directory)?;
    tracing::info!("Single-item menu written: {} items", items.len());
    Ok(())
}
