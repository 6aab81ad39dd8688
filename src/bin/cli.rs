//! Archiver CLI
//!
//! Crawls the catalog listing and archives each entry's image.

use std::path::PathBuf;

use archiver::{
    error::Result,
    models::Config,
    pipeline::{open_store, run_collect},
};
use clap::{Parser, Subcommand};

/// archiver - Wiki Catalog Image Archiver
#[derive(Parser, Debug)]
#[command(
    name = "archiver",
    version,
    about = "Archives wiki catalog images to object storage"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the listing and upload images
    Collect {
        /// Maximum successful uploads (overrides crawler.limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Destination bucket (overrides storage.bucket)
        #[arg(long)]
        bucket: Option<String>,

        /// Seconds to pause after each row (overrides crawler.delay_secs)
        #[arg(long)]
        delay: Option<f64>,

        /// Write into this directory instead of the bucket
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Collect {
            limit,
            bucket,
            delay,
            output_dir,
        } => {
            let mut config = Config::load_or_default(&cli.config);
            if let Some(limit) = limit {
                config.crawler.limit = limit;
            }
            if let Some(bucket) = bucket {
                config.storage.bucket = bucket;
            }
            if let Some(delay) = delay {
                config.crawler.delay_secs = delay;
            }
            config.validate()?;

            let store = open_store(&config, output_dir.as_deref()).await?;
            let report = run_collect(&config, store).await?;

            if report.limit_reached {
                log::info!("Stopped at the upload limit of {}", config.crawler.limit);
            }
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            // Strict load: a broken file must not silently fall back to defaults.
            let config = Config::load(&cli.config)?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (bucket '{}')", config.storage.bucket);
        }
    }

    Ok(())
}
