mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jobharvest_client::HttpProvider;
use jobharvest_core::collector::Collector;
use jobharvest_core::export::JobExporter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "jobharvest", version, about = "Multi-platform job posting collector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the collection pipeline and export the dataset
    Collect {
        /// Path to the JSON configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Search provider base URL
        #[arg(
            short,
            long,
            env = "JOBHARVEST_PROVIDER_URL",
            default_value = "https://api.jobharvest.dev/v1/"
        )]
        provider_url: String,

        /// Provider request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },

    /// Write an example configuration file
    Init {
        /// Where to write the example
        #[arg(short, long, default_value = "config.example.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            config,
            provider_url,
            timeout,
        } => cmd_collect(&config, &provider_url, timeout).await?,
        Commands::Init { output } => cmd_init(&output)?,
    }

    Ok(())
}

async fn cmd_collect(config_path: &PathBuf, provider_url: &str, timeout: u64) -> Result<()> {
    let config = Config::load(config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_directive())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    log_config(&config);

    let provider = HttpProvider::with_options(
        provider_url,
        Duration::from_secs(timeout),
        &config.scraping.proxies,
    )?;
    let exporter = JobExporter::new(&config.output.directory);

    // Ctrl-C abandons the remaining searches and exports what was collected.
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received; finishing up");
            ctrl_c_token.cancel();
        }
    });

    let collector = Collector::new(provider, exporter).with_cancellation(cancel);
    let request = config.to_collect_request();

    let summary = collector
        .collect_and_export(&request)
        .await
        .context("collection run failed")?;

    println!("Collected:   {} records", summary.records_collected);
    println!("Dropped:     {} records", summary.records_dropped);
    println!("Final:       {} unique records", summary.records_after_dedup);
    for (platform, count) in &summary.records_per_platform {
        println!("  - {platform}: {count}");
    }
    match summary.files_written {
        Some(paths) => {
            println!("CSV:  {}", paths.csv_path.display());
            println!("JSON: {}", paths.json_path.display());
        }
        None => println!("No records collected; no files written"),
    }

    Ok(())
}

fn cmd_init(output: &PathBuf) -> Result<()> {
    std::fs::write(output, config::example_config())
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Example configuration created: {}", output.display());
    Ok(())
}

fn log_config(config: &Config) {
    tracing::info!(
        terms = config.search.terms.len(),
        platforms = ?config.search.platforms,
        results_per_term = config.search.results_per_term,
        days_old = config.search.days_old,
        delay_s = config.scraping.delay_between_searches,
        "Configuration loaded"
    );
    for term in &config.search.terms {
        tracing::debug!(term = %term, "Search term");
    }
    for place in &config.search.locations {
        tracing::debug!(location = %place.location, country = %place.country, "Search location");
    }
}
