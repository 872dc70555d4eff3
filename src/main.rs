//! ihg-crawler - Resumable IHG pet-friendly hotel crawler
//!
//! Drives a real browser over WebDriver and keeps its output between runs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ihg_crawler::commands::{CitiesCommand, ScrapeCommand, ShowCommand};
use ihg_crawler::config::{Config, OutputFormat, OutputPaths};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ihg-crawler",
    version,
    about = "Resumable IHG pet-friendly hotel crawler",
    long_about = "Enumerates IHG pet-friendly city collections, visits every hotel in them through a WebDriver-controlled browser, and merges the results into JSON and CSV files that survive between runs."
)]
struct Cli {
    /// WebDriver endpoint (e.g., http://localhost:9515)
    #[arg(long, global = true, env = "IHG_WEBDRIVER_URL")]
    webdriver: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Wait timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Only scrape the first city
    #[arg(long, global = true)]
    first_city_only: bool,

    /// Replace existing records instead of keeping them
    #[arg(long, global = true)]
    overwrite: bool,

    /// Directory for the city list and hotel output files
    #[arg(short, long, global = true)]
    out_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the city collections, enumerating them if not saved yet
    #[command(alias = "c")]
    Cities {
        /// Enumerate again even if a city list exists
        #[arg(long)]
        refresh: bool,
    },

    /// Scrape every city and merge hotels into the output files
    #[command(alias = "s")]
    Scrape,

    /// Print stored hotels
    Show {
        /// Only this hotel code
        #[arg(long)]
        code: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(url) = cli.webdriver {
        config.webdriver_url = url;
    }
    if cli.headed {
        config.headless = false;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if cli.first_city_only {
        config.run_one_only = true;
    }
    if cli.overwrite {
        config.overwrite = true;
    }
    if let Some(dir) = cli.out_dir {
        config.output = OutputPaths::in_dir(dir);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let output = match cli.command {
        Commands::Cities { refresh } => CitiesCommand::new(config, refresh).execute().await?,
        Commands::Scrape => ScrapeCommand::new(config).execute().await?,
        Commands::Show { code } => ShowCommand::new(config, code).execute()?,
    };

    println!("{}", output);

    Ok(())
}
