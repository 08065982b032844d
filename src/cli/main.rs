//! country-sync CLI
//!
//! Usage:
//!   country-sync sync                 # fetch, or fall back to the cache
//!   country-sync list                 # cached countries
//!   country-sync show PRT             # one cached country
//!   country-sync info                 # cache metadata
//!
//! A `country-sync.toml` in the working directory is picked up when
//! `--config` is not given.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use country_sync::cli::SyncProgress;
use country_sync::cli::output::{
    CACHE_UPDATED, UPDATING_CACHE, format_country_details, format_country_line, format_sync_info, status_line,
};
use country_sync::{
    ConfigError, Country, CountryDb, NoProgress, SourceError, StoreError, SyncConfig, SyncError,
    SyncOrchestrator, SyncOutcome,
};

const DEFAULT_CONFIG_FILE: &str = "country-sync.toml";

/// Offline-capable country reference data
#[derive(Parser, Debug)]
#[command(name = "country-sync")]
#[command(about = "Fetch, normalize and cache world country data")]
struct Args {
    /// Config file (TOML)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Cache database path, overrides the config file
    #[arg(long, short = 'd', global = true)]
    database: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch from the source, or fall back to the cache when offline
    Sync {
        /// Do not draw a progress bar
        #[arg(long)]
        quiet: bool,
    },
    /// List cached countries
    List,
    /// Show one cached country by alpha-3 or alpha-2 code
    Show { code: String },
    /// Show cache metadata
    Info,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", user_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.database)?;

    match args.command {
        Command::Sync { quiet } => sync(&config, quiet).await,
        Command::List => {
            for country in load_cached(&config)? {
                println!("{}", format_country_line(&country));
            }
            Ok(())
        }
        Command::Show { code } => {
            let countries = load_cached(&config)?;
            let country = countries
                .iter()
                .find(|c| {
                    c.alpha3_code.eq_ignore_ascii_case(&code)
                        || c.alpha2_code.eq_ignore_ascii_case(&code)
                })
                .with_context(|| format!("No cached country with code '{}'", code))?;
            print!("{}", format_country_details(country));
            Ok(())
        }
        Command::Info => {
            let db = CountryDb::open(&config.database)?;
            let info = db.sync_info()?;
            print!("{}", format_sync_info(info.as_ref(), db.schema_version()?));
            println!("Database: {}", config.database.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, database: Option<PathBuf>) -> Result<SyncConfig> {
    let mut config = match path {
        Some(path) => SyncConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => SyncConfig::load(DEFAULT_CONFIG_FILE)?,
        None => SyncConfig::default(),
    };

    if let Some(database) = database {
        config = config.with_database(database);
    }
    config.validate()?;
    Ok(config)
}

async fn sync(config: &SyncConfig, quiet: bool) -> Result<()> {
    let progress = if quiet {
        SyncProgress::hidden()
    } else {
        SyncProgress::new()
    };
    let orchestrator =
        SyncOrchestrator::from_config(config)?.with_progress(Arc::new(progress.clone()));

    let outcome = orchestrator.run().await;
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            progress.finish();
            return Err(err.into());
        }
    };

    let line = status_line(&outcome);
    match outcome {
        SyncOutcome::Fresh { countries, refresh } => {
            progress.println(line);
            progress.println(&format!("{} countries", countries.len()));
            // Exit only after the cache write has finished
            if !refresh.is_finished() {
                progress.println(UPDATING_CACHE);
            }
            let saved = refresh.wait().await;
            progress.finish();
            saved?;
            println!("{}", CACHE_UPDATED);
        }
        SyncOutcome::Cached { countries } => {
            progress.finish();
            println!("{}", line);
            println!("{} countries", countries.len());
        }
        SyncOutcome::NoDataYet => {
            progress.finish();
            println!("{}", line);
            bail!("No country data available");
        }
    }

    Ok(())
}

fn load_cached(config: &SyncConfig) -> Result<Vec<Country>> {
    let db = CountryDb::open(&config.database)?;
    let countries = db.load(&NoProgress)?;
    if countries.is_empty() {
        bail!("The cache is empty. Run 'country-sync sync' with a connection first.");
    }
    Ok(countries)
}

fn user_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<SyncError>() {
        e.user_message()
    } else if let Some(e) = err.downcast_ref::<StoreError>() {
        e.user_message()
    } else if let Some(e) = err.downcast_ref::<ConfigError>() {
        e.user_message()
    } else if let Some(e) = err.downcast_ref::<SourceError>() {
        e.user_message()
    } else {
        format!("{:#}", err)
    }
}
