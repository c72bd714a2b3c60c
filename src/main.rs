//! Command line entry point for the multiplayer Elo tracker
//!
//! Reads a JSON array of dated matchups, replays them through the competitor
//! registry and prints the resulting standings and rating history.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use multielo_tracker::config::{validate_config, AppConfig};
use multielo_tracker::metrics::MetricsCollector;
use multielo_tracker::{CompetitorRegistry, HistoryRow, Matchup, StandingRow};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// MultiElo Tracker - Elo ratings for multiplayer matchups
#[derive(Parser)]
#[command(
    name = "multielo-tracker",
    version,
    about = "Track Elo ratings across matchups with any number of competitors"
)]
struct Args {
    /// Matchups to process
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to a JSON array of matchups"
    )]
    matchups: Option<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Which tables to print
    #[arg(long, value_enum, default_value_t = OutputKind::Standings)]
    output: OutputKind,

    /// Print JSON instead of text tables
    #[arg(long)]
    json: bool,

    /// Also print every competitor's rating as of this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,

    /// Print Prometheus metrics after processing
    #[arg(long)]
    metrics: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without processing")]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Standings,
    History,
    All,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    standings: Option<&'a [StandingRow]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<&'a [HistoryRow]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    as_of: Option<&'a [AsOfRow]>,
}

#[derive(Serialize)]
struct AsOfRow {
    identity: String,
    date: NaiveDate,
    rating: f64,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_matchups(path: &Path) -> Result<Vec<Matchup>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read matchups from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse matchups in {}", path.display()))
}

fn print_standings(rows: &[StandingRow]) {
    println!("{:>4}  {:<20} {:>6} {:>10}", "rank", "competitor", "games", "rating");
    for row in rows {
        println!(
            "{:>4}  {:<20} {:>6} {:>10.2}",
            row.rank, row.identity, row.games_played, row.rating
        );
    }
}

fn print_history(rows: &[HistoryRow]) {
    println!("{:<20} {:<10} {:>10}", "competitor", "date", "rating");
    for row in rows {
        println!("{:<20} {:<10} {:>10.2}", row.identity, row.date, row.rating);
    }
}

fn print_as_of(rows: &[AsOfRow]) {
    for row in rows {
        println!("{} on {}: {:.2}", row.identity, row.date, row.rating);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} (k = {}, initial rating = {})",
        config.service.name,
        multielo_tracker::VERSION,
        config.rating.elo.k_factor,
        config.rating.initial_rating
    );

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    let Some(matchups_path) = &args.matchups else {
        anyhow::bail!("No matchups given; pass --matchups FILE");
    };
    let matchups = read_matchups(matchups_path)?;

    let metrics = Arc::new(MetricsCollector::new()?);
    let mut registry =
        CompetitorRegistry::from_config(&config.rating)?.with_metrics(metrics.clone());
    registry.process_matchups(&matchups)?;

    let standings = matches!(args.output, OutputKind::Standings | OutputKind::All)
        .then(|| registry.current_standings());
    let history =
        matches!(args.output, OutputKind::History | OutputKind::All).then(|| registry.full_history());
    let as_of = match args.as_of {
        Some(date) => Some(
            registry
                .competitors()
                .map(|competitor| {
                    Ok(AsOfRow {
                        identity: competitor.id().to_string(),
                        date,
                        rating: registry.rating_as_of(competitor.id(), date)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        None => None,
    };

    if args.json {
        let report = Report {
            standings: standings.as_deref(),
            history: history.as_deref(),
            as_of: as_of.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if let Some(rows) = &standings {
            print_standings(rows);
        }
        if let Some(rows) = &history {
            if standings.is_some() {
                println!();
            }
            print_history(rows);
        }
        if let Some(rows) = &as_of {
            println!();
            print_as_of(rows);
        }
    }

    if args.metrics {
        print!("{}", metrics.gather_text()?);
    }

    Ok(())
}
