mod commands;
mod config;
mod error;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Output;
use crate::config::{Algorithm, AppConfig, OutputFormat};
use crate::error::Result;

#[derive(Parser)]
#[command(name = "shiori")]
#[command(about = "Parse and compare anime release filenames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Single-line JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse release filenames (one per line from stdin when none are given)
    Parse { filenames: Vec<String> },
    /// Run every title classifier
    Classify {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Pick the candidate closest to a value
    Match {
        value: String,
        #[arg(required = true)]
        candidates: Vec<String>,
        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,
        /// Lowest Sørensen-Dice rating accepted as a match
        #[arg(long)]
        min_rating: Option<f64>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shiori: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, source) = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging.filter);
    tracing::debug!(source = %source, "loaded config");

    let output = Output {
        format: cli.format.unwrap_or(config.output.format),
        pretty: config.output.pretty && !cli.compact,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Parse { filenames } => {
            let filenames = if filenames.is_empty() {
                commands::read_names(io::stdin().lock())?
            } else {
                filenames
            };
            commands::parse(&mut out, &filenames, output)?;
        }
        Commands::Classify { titles } => commands::classify(&mut out, &titles, output)?,
        Commands::Match {
            value,
            candidates,
            algorithm,
            min_rating,
        } => commands::match_candidates(
            &mut out,
            &value,
            &candidates,
            algorithm.unwrap_or(config.matching.algorithm),
            min_rating.unwrap_or(config.matching.min_rating),
            output,
        )?,
        Commands::Config => {
            writeln!(out, "# {source}")?;
            write!(out, "{}", config.to_toml()?)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
