use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use jiff::Timestamp;
use praxis_cli::commands;
use praxis_cli::config::load_config;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::parameters::OptimizationParameters;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "praxis", version, about = "Clinical decision support engine")]
struct Cli {
    /// Engine configuration file
    #[arg(long, global = true, env = "PRAXIS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a history and search for a treatment plan
    Analyze {
        /// Patient history JSON (`-` for stdin)
        #[arg(long)]
        history: PathBuf,
        /// Optimization parameters JSON; defaults apply when omitted
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Compute the GAF compatibility score only
    Score {
        #[arg(long)]
        history: PathBuf,
        /// Evaluation instant (RFC 3339); defaults to the latest history date
        #[arg(long)]
        as_of: Option<Timestamp>,
    },
    /// List supported rating scales
    Scales,
    /// Report observations that would be clamped or excluded
    Validate {
        #[arg(long)]
        history: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { history, params } => {
            let history: PatientHistory = commands::read_json(&history)?;
            let parameters: OptimizationParameters = match params {
                Some(path) => commands::read_json(&path)?,
                None => OptimizationParameters::default(),
            };
            let result = commands::analyze(&history, &parameters, &config)?;
            print_json(&result, cli.pretty)?;
        }
        Command::Score { history, as_of } => {
            let history: PatientHistory = commands::read_json(&history)?;
            let result = commands::score(&history, as_of, &config)?;
            print_json(&result, cli.pretty)?;
        }
        Command::Scales => print_json(&commands::scales(), cli.pretty)?,
        Command::Validate { history } => {
            let history: PatientHistory = commands::read_json(&history)?;
            let issues = commands::validate(&history);
            if !issues.is_empty() {
                tracing::warn!(count = issues.len(), "observations outside their scale range");
            }
            print_json(&issues, cli.pretty)?;
        }
    }

    Ok(())
}

fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
