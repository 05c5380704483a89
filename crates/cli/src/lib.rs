pub mod commands;
pub mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "courtage",
    about = "Courtage scoring and recommendation pipeline CLI",
    long_about = "Run client scoring, product recommendations, and alert scans \
over portfolio CSV snapshots, producing JSON-lines outputs.",
    after_help = "Examples:\n  courtage score --contracts contracts.csv --individuals clients.csv --businesses businesses.csv --output scored.jsonl\n  courtage recommend --scored scored.jsonl --contracts contracts.csv --products products.csv --output recommendations.jsonl\n  courtage alerts --contracts contracts.csv --output alerts.jsonl"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Pipeline configuration (TOML). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Reference date for date-based rules, `YYYY-MM-DD`. Defaults to today.
    #[arg(long, value_parser = parse_iso_date)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Score all profiled clients from CSV snapshots into a JSON-lines file")]
    Score {
        #[arg(long)]
        contracts: PathBuf,
        #[arg(long)]
        individuals: PathBuf,
        #[arg(long)]
        businesses: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    #[command(
        about = "Generate product recommendations and alerts from a scored snapshot (or fresh scoring inputs)"
    )]
    Recommend {
        /// Scored-client snapshot produced by `score`. When omitted,
        /// `--individuals` and `--businesses` are required and scoring
        /// runs first.
        #[arg(long)]
        scored: Option<PathBuf>,
        #[arg(long)]
        contracts: PathBuf,
        #[arg(long, required_unless_present = "scored")]
        individuals: Option<PathBuf>,
        #[arg(long, required_unless_present = "scored")]
        businesses: Option<PathBuf>,
        #[arg(long)]
        products: PathBuf,
        #[arg(long)]
        claims: Option<PathBuf>,
        #[arg(long)]
        output: PathBuf,
        /// Alert JSON-lines output; alert generation is skipped when omitted.
        #[arg(long)]
        alerts_output: Option<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
    },
    #[command(about = "Run the alert scans over a contract snapshot")]
    Alerts {
        #[arg(long)]
        contracts: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    #[command(about = "Print the effective pipeline configuration as TOML")]
    Config {
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("`{raw}` is not a valid YYYY-MM-DD date"))
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Score { contracts, individuals, businesses, output, common } => {
            commands::score::run(&contracts, &individuals, &businesses, &output, &common)
        }
        Command::Recommend {
            scored,
            contracts,
            individuals,
            businesses,
            products,
            claims,
            output,
            alerts_output,
            common,
        } => commands::recommend::run(commands::recommend::RecommendArgs {
            scored,
            contracts,
            individuals,
            businesses,
            products,
            claims,
            output,
            alerts_output,
            common,
        }),
        Command::Alerts { contracts, output, common } => {
            commands::alerts::run(&contracts, &output, &common)
        }
        Command::Config { common } => commands::config::run(&common),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
