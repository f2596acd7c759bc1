use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use taskrank_core::{Clock, Evaluation, Strategy, SystemClock};
use taskrank_ingest::{AnalyzeRequest, AnalyzeResponse};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod report;
mod state;

use config::Config;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "taskrank", version, long_version = LONG_VERSION, about = "Rank tasks by urgency, importance, effort and blocking")]
struct Cli {
    /// Debug-level logging on stderr (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.taskrank/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Request JSON file (reads stdin when omitted or "-")
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Overrides the request's strategy and the configured default
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Reference date (YYYY-MM-DD); defaults to today in the configured timezone
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every task in a request
    Analyze {
        #[command(flatten)]
        batch: BatchArgs,

        /// Print the JSON response instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the top tasks to work on next, with reasons
    Suggest {
        #[command(flatten)]
        batch: BatchArgs,

        /// How many tasks to show (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List strategies and their weights
    Strategies,

    /// Write a default config to ~/.taskrank/config.toml
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::InitConfig => config::init_config()?,

        Command::Strategies => print_strategies(),

        Command::Analyze { batch, json } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let resp = AnalyzeResponse::from_evaluation(&run_batch(&batch, &cfg)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                print!("{}", report::render_ranking(&resp));
            }
        }

        Command::Suggest { batch, limit } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let eval = run_batch(&batch, &cfg)?;
            let limit = limit.unwrap_or(cfg.output.suggest_limit);
            print!("{}", report::render_suggestions(&eval, limit));
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("taskrank={level},taskrank_core={level},taskrank_ingest={level},warn").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("read {}", p.display()))
        }
        _ => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read request from stdin")?;
            Ok(s)
        }
    }
}

/// Read, validate and evaluate one request.
///
/// Strategy precedence: `--strategy`, then the request, then the config.
/// Weights: the request's, else the config's.
fn run_batch(args: &BatchArgs, cfg: &Config) -> Result<Evaluation> {
    let body = read_input(args.input.as_deref())?;
    let mut req = AnalyzeRequest::from_json(&body).context("decode request")?;
    if let Some(s) = args.strategy {
        req.strategy = Some(s.to_string());
    }

    let mut validated = req
        .into_validated(cfg.engine.default_strategy)
        .context("invalid request")?;
    if validated.weights.is_none() {
        validated.weights = cfg.engine.weights;
    }

    let today = match args.today {
        Some(d) => d,
        None => SystemClock::from_name(&cfg.engine.timezone)?.today(),
    };

    tracing::debug!(
        tasks = validated.tasks.len(),
        strategy = %validated.strategy,
        %today,
        "running batch"
    );

    Ok(validated.evaluate(today))
}

fn print_strategies() {
    println!("{:<16} {:>8} {:>11} {:>7} {:>13}", "strategy", "urgency", "importance", "effort", "dependencies");
    for s in Strategy::ALL {
        let w = s.weights();
        println!(
            "{:<16} {:>8.2} {:>11.2} {:>7.2} {:>13.2}  {}",
            s.as_str(),
            w.urgency,
            w.importance,
            w.effort,
            w.dependencies,
            s.description()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_version_carries_build_sha() {
        assert!(LONG_VERSION.starts_with(env!("CARGO_PKG_VERSION")));
        let sha = LONG_VERSION
            .trim_start_matches(env!("CARGO_PKG_VERSION"))
            .trim();
        assert!(sha.starts_with('(') && sha.ends_with(')'));
        assert!(sha.len() > 2);
    }

    #[test]
    fn test_suggest_accepts_strategy_and_limit() {
        let cli = Cli::try_parse_from([
            "taskrank", "suggest", "-i", "tasks.json", "-s", "high_impact", "-l", "5", "--today", "2026-02-20",
        ])
        .unwrap();
        match cli.command {
            Command::Suggest { batch, limit } => {
                assert_eq!(batch.strategy, Some(Strategy::HighImpact));
                assert_eq!(limit, Some(5));
                assert_eq!(batch.today, NaiveDate::from_ymd_opt(2026, 2, 20));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["taskrank", "analyze", "-s", "yolo"]).is_err());
    }
}
