//! Tally CLI
//!
//! Reads a summarization request as JSON, summarizes it, and prints the
//! summary to stdout. Logs go to stderr.

mod request;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::ledger::{ErrorKind, LedgerError, LedgerService};
use tally_shared::{AppConfig, AppError, LogConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Request file (`{"entries": [...], "options": {...}}`); stdin if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Fail when debits and credits do not balance
    #[arg(long)]
    enforce_balance: bool,

    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    let raw = read_request(args.input.as_deref())?;
    let parsed: Value = serde_json::from_str(&raw).context("Request is not valid JSON")?;
    let request = request::apply_defaults(parsed, &config.summary, args.enforce_balance);

    info!(
        source = %args.input.as_deref().map_or("stdin".into(), |p| p.display().to_string()),
        "Summarizing ledger"
    );
    let summary = LedgerService::summarize_json(&request)?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{output}");

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_request(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Prints the error and picks the exit status: 1 for malformed input, 2 for
/// well-formed input the ledger rules reject.
fn report(err: &anyhow::Error) -> ExitCode {
    if let Some(ledger) = err.downcast_ref::<LedgerError>() {
        eprintln!("error[{}]: {ledger}", ledger.error_code());
        return match ledger.kind() {
            ErrorKind::Type => ExitCode::from(1),
            ErrorKind::Range => ExitCode::from(2),
        };
    }
    if let Some(app) = err.downcast_ref::<AppError>() {
        eprintln!("error[{}]: {err:#}", app.error_code());
        return ExitCode::from(1);
    }
    eprintln!("error: {err:#}");
    ExitCode::from(1)
}
