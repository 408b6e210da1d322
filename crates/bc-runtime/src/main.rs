//! # bc-runtime
//!
//! Replays a JSON-lines invocation script against a fresh in-memory ledger.
//!
//! ```text
//! bc-runtime script.jsonl
//! cat script.jsonl | bc-runtime
//! bc-runtime --metrics script.jsonl
//! ```

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bc_runtime::{instantiate, run_script, RuntimeConfig};
use bc_telemetry::{encode_metrics, init_telemetry};
use clap::Parser;
use tracing::info;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "bc-runtime")]
#[command(about = "Replay blacklist chaincode invocations against an in-memory ledger")]
#[command(version)]
struct Args {
    /// Invocation script (JSON lines). Reads stdin when omitted.
    script: Option<PathBuf>,

    /// Print Prometheus metrics to stderr after the replay.
    #[arg(long)]
    metrics: bool,

    /// Log filter, overriding BC_LOG_LEVEL / RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log records.
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = RuntimeConfig::from_env().context("loading configuration")?;
    if let Some(level) = args.log_level {
        config.telemetry.log_level = level;
    }
    if args.json_logs {
        config.telemetry.json_logs = true;
    }
    if args.metrics {
        config.telemetry.metrics_enabled = true;
    }

    let _telemetry = init_telemetry(config.telemetry.clone()).context("initializing telemetry")?;
    let mut host = instantiate(&config)?;

    let stdout = io::stdout().lock();
    let summary = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            run_script(&mut host, BufReader::new(file), stdout)?
        }
        None => run_script(&mut host, io::stdin().lock(), stdout)?,
    };

    let stats = host.stats();
    info!(
        committed = stats.committed,
        rolled_back = stats.rolled_back,
        queries = stats.queries,
        failed_steps = summary.failed,
        "replay finished"
    );

    if args.metrics {
        eprint!("{}", encode_metrics()?);
    }
    Ok(())
}
