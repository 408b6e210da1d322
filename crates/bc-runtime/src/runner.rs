//! # Script Runner
//!
//! Replays a script against a [`ChaincodeHost`], one proposal per step,
//! writing one JSON [`Response`] per step.

use crate::script::{parse_line, ScriptStep};
use anyhow::{Context, Result};
use bc_chaincode::response::BAD_REQUEST;
use bc_chaincode::{Action, ChaincodeHost, Response};
use bc_telemetry::{log_invocation, record_invocation, HistogramTimer, INVOCATION_DURATION};
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Outcome counts of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Replays every line of `script`.
///
/// Malformed lines produce a 400 response and do not stop the replay.
/// I/O errors do.
pub fn run_script<R, W>(host: &mut ChaincodeHost, script: R, mut out: W) -> Result<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let text = line.with_context(|| format!("reading script line {line_no}"))?;

        let response = match parse_line(line_no, &text) {
            Ok(None) => continue,
            Ok(Some(step)) => run_step(host, &step),
            Err(err) => {
                warn!(error = %err, "skipping malformed script line");
                Response::error(BAD_REQUEST, format!("INVALID_ARGUMENT: {err}"))
            }
        };

        summary.steps += 1;
        if response.is_ok() {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }

        serde_json::to_writer(&mut out, &response).context("writing response")?;
        out.write_all(b"\n").context("writing response")?;
    }

    out.flush().context("flushing responses")?;
    info!(
        steps = summary.steps,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "script replayed"
    );
    Ok(summary)
}

/// Runs one step and records its metrics.
pub fn run_step(host: &mut ChaincodeHost, step: &ScriptStep) -> Response {
    let action = action_label(&step.args);

    let response = {
        let _timer = HistogramTimer::new(&INVOCATION_DURATION);
        match &step.proposal {
            Some(pinned) => host.invoke_with(
                &pinned.tx_id,
                pinned.timestamp,
                &step.function,
                &step.args,
            ),
            None => host.invoke(&step.function, &step.args),
        }
    };

    record_invocation(action, response.status, response.error_code());
    if response.is_ok() {
        log_invocation!(debug, action, response.status, "step complete", line = step.line);
    } else {
        log_invocation!(
            info,
            action,
            response.status,
            "step failed",
            line = step.line,
            detail = %response.message
        );
    }
    response
}

/// Metric label for an invocation: the action name, or `unknown`.
fn action_label(args: &[String]) -> &'static str {
    args.first()
        .and_then(|name| name.parse::<Action>().ok())
        .map_or("unknown", Action::name)
}
