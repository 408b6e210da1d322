//! # Blacklist Chaincode Runtime
//!
//! Local host for the blacklist chaincode.
//!
//! ## Modular Structure
//!
//! - `config` - Environment configuration for the chaincode and telemetry
//! - `script` - JSON-lines invocation script format
//! - `runner` - Replays a script, one proposal per step
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from env)
//! 2. Initialize telemetry
//! 3. Instantiate the chaincode on an in-memory ledger (`init`)
//! 4. Replay the script, printing one response per step

pub mod config;
pub mod runner;
pub mod script;

pub use config::{ConfigError, RuntimeConfig};
pub use runner::{run_script, run_step, RunSummary};
pub use script::{parse_line, PinnedProposal, ScriptError, ScriptStep};

use anyhow::{anyhow, Context, Result};
use bc_chaincode::ChaincodeHost;
use tracing::info;

/// Builds a host and runs `init` in its first proposal.
pub fn instantiate(config: &RuntimeConfig) -> Result<ChaincodeHost> {
    let mut host =
        ChaincodeHost::new(config.chaincode.clone()).context("invalid chaincode configuration")?;

    let response = host.instantiate();
    if !response.is_ok() {
        return Err(anyhow!("instantiation failed: {}", response.message));
    }

    info!(
        chaincode = bc_chaincode::CHAINCODE_NAME,
        version = bc_chaincode::VERSION,
        initial_credit = config.chaincode.initial_credit,
        "chaincode instantiated"
    );
    Ok(host)
}
