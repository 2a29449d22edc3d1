//! # Ledger Chaincode Shell
//!
//! Runs invocations against an in-memory world state for local experiments.
//!
//! Reads one JSON object per line from stdin:
//!
//! ```text
//! {"function": "initMoneyAccount", "args": ["orgA", "u1", "in", "100"]}
//! ```
//!
//! and prints one JSON response per line to stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use ledger_chaincode::prelude::*;
use ledger_chaincode::{telemetry, CHAINCODE_NAME, VERSION};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One line of input.
#[derive(Debug, Deserialize)]
struct Invocation {
    function: String,
    #[serde(default)]
    args: Vec<String>,
}

/// One line of output.
#[derive(Debug, Serialize)]
struct ResponseLine<'a> {
    status: u16,
    message: &'a str,
    payload: String,
}

fn main() -> Result<()> {
    let config = ChaincodeConfig::try_from_env().context("loading configuration")?;
    telemetry::init_logging(&config.log);

    info!(
        name = CHAINCODE_NAME,
        version = VERSION,
        transfer_rule = config.transfer_rule.name(),
        "Starting chaincode shell"
    );

    let peer = MockPeer::new(&config);
    let init = peer.init();
    if !init.is_ok() {
        anyhow::bail!("chaincode init failed: {}", init.message);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Invocation>(&line) {
            Ok(call) => peer.invoke_owned(&call.function, &call.args),
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Skipping malformed invocation");
                ChaincodeResponse::error(format!("malformed invocation: {e}"))
            }
        };

        let out = ResponseLine {
            status: response.status,
            message: &response.message,
            payload: response.payload_text(),
        };
        serde_json::to_writer(&mut stdout, &out).context("writing response")?;
        writeln!(stdout).context("writing response")?;
    }

    info!(keys = peer.state().snapshot().len(), "Input exhausted");
    Ok(())
}
