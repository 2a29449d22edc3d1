//! # Mock Peer
//!
//! Stand-in for the host peer in tests and the developer binary. Each
//! invocation runs against a fresh [`BufferedWorldState`]; the write set is
//! committed only when the chaincode reports success.
//!
//! Cross-transaction conflict detection is out of scope: invocations are
//! applied one after another.

use super::buffered::BufferedWorldState;
use super::memory_state::InMemoryWorldState;
use crate::config::ChaincodeConfig;
use crate::ports::inbound::{ChaincodeApi, ChaincodeResponse};
use crate::router::InvokeRouter;
use tracing::{debug, error};

/// Single-node peer over an in-memory world state.
pub struct MockPeer<C: ChaincodeApi = InvokeRouter> {
    chaincode: C,
    state: InMemoryWorldState,
}

impl MockPeer<InvokeRouter> {
    /// Peer running the ledger chaincode with `config`.
    #[must_use]
    pub fn new(config: &ChaincodeConfig) -> Self {
        Self::with_chaincode(InvokeRouter::new(config))
    }
}

impl Default for MockPeer<InvokeRouter> {
    fn default() -> Self {
        Self::new(&ChaincodeConfig::default())
    }
}

impl<C: ChaincodeApi> MockPeer<C> {
    /// Peer running an arbitrary chaincode.
    pub fn with_chaincode(chaincode: C) -> Self {
        Self {
            chaincode,
            state: InMemoryWorldState::new(),
        }
    }

    /// Committed world state.
    #[must_use]
    pub fn state(&self) -> &InMemoryWorldState {
        &self.state
    }

    /// Run the chaincode's init hook.
    pub fn init(&self) -> ChaincodeResponse {
        let tx = BufferedWorldState::new(&self.state);
        let response = self.chaincode.init(&tx);
        self.finish(tx, response)
    }

    /// Run one transaction function.
    pub fn invoke(&self, function: &str, args: &[&str]) -> ChaincodeResponse {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        self.invoke_owned(function, &args)
    }

    /// Run one transaction function with owned arguments.
    pub fn invoke_owned(&self, function: &str, args: &[String]) -> ChaincodeResponse {
        let tx = BufferedWorldState::new(&self.state);
        let response = self.chaincode.invoke(&tx, function, args);
        self.finish(tx, response)
    }

    fn finish(&self, tx: BufferedWorldState<'_>, response: ChaincodeResponse) -> ChaincodeResponse {
        if !response.is_ok() {
            debug!(discarded = tx.pending_len(), "Write set discarded");
            return response;
        }
        match tx.commit() {
            Ok(_) => response,
            Err(e) => {
                error!(error = %e, "Commit failed");
                ChaincodeResponse::error(format!("commit failed: {e}"))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
