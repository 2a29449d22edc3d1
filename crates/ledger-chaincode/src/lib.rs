//! # Ledger Chaincode - World-State Transaction Handlers
//!
//! ## Purpose
//!
//! Transaction handlers invoked by a ledger peer to read and mutate the
//! shared, versioned world state:
//!
//! - **Account Ledger**: usable/frozen money accounts per `(org, user)`
//! - **Asset Transfer**: moves an amount between two integer balances
//! - **User Registry**: user profile documents with unique ids, merge-patch
//!   updates and rich queries
//!
//! Consensus, commit ordering, the storage engine and identity verification
//! belong to the host and are reached only through [`ports::WorldState`].
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Debit never exceeds usable money | `domain/services.rs` - `adjust_usable()` |
//! | Transfer conserves the pair's sum | `domain/services.rs` - `TransferRule::apply()` |
//! | User ids unique | `handlers/user_registry.rs` - `UserRegistry::create()` |
//! | Account keys collision-free | `domain/value_objects.rs` - `AccountKey::derive()` |
//! | Query cursor always released | `query.rs` - `CursorGuard` |
//!
//! ## Operations
//!
//! | Function | Handler |
//! |----------|---------|
//! | `initMoneyAccount`, `queryMoneyAccount` | `AccountLedger` |
//! | `move`, `queryEntity`, `deleteEntity` | `AssetTransfer` |
//! | `addUser`, `deleteUser`, `updateUser`, `queryUserByUserId`, `queryUsers` | `UserRegistry` |
//!
//! ## Usage Example
//!
//! ```
//! use ledger_chaincode::prelude::*;
//!
//! let peer = MockPeer::default();
//! peer.state().insert("alice", b"100".to_vec());
//! peer.state().insert("bob", b"50".to_vec());
//!
//! let resp = peer.invoke("move", &["x", "alice", "bob", "30"]);
//! assert!(resp.is_ok());
//! assert_eq!(resp.payload_text(), "130");
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod ports;
pub mod query;
pub mod router;
pub mod telemetry;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{LedgerEntry, MoneyAccount, UserPatch, UserRecord};
    pub use crate::domain::services::{adjust_usable, TransferRule};
    pub use crate::domain::value_objects::{AccountKey, Direction, FieldPatch, UserId};

    // Ports
    pub use crate::ports::inbound::{ChaincodeApi, ChaincodeResponse};
    pub use crate::ports::outbound::{QueryIterator, QueryRecord, WorldState};

    // Handlers and routing
    pub use crate::handlers::{AccountLedger, AssetTransfer, UserRegistry};
    pub use crate::query::{CursorGuard, JsonArrayWriter, QueryResultAssembler};
    pub use crate::router::{InvokeRouter, Operation};

    // Adapters
    pub use crate::adapters::{BufferedWorldState, InMemoryWorldState, MockPeer};

    // Configuration and errors
    pub use crate::config::{ChaincodeConfig, LogConfig};
    pub use crate::errors::{ChaincodeError, ConfigError, ErrorKind, StoreError};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Chaincode name reported at startup.
pub const CHAINCODE_NAME: &str = "ledger-chaincode";
