//! # Invoke Router
//!
//! Maps an incoming function name to one handler through a fixed lookup
//! table. Unknown names fail with an argument error; each handler checks its
//! own arguments after dispatch. The router keeps no state between
//! invocations and never retries.

use crate::config::ChaincodeConfig;
use crate::errors::ChaincodeError;
use crate::handlers::{AccountLedger, AssetTransfer, UserRegistry};
use crate::ports::inbound::{ChaincodeApi, ChaincodeResponse};
use crate::ports::outbound::WorldState;
use crate::query::QueryResultAssembler;
use std::fmt;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// OPERATIONS
// =============================================================================

/// Every transaction function the chaincode exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Instantiate hook, no state access.
    Init,
    /// Credit or debit a money account.
    InitMoneyAccount,
    /// Read a money account.
    QueryMoneyAccount,
    /// Two-party ledger transfer.
    Move,
    /// Read a ledger entry.
    QueryEntity,
    /// Remove a ledger entry.
    DeleteEntity,
    /// Create a user record.
    AddUser,
    /// Delete a user record.
    DeleteUser,
    /// Merge-patch a user record.
    UpdateUser,
    /// Rich query for one user id.
    QueryUserByUserId,
    /// Caller-supplied rich query.
    QueryUsers,
}

/// Function name → operation. Canonical names first, then legacy aliases.
const OPERATION_TABLE: &[(&str, Operation)] = &[
    ("init", Operation::Init),
    ("initMoneyAccount", Operation::InitMoneyAccount),
    ("queryMoneyAccount", Operation::QueryMoneyAccount),
    ("move", Operation::Move),
    ("queryEntity", Operation::QueryEntity),
    ("deleteEntity", Operation::DeleteEntity),
    ("addUser", Operation::AddUser),
    ("deleteUser", Operation::DeleteUser),
    ("updateUser", Operation::UpdateUser),
    ("queryUserByUserId", Operation::QueryUserByUserId),
    ("queryUsers", Operation::QueryUsers),
    // legacy names
    ("AddUser", Operation::AddUser),
    ("delete", Operation::DeleteUser),
    ("transferUserByUserId", Operation::UpdateUser),
];

impl Operation {
    /// All operations, in table order.
    pub const ALL: [Operation; 11] = [
        Operation::Init,
        Operation::InitMoneyAccount,
        Operation::QueryMoneyAccount,
        Operation::Move,
        Operation::QueryEntity,
        Operation::DeleteEntity,
        Operation::AddUser,
        Operation::DeleteUser,
        Operation::UpdateUser,
        Operation::QueryUserByUserId,
        Operation::QueryUsers,
    ];

    /// Resolve a function name (canonical or legacy).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATION_TABLE
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, op)| *op)
    }

    /// Canonical function name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::InitMoneyAccount => "initMoneyAccount",
            Self::QueryMoneyAccount => "queryMoneyAccount",
            Self::Move => "move",
            Self::QueryEntity => "queryEntity",
            Self::DeleteEntity => "deleteEntity",
            Self::AddUser => "addUser",
            Self::DeleteUser => "deleteUser",
            Self::UpdateUser => "updateUser",
            Self::QueryUserByUserId => "queryUserByUserId",
            Self::QueryUsers => "queryUsers",
        }
    }

    /// Returns true if the operation never writes.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::Init
                | Self::QueryMoneyAccount
                | Self::QueryEntity
                | Self::QueryUserByUserId
                | Self::QueryUsers
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Dispatches invocations to the three contracts.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvokeRouter {
    ledger: AccountLedger,
    transfer: AssetTransfer,
    registry: UserRegistry,
}

impl InvokeRouter {
    /// Build the router from configuration.
    #[must_use]
    pub fn new(config: &ChaincodeConfig) -> Self {
        Self {
            ledger: AccountLedger,
            transfer: AssetTransfer::new(config.transfer_rule),
            registry: UserRegistry::new(QueryResultAssembler::new(config.max_query_results)),
        }
    }

    /// Resolve `function` and run it.
    pub fn dispatch(
        &self,
        state: &dyn WorldState,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        let op = Operation::from_name(function).ok_or_else(|| {
            ChaincodeError::argument(format!("unknown function invocation: '{function}'"))
        })?;
        debug!(operation = %op, "Dispatching");
        self.execute(op, state, args)
    }

    /// Run a resolved operation.
    pub fn execute(
        &self,
        op: Operation,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        match op {
            Operation::Init => Ok(Vec::new()),
            Operation::InitMoneyAccount => self.ledger.init_money_account(state, args),
            Operation::QueryMoneyAccount => self.ledger.query_money_account(state, args),
            Operation::Move => self.transfer.transfer(state, args),
            Operation::QueryEntity => self.transfer.query_entity(state, args),
            Operation::DeleteEntity => self.transfer.delete_entity(state, args),
            Operation::AddUser => self.registry.create(state, args),
            Operation::DeleteUser => self.registry.delete(state, args),
            Operation::UpdateUser => self.registry.update(state, args),
            Operation::QueryUserByUserId => self.registry.query_by_user_id(state, args),
            Operation::QueryUsers => self.registry.query_ad_hoc(state, args),
        }
    }
}

impl ChaincodeApi for InvokeRouter {
    fn init(&self, state: &dyn WorldState) -> ChaincodeResponse {
        info!("Chaincode init");
        to_response(self.execute(Operation::Init, state, &[]))
    }

    #[instrument(
        name = "invoke",
        skip(self, state, args),
        fields(invocation_id = %Uuid::new_v4(), argc = args.len())
    )]
    fn invoke(&self, state: &dyn WorldState, function: &str, args: &[String]) -> ChaincodeResponse {
        to_response(self.dispatch(state, function, args))
    }
}

fn to_response(result: Result<Vec<u8>, ChaincodeError>) -> ChaincodeResponse {
    match result {
        Ok(payload) => {
            debug!(payload_len = payload.len(), "Invocation succeeded");
            ChaincodeResponse::success(payload)
        }
        Err(e) => {
            warn!(error = %e, kind = ?e.kind(), "Invocation failed");
            ChaincodeResponse::error(e.to_string())
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorldState;
    use crate::errors::ErrorKind;
    use std::collections::HashSet;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_every_operation_resolves_by_name() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn test_table_covers_all_operations() {
        let in_table: HashSet<_> = OPERATION_TABLE.iter().map(|(_, op)| *op).collect();
        assert_eq!(in_table.len(), Operation::ALL.len());
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(Operation::from_name("AddUser"), Some(Operation::AddUser));
        assert_eq!(Operation::from_name("delete"), Some(Operation::DeleteUser));
        assert_eq!(
            Operation::from_name("transferUserByUserId"),
            Some(Operation::UpdateUser)
        );
        assert_eq!(Operation::from_name("Move"), None);
    }

    #[test]
    fn test_unknown_function() {
        let state = InMemoryWorldState::new();
        let err = InvokeRouter::default()
            .dispatch(&state, "mint", &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);

        let resp = InvokeRouter::default().invoke(&state, "mint", &[]);
        assert!(!resp.is_ok());
        assert!(resp.message.contains("mint"));
    }

    #[test]
    fn test_arity_checked_after_dispatch() {
        let state = InMemoryWorldState::new();
        let resp = InvokeRouter::default().invoke(&state, "move", &args(&["a"]));
        assert!(!resp.is_ok());
        assert!(resp.message.contains("move"));
    }

    #[test]
    fn test_init_touches_nothing() {
        let state = InMemoryWorldState::new();
        let resp = InvokeRouter::default().init(&state);
        assert!(resp.is_ok());
        assert!(resp.payload.is_empty());
        assert_eq!(state.writes(), 0);
    }

    #[test]
    fn test_read_only_operations_do_not_write() {
        let state = InMemoryWorldState::new();
        state.insert("alice", b"1".to_vec());
        let router = InvokeRouter::default();
        let calls = [
            (Operation::QueryMoneyAccount, args(&["orgA", "u1"])),
            (Operation::QueryEntity, args(&["q", "alice"])),
            (Operation::QueryUserByUserId, args(&["bob"])),
            (Operation::QueryUsers, args(&[r#"{"selector":{}}"#])),
        ];
        for (op, call_args) in calls {
            assert!(op.is_read_only());
            router.execute(op, &state, &call_args).unwrap();
        }
        assert_eq!(state.writes(), 0);
    }

    #[test]
    fn test_configured_transfer_rule() {
        let state = InMemoryWorldState::new();
        state.insert("alice", b"100".to_vec());
        state.insert("bob", b"50".to_vec());
        let config = ChaincodeConfig {
            transfer_rule: crate::domain::TransferRule::DebitFirst,
            ..ChaincodeConfig::default()
        };
        let resp = InvokeRouter::new(&config).invoke(
            &state,
            "move",
            &args(&["x", "alice", "bob", "30"]),
        );
        assert_eq!(resp.payload_text(), "70");
    }
}
