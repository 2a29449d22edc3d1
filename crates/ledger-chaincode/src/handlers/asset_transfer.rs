//! # Asset Transfer
//!
//! Integer balances stored under plain entity names. Entries must exist
//! before a transfer touches them.
//!
//! Every function in this contract takes a leading selector argument that is
//! carried for wire compatibility and otherwise ignored:
//!
//! ```text
//! move(selector, first, second, amount)
//! queryEntity(selector, name)
//! deleteEntity(selector, name)
//! ```

use super::{exact_args, require_non_empty};
use crate::domain::{check_conservation_invariant, parse_non_zero, LedgerEntry, TransferRule};
use crate::errors::ChaincodeError;
use crate::ports::WorldState;
use tracing::{debug, info};

/// Two-party transfer contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssetTransfer {
    rule: TransferRule,
}

impl AssetTransfer {
    /// Contract applying `rule` on every `move`.
    #[must_use]
    pub const fn new(rule: TransferRule) -> Self {
        Self { rule }
    }

    /// Configured transfer rule.
    #[must_use]
    pub const fn rule(&self) -> TransferRule {
        self.rule
    }

    /// `move(selector, first, second, amount)`.
    ///
    /// Both entries must exist. Returns the first entry's new balance as
    /// decimal text.
    pub fn transfer(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "move";
        let [selector, first_key, second_key, amount] = exact_args::<4>(FN, args)?;
        require_non_empty(FN, "first entity", first_key)?;
        require_non_empty(FN, "second entity", second_key)?;
        if first_key == second_key {
            return Err(ChaincodeError::argument(format!(
                "{FN}: cannot transfer between '{first_key}' and itself"
            )));
        }
        let amount = parse_non_zero("amount", amount)?;

        let first = load_entry(state, first_key)?;
        let second = load_entry(state, second_key)?;

        let (first_after, second_after) = self.rule.apply(first, second, amount);
        debug_assert!(check_conservation_invariant(
            (first, second),
            (first_after, second_after)
        ));

        state.put_state(first_key, first_after.encode())?;
        state.put_state(second_key, second_after.encode())?;

        info!(
            selector,
            first = first_key,
            second = second_key,
            amount,
            rule = self.rule.name(),
            first_balance = first_after.balance,
            second_balance = second_after.balance,
            "Transfer applied"
        );
        Ok(first_after.encode())
    }

    /// `queryEntity(selector, name)`: the stored balance bytes.
    pub fn query_entity(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "queryEntity";
        let [_, key] = exact_args::<2>(FN, args)?;
        require_non_empty(FN, "entity", key)?;

        let bytes = state
            .get_state(key)?
            .ok_or_else(|| ChaincodeError::NotFound(format!("entity '{key}'")))?;
        debug!(entity = key, "Entity read");
        Ok(bytes)
    }

    /// `deleteEntity(selector, name)`.
    pub fn delete_entity(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "deleteEntity";
        let [_, key] = exact_args::<2>(FN, args)?;
        require_non_empty(FN, "entity", key)?;

        state.del_state(key)?;
        info!(entity = key, "Entity deleted");
        Ok(Vec::new())
    }
}

fn load_entry(state: &dyn WorldState, key: &str) -> Result<LedgerEntry, ChaincodeError> {
    let bytes = state
        .get_state(key)?
        .ok_or_else(|| ChaincodeError::NotFound(format!("entity '{key}'")))?;
    LedgerEntry::decode(key, &bytes)
}

// =============================================================================
// TESTS
// =============================================================================
