//! # Account Ledger
//!
//! Usable/frozen money accounts keyed by `(organization, user)`.
//! A missing account reads as zero and is created by its first credit.

use super::{exact_args, require_non_empty};
use crate::domain::{
    adjust_usable, check_frozen_unchanged_invariant, check_usable_non_negative_invariant,
    parse_non_negative, AccountKey, Direction, MoneyAccount,
};
use crate::errors::ChaincodeError;
use crate::ports::WorldState;
use tracing::{debug, info};

/// Money-account contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccountLedger;

impl AccountLedger {
    /// `initMoneyAccount(orgName, userId, direction, amount)`.
    ///
    /// Credits (`in`) or debits (`out`) the usable balance. A debit above the
    /// usable balance fails with `InsufficientFunds` and writes nothing.
    pub fn init_money_account(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "initMoneyAccount";
        let [org_name, user_id, direction, amount] = exact_args::<4>(FN, args)?;
        require_non_empty(FN, "orgName", org_name)?;
        require_non_empty(FN, "userId", user_id)?;
        require_non_empty(FN, "direction", direction)?;
        require_non_empty(FN, "amount", amount)?;

        let direction = Direction::parse(direction)?;
        let amount = parse_non_negative("amount", amount)?;
        let key = AccountKey::derive(org_name, user_id);

        let before = load_account(state, &key)?;
        let after = adjust_usable(&before, direction, amount)?;
        if direction == Direction::Out {
            debug_assert!(check_usable_non_negative_invariant(&after));
        }
        debug_assert!(check_frozen_unchanged_invariant(&before, &after));

        state.put_state(key.as_str(), after.to_bytes()?)?;

        info!(
            key = %key,
            ?direction,
            amount,
            usable = after.usable_money,
            "Money account adjusted"
        );
        Ok(Vec::new())
    }

    /// `queryMoneyAccount(orgName, userId)`: the account JSON (zero if absent).
    pub fn query_money_account(
        &self,
        state: &dyn WorldState,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError> {
        const FN: &str = "queryMoneyAccount";
        let [org_name, user_id] = exact_args::<2>(FN, args)?;
        require_non_empty(FN, "orgName", org_name)?;
        require_non_empty(FN, "userId", user_id)?;

        let key = AccountKey::derive(org_name, user_id);
        let account = load_account(state, &key)?;
        debug!(key = %key, usable = account.usable_money, "Money account read");
        account.to_bytes()
    }
}

fn load_account(state: &dyn WorldState, key: &AccountKey) -> Result<MoneyAccount, ChaincodeError> {
    let bytes = state.get_state(key.as_str())?;
    MoneyAccount::from_state(key.as_str(), bytes.as_deref())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorldState;
    use crate::errors::{ErrorKind, StoreError};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn stored(state: &InMemoryWorldState, org: &str, user: &str) -> MoneyAccount {
        let key = AccountKey::derive(org, user);
        serde_json::from_slice(&state.get(key.as_str()).unwrap()).unwrap()
    }

    #[test]
    fn test_first_credit_creates_account() {
        let state = InMemoryWorldState::new();
        AccountLedger
            .init_money_account(&state, &args(&["orgA", "u1", "in", "100"]))
            .unwrap();
        assert_eq!(
            stored(&state, "orgA", "u1"),
            MoneyAccount {
                usable_money: 100,
                frozen_money: 0
            }
        );
    }

    #[test]
    fn test_overdraft_leaves_account_unchanged() {
        let state = InMemoryWorldState::new();
        AccountLedger
            .init_money_account(&state, &args(&["orgA", "u1", "in", "100"]))
            .unwrap();
        let before = state.snapshot();

        let err = AccountLedger
            .init_money_account(&state, &args(&["orgA", "u1", "out", "150"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_debit_within_balance() {
        let state = InMemoryWorldState::new();
        let ledger = AccountLedger;
        ledger
            .init_money_account(&state, &args(&["orgA", "u1", "in", "100"]))
            .unwrap();
        ledger
            .init_money_account(&state, &args(&["orgA", "u1", "out", "40"]))
            .unwrap();
        assert_eq!(stored(&state, "orgA", "u1").usable_money, 60);
    }

    #[test]
    fn test_frozen_money_preserved() {
        let state = InMemoryWorldState::new();
        let key = AccountKey::derive("orgA", "u1");
        state.insert(key.as_str(), br#"{"usableMoney":10,"frozenMoney":5}"#.to_vec());

        AccountLedger
            .init_money_account(&state, &args(&["orgA", "u1", "in", "1"]))
            .unwrap();
        assert_eq!(
            stored(&state, "orgA", "u1"),
            MoneyAccount {
                usable_money: 11,
                frozen_money: 5
            }
        );
    }

    #[test]
    fn test_argument_errors_do_not_touch_store() {
        let state = InMemoryWorldState::new();
        let ledger = AccountLedger;
        for bad in [
            args(&["orgA", "u1", "in"]),
            args(&["", "u1", "in", "1"]),
            args(&["orgA", "u1", "sideways", "1"]),
            args(&["orgA", "u1", "in", "ten"]),
            args(&["orgA", "u1", "in", "-5"]),
        ] {
            let err = ledger.init_money_account(&state, &bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Argument, "{bad:?}");
        }
        assert_eq!(state.writes(), 0);
    }

    #[test]
    fn test_accounts_are_isolated_by_composite_key() {
        let state = InMemoryWorldState::new();
        let ledger = AccountLedger;
        ledger
            .init_money_account(&state, &args(&["orgA", "Buser", "in", "5"]))
            .unwrap();
        ledger
            .init_money_account(&state, &args(&["orgAB", "user", "in", "7"]))
            .unwrap();
        assert_eq!(stored(&state, "orgA", "Buser").usable_money, 5);
        assert_eq!(stored(&state, "orgAB", "user").usable_money, 7);
    }

    #[test]
    fn test_store_failure() {
        let state = InMemoryWorldState::new();
        state.set_unavailable(true);
        let err = AccountLedger
            .init_money_account(&state, &args(&["orgA", "u1", "in", "1"]))
            .unwrap_err();
        assert_eq!(err, ChaincodeError::Store(StoreError::Unavailable));
    }

    #[test]
    fn test_query_money_account() {
        let state = InMemoryWorldState::new();
        let ledger = AccountLedger;
        let empty = ledger
            .query_money_account(&state, &args(&["orgA", "u1"]))
            .unwrap();
        assert_eq!(empty, br#"{"usableMoney":0,"frozenMoney":0}"#.to_vec());

        ledger
            .init_money_account(&state, &args(&["orgA", "u1", "in", "9"]))
            .unwrap();
        let json = ledger
            .query_money_account(&state, &args(&["orgA", "u1"]))
            .unwrap();
        assert_eq!(json, br#"{"usableMoney":9,"frozenMoney":0}"#.to_vec());
    }
}
