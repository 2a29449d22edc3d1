//! # Domain Invariants
//!
//! Checks that MUST hold around every ledger state transition.
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | Transfer conservation | [`check_conservation_invariant`] |
//! | Usable money non-negative | [`check_usable_non_negative_invariant`] |
//! | Frozen money untouched | [`check_frozen_unchanged_invariant`] |

use super::entities::{LedgerEntry, MoneyAccount};

/// Sum of two ledger entries is preserved across a transfer (mod 2^64).
#[must_use]
pub fn check_conservation_invariant(
    before: (LedgerEntry, LedgerEntry),
    after: (LedgerEntry, LedgerEntry),
) -> bool {
    before.0.balance.wrapping_add(before.1.balance) == after.0.balance.wrapping_add(after.1.balance)
}

/// Usable money is never negative after an adjustment.
#[must_use]
pub fn check_usable_non_negative_invariant(account: &MoneyAccount) -> bool {
    account.usable_money >= 0
}

/// Adjustments never touch frozen money.
#[must_use]
pub fn check_frozen_unchanged_invariant(before: &MoneyAccount, after: &MoneyAccount) -> bool {
    before.frozen_money == after.frozen_money
}
