//! # Domain Services
//!
//! Pure state transitions. No store access happens here; handlers read the
//! records, call into these functions and write the results back.

use super::entities::{LedgerEntry, MoneyAccount};
use super::value_objects::Direction;
use crate::errors::ChaincodeError;

// =============================================================================
// MONEY ACCOUNT ADJUSTMENT
// =============================================================================

/// Apply a credit or debit to the usable balance.
///
/// A debit larger than `usable_money` fails and leaves `account` untouched.
pub fn adjust_usable(
    account: &MoneyAccount,
    direction: Direction,
    amount: i64,
) -> Result<MoneyAccount, ChaincodeError> {
    let mut next = *account;
    match direction {
        Direction::In => {
            next.usable_money = account.usable_money.checked_add(amount).ok_or_else(|| {
                ChaincodeError::argument(format!(
                    "credit of {amount} overflows usable balance {}",
                    account.usable_money
                ))
            })?;
        }
        Direction::Out => {
            if account.usable_money < amount {
                return Err(ChaincodeError::InsufficientFunds {
                    required: amount,
                    available: account.usable_money,
                });
            }
            next.usable_money = account.usable_money - amount;
        }
    }
    Ok(next)
}

// =============================================================================
// TRANSFER RULE
// =============================================================================

/// Which named party of a `move` receives the amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransferRule {
    /// First named party is credited, second debited.
    #[default]
    CreditFirst,
    /// First named party is debited, second credited.
    DebitFirst,
}

impl TransferRule {
    /// Configuration name of the rule.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreditFirst => "credit-first",
            Self::DebitFirst => "debit-first",
        }
    }

    /// Parse the configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "credit-first" => Some(Self::CreditFirst),
            "debit-first" => Some(Self::DebitFirst),
            _ => None,
        }
    }

    /// Move `amount` between `first` and `second`.
    ///
    /// Arithmetic wraps on overflow; the pair's sum is conserved modulo 2^64.
    #[must_use]
    pub fn apply(
        self,
        first: LedgerEntry,
        second: LedgerEntry,
        amount: i64,
    ) -> (LedgerEntry, LedgerEntry) {
        let delta = match self {
            Self::CreditFirst => amount,
            Self::DebitFirst => amount.wrapping_neg(),
        };
        (
            LedgerEntry {
                balance: first.balance.wrapping_add(delta),
            },
            LedgerEntry {
                balance: second.balance.wrapping_sub(delta),
            },
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
