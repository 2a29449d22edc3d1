//! # Transaction Handlers
//!
//! One module per contract. Every handler validates its own arguments, does
//! at most two reads and two writes against the [`WorldState`], and returns a
//! success payload or a [`ChaincodeError`]. A detected error aborts the
//! handler before any further write.
//!
//! [`WorldState`]: crate::ports::WorldState

pub mod account_ledger;
pub mod asset_transfer;
pub mod user_registry;

pub use account_ledger::AccountLedger;
pub use asset_transfer::AssetTransfer;
pub use user_registry::UserRegistry;

use crate::errors::ChaincodeError;

/// Require exactly `N` positional arguments.
pub(crate) fn exact_args<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> Result<[&'a str; N], ChaincodeError> {
    if args.len() != N {
        return Err(ChaincodeError::argument(format!(
            "{function}: incorrect number of arguments, expecting {N}, got {}",
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

/// Reject an empty positional argument.
pub(crate) fn require_non_empty(
    function: &str,
    name: &str,
    value: &str,
) -> Result<(), ChaincodeError> {
    if value.is_empty() {
        return Err(ChaincodeError::argument(format!(
            "{function}: {name} must be a non-empty string"
        )));
    }
    Ok(())
}
