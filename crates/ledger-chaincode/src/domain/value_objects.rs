//! # Value Objects
//!
//! Immutable domain primitives for the chaincode handlers.
//! These types represent concepts that are defined by their value, not identity.

use crate::errors::ChaincodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ACCOUNT KEY (composite)
// =============================================================================

/// Object-type prefix of every money-account key.
pub const MONEY_ACCOUNT_PREFIX: &str = "moneyAccount~";

/// World-state key of a money account, derived from `(org, user)`.
///
/// Each component is written as `<byte length>:<bytes>`, so two distinct
/// pairs can never encode to the same key even when their plain
/// concatenations agree (`("orgA","Buser")` vs `("orgAB","user")`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountKey(String);

impl AccountKey {
    /// Derive the key for an organization/user pair.
    #[must_use]
    pub fn derive(org_name: &str, user_id: &str) -> Self {
        let mut key =
            String::with_capacity(MONEY_ACCOUNT_PREFIX.len() + org_name.len() + user_id.len() + 8);
        key.push_str(MONEY_ACCOUNT_PREFIX);
        for part in [org_name, user_id] {
            key.push_str(&part.len().to_string());
            key.push(':');
            key.push_str(part);
        }
        Self(key)
    }

    /// Split a key back into `(org, user)`. Returns `None` for foreign keys.
    #[must_use]
    pub fn decode(key: &str) -> Option<(String, String)> {
        let mut rest = key.strip_prefix(MONEY_ACCOUNT_PREFIX)?;
        let mut parts = Vec::with_capacity(2);
        for _ in 0..2 {
            let (len, tail) = rest.split_once(':')?;
            let len: usize = len.parse().ok()?;
            let part = tail.get(..len)?;
            parts.push(part.to_string());
            rest = &tail[len..];
        }
        if !rest.is_empty() {
            return None;
        }
        let user = parts.pop()?;
        let org = parts.pop()?;
        Some((org, user))
    }

    /// Key as stored in the world state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountKey({})", self.0)
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// USER ID
// =============================================================================

/// Lower-cased user identifier. Also the world-state key of the user record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Canonicalize a raw identifier. Empty input is rejected.
    pub fn parse(raw: &str) -> Result<Self, ChaincodeError> {
        if raw.is_empty() {
            return Err(ChaincodeError::argument("userId must be a non-empty string"));
        }
        Ok(Self(canonicalize(raw)))
    }

    /// Key as stored in the world state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical form of a user-supplied string field.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    raw.to_lowercase()
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Direction of a money-account adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Credit usable money.
    In,
    /// Debit usable money.
    Out,
}

impl Direction {
    /// Parse the wire form (`"in"` / `"out"`).
    pub fn parse(raw: &str) -> Result<Self, ChaincodeError> {
        match raw {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(ChaincodeError::argument(format!(
                "direction must be 'in' or 'out', got '{other}'"
            ))),
        }
    }
}

// =============================================================================
// AMOUNTS
// =============================================================================

/// Parse a signed decimal integer argument.
pub fn parse_integer(field: &str, raw: &str) -> Result<i64, ChaincodeError> {
    raw.parse::<i64>()
        .map_err(|_| ChaincodeError::argument(format!("{field} must be an integer, got '{raw}'")))
}

/// Parse a non-negative decimal integer argument.
pub fn parse_non_negative(field: &str, raw: &str) -> Result<i64, ChaincodeError> {
    let value = parse_integer(field, raw)?;
    if value < 0 {
        return Err(ChaincodeError::argument(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Parse a non-zero decimal integer argument.
pub fn parse_non_zero(field: &str, raw: &str) -> Result<i64, ChaincodeError> {
    let value = parse_integer(field, raw)?;
    if value == 0 {
        return Err(ChaincodeError::argument(format!("{field} must not be zero")));
    }
    Ok(value)
}

// =============================================================================
// FIELD PATCH
// =============================================================================

/// One field of a merge-patch update.
///
/// The wire contract uses a blank string for "leave unchanged", so a field
/// can never be cleared to empty through an update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldPatch {
    /// Keep the stored value.
    #[default]
    Keep,
    /// Overwrite with this canonical value.
    Set(String),
}

impl FieldPatch {
    /// Interpret an optional wire argument.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(value) if !value.is_empty() => Self::Set(canonicalize(value)),
            _ => Self::Keep,
        }
    }

    /// Apply to a stored field, returning whether it changed.
    pub fn apply(&self, field: &mut String) -> bool {
        match self {
            Self::Keep => false,
            Self::Set(value) => {
                let changed = field != value;
                field.clone_from(value);
                changed
            }
        }
    }

    /// Returns true if this patch leaves the field alone.
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

// =============================================================================
// TESTS
// =============================================================================
