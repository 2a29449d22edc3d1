//! # Domain Entities
//!
//! Records persisted in the world state.
//!
//! ## Persisted Layout
//!
//! | Entity | Key | Encoding |
//! |--------|-----|----------|
//! | `MoneyAccount` | `AccountKey::derive(org, user)` | JSON `{"usableMoney":..,"frozenMoney":..}` |
//! | `LedgerEntry` | entity name | decimal ASCII integer |
//! | `UserRecord` | canonical user id | JSON with `docType = "user"` |

use super::value_objects::{FieldPatch, UserId};
use crate::errors::ChaincodeError;
use serde::{Deserialize, Serialize};

// =============================================================================
// MONEY ACCOUNT
// =============================================================================

/// Two-field balance record of an organization user.
///
/// Absence from the store reads as the zero account. `frozen_money` is carried
/// through unchanged by every operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyAccount {
    /// Spendable balance, never negative after a debit.
    pub usable_money: i64,
    /// Balance held back from spending.
    #[serde(default)]
    pub frozen_money: i64,
}

impl MoneyAccount {
    /// Decode stored bytes, or the zero account when absent.
    pub fn from_state(key: &str, bytes: Option<&[u8]>) -> Result<Self, ChaincodeError> {
        match bytes {
            None => Ok(Self::default()),
            Some(raw) => serde_json::from_slice(raw).map_err(|e| ChaincodeError::decode(key, e)),
        }
    }

    /// JSON encoding stored in the world state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChaincodeError> {
        serde_json::to_vec(self)
            .map_err(|e| ChaincodeError::argument(format!("failed to encode money account: {e}")))
    }
}

// =============================================================================
// LEDGER ENTRY
// =============================================================================

/// Simple integer balance stored under an entity name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Current balance.
    pub balance: i64,
}

impl LedgerEntry {
    /// Decode the decimal ASCII representation.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, ChaincodeError> {
        let text = std::str::from_utf8(bytes).map_err(|e| ChaincodeError::decode(key, e))?;
        let balance = text
            .trim()
            .parse::<i64>()
            .map_err(|e| ChaincodeError::decode(key, e))?;
        Ok(Self { balance })
    }

    /// Decimal ASCII representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.balance.to_string().into_bytes()
    }
}

// =============================================================================
// USER RECORD
// =============================================================================

/// Discriminator stored in every user document.
pub const USER_DOC_TYPE: &str = "user";

/// User profile document.
///
/// Field names match the selector fields used by rich queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Record kind, always [`USER_DOC_TYPE`].
    #[serde(rename = "docType")]
    pub object_type: String,
    /// Canonical user id, also the record key.
    #[serde(rename = "userid")]
    pub user_id: String,
    /// Display name.
    #[serde(rename = "username")]
    pub user_name: String,
    /// Postal address.
    #[serde(rename = "useraddress")]
    pub user_address: String,
    /// Gender code.
    pub gender: String,
    /// Account category.
    #[serde(rename = "usertype")]
    pub user_type: String,
}

impl UserRecord {
    /// Build a new record. All string fields are canonicalized.
    #[must_use]
    pub fn new(user_id: &UserId, name: &str, address: &str, gender: &str, user_type: &str) -> Self {
        use super::value_objects::canonicalize;
        Self {
            object_type: USER_DOC_TYPE.to_string(),
            user_id: user_id.as_str().to_string(),
            user_name: canonicalize(name),
            user_address: canonicalize(address),
            gender: canonicalize(gender),
            user_type: canonicalize(user_type),
        }
    }

    /// Decode a stored document.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, ChaincodeError> {
        serde_json::from_slice(bytes).map_err(|e| ChaincodeError::decode(key, e))
    }

    /// JSON encoding stored in the world state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChaincodeError> {
        serde_json::to_vec(self)
            .map_err(|e| ChaincodeError::argument(format!("failed to encode user record: {e}")))
    }
}

/// Merge-patch over the mutable user fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New display name.
    pub user_name: FieldPatch,
    /// New address.
    pub user_address: FieldPatch,
    /// New gender code.
    pub gender: FieldPatch,
    /// New account category.
    pub user_type: FieldPatch,
}

impl UserPatch {
    /// Build from the optional positional arguments following the user id.
    #[must_use]
    pub fn from_args(fields: &[String]) -> Self {
        let arg = |i: usize| fields.get(i).map(String::as_str);
        Self {
            user_name: FieldPatch::from_arg(arg(0)),
            user_address: FieldPatch::from_arg(arg(1)),
            gender: FieldPatch::from_arg(arg(2)),
            user_type: FieldPatch::from_arg(arg(3)),
        }
    }

    /// Returns true if no field would be touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_name.is_keep()
            && self.user_address.is_keep()
            && self.gender.is_keep()
            && self.user_type.is_keep()
    }

    /// Merge into `record`, returning whether anything changed.
    pub fn apply(&self, record: &mut UserRecord) -> bool {
        let mut changed = self.user_name.apply(&mut record.user_name);
        changed |= self.user_address.apply(&mut record.user_address);
        changed |= self.gender.apply(&mut record.gender);
        changed |= self.user_type.apply(&mut record.user_type);
        changed
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_account_json_layout() {
        let account = MoneyAccount {
            usable_money: 100,
            frozen_money: 0,
        };
        let json = String::from_utf8(account.to_bytes().unwrap()).unwrap();
        assert_eq!(json, r#"{"usableMoney":100,"frozenMoney":0}"#);
    }

    #[test]
    fn test_money_account_absent_is_zero() {
        let account = MoneyAccount::from_state("k", None).unwrap();
        assert_eq!(account, MoneyAccount::default());
    }

    #[test]
    fn test_money_account_decode_error() {
        let err = MoneyAccount::from_state("k", Some(b"not json")).unwrap_err();
        assert!(matches!(err, ChaincodeError::Decode { .. }));
    }

    #[test]
    fn test_ledger_entry_codec() {
        let entry = LedgerEntry::decode("a", b"130").unwrap();
        assert_eq!(entry.balance, 130);
        assert_eq!(entry.encode(), b"130".to_vec());
        assert!(LedgerEntry::decode("a", b"abc").is_err());
    }

    #[test]
    fn test_user_record_layout() {
        let id = UserId::parse("Bob").unwrap();
        let record = UserRecord::new(&id, "Bob Smith", "NYC", "M", "T1");
        let json: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(json["docType"], "user");
        assert_eq!(json["userid"], "bob");
        assert_eq!(json["username"], "bob smith");
        assert_eq!(json["useraddress"], "nyc");
        assert_eq!(json["usertype"], "t1");
    }

    #[test]
    fn test_user_patch_blanks_keep_everything() {
        let id = UserId::parse("bob").unwrap();
        let mut record = UserRecord::new(&id, "bob", "nyc", "m", "t1");
        let before = record.clone();
        let patch = UserPatch::from_args(&[String::new(), String::new()]);
        assert!(patch.is_empty());
        assert!(!patch.apply(&mut record));
        assert_eq!(record, before);
    }

    #[test]
    fn test_user_patch_partial() {
        let id = UserId::parse("bob").unwrap();
        let mut record = UserRecord::new(&id, "bob", "nyc", "m", "t1");
        let patch = UserPatch::from_args(&[String::new(), "NEWADDR".to_string()]);
        assert!(patch.apply(&mut record));
        assert_eq!(record.user_address, "newaddr");
        assert_eq!(record.user_name, "bob");
        assert_eq!(record.gender, "m");
        assert_eq!(record.user_type, "t1");
    }
}
