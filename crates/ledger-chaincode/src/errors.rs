//! # Error Types
//!
//! All error types for chaincode execution.
//!
//! Handlers convert every failure into a [`ChaincodeError`] at the point of
//! detection. The router turns it into an error response carrying the
//! message; no retry happens inside the chaincode.

use thiserror::Error;

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors raised by the world-state store port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing store could not be reached.
    #[error("world state unavailable")]
    Unavailable,

    /// The selector document handed to `query` was rejected.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// Iterator used after it was closed.
    #[error("query cursor already closed")]
    CursorClosed,

    /// Query produced more results than the configured cap.
    #[error("query result limit exceeded: more than {limit} records")]
    ResultLimitExceeded {
        /// Configured maximum.
        limit: usize,
    },

    /// Lock guarding the in-memory state was poisoned.
    #[error("state lock poisoned")]
    LockPoisoned,

    /// Any other backend failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

// =============================================================================
// CHAINCODE ERRORS
// =============================================================================

/// Coarse classification of a [`ChaincodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing, empty or malformed arguments.
    Argument,
    /// Debit exceeds the usable balance.
    InsufficientFunds,
    /// Required key absent.
    NotFound,
    /// Create on an existing key.
    DuplicateKey,
    /// Stored bytes do not parse as the expected record.
    Decode,
    /// Store unavailable or query rejected.
    Store,
}

/// Errors produced by transaction handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChaincodeError {
    /// Wrong arity, empty field, or a value that does not parse.
    #[error("invalid arguments: {0}")]
    Argument(String),

    /// Debit larger than the account's usable money.
    #[error("insufficient funds: required {required}, usable {available}")]
    InsufficientFunds {
        /// Requested debit.
        required: i64,
        /// Usable money at the time of the request.
        available: i64,
    },

    /// Key is not present in the world state.
    #[error("not found: {0}")]
    NotFound(String),

    /// Key already holds a record.
    #[error("record already exists: {0}")]
    DuplicateKey(String),

    /// Stored value could not be decoded.
    #[error("failed to decode record at {key}: {reason}")]
    Decode {
        /// Key whose value failed to decode.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// World-state failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ChaincodeError {
    /// Shorthand for an argument error.
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Shorthand for a decode error on `key`.
    pub fn decode(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateKey(_) => ErrorKind::DuplicateKey,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown transfer rule name.
    #[error("unknown transfer rule '{0}', expected 'credit-first' or 'debit-first'")]
    UnknownTransferRule(String),

    /// A numeric setting did not parse.
    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },
}

// =============================================================================
// TESTS
// =============================================================================
