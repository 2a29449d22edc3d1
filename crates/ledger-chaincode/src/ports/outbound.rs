//! # Driven Ports (SPI - Outbound)
//!
//! The world-state store the handlers run against. Durability, versioning and
//! conflict detection across concurrent transactions belong to the
//! implementation behind this trait, not to the chaincode.

use crate::errors::StoreError;

// =============================================================================
// WORLD STATE
// =============================================================================

/// One `(key, record)` pair yielded by a rich query.
pub type QueryRecord = (String, Vec<u8>);

/// Access to the versioned key-value world state.
///
/// Writes issued during one invocation become visible only if the enclosing
/// transaction commits. Handlers must not assume any lock is held on the keys
/// they touch.
pub trait WorldState: Send + Sync {
    /// Read a value. `None` if the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn del_state(&self, key: &str) -> Result<(), StoreError>;

    /// Run a selector query.
    ///
    /// The returned cursor holds store-side resources and MUST be closed.
    fn get_query_result(&self, query: &str)
        -> Result<Box<dyn QueryIterator + '_>, StoreError>;
}

// =============================================================================
// QUERY ITERATOR
// =============================================================================

/// Lazy cursor over query results.
pub trait QueryIterator: Send {
    /// Returns true while more records remain.
    fn has_next(&self) -> bool;

    /// Fetch the next record.
    fn next_record(&mut self) -> Result<QueryRecord, StoreError>;

    /// Release the cursor. Calls after the first are no-ops.
    fn close(&mut self) -> Result<(), StoreError>;
}

// =============================================================================
// TESTS
// =============================================================================
