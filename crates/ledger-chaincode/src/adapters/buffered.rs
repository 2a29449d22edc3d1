//! # Buffered World State
//!
//! Per-transaction overlay over a committed [`WorldState`]. Reads see the
//! transaction's own pending writes; nothing reaches the base store until
//! [`BufferedWorldState::commit`]. Dropping the buffer discards the writes,
//! which is how a failed invocation leaves no partial effect.
//!
//! Rich queries run against committed state only.

use crate::errors::StoreError;
use crate::ports::outbound::{QueryIterator, WorldState};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::debug;

/// Pending write: `Some` for put, `None` for delete.
pub type PendingWrite = Option<Vec<u8>>;

/// Write buffer for one transaction.
pub struct BufferedWorldState<'a> {
    base: &'a dyn WorldState,
    pending: Mutex<BTreeMap<String, PendingWrite>>,
}

impl<'a> BufferedWorldState<'a> {
    /// Open a buffer over `base`.
    #[must_use]
    pub fn new(base: &'a dyn WorldState) -> Self {
        Self {
            base,
            pending: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of keys with pending writes.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Take the pending write set without applying it.
    #[must_use]
    pub fn into_write_set(self) -> BTreeMap<String, PendingWrite> {
        self.pending.into_inner()
    }

    /// Apply every pending write to the base store in key order.
    pub fn commit(self) -> Result<usize, StoreError> {
        let base = self.base;
        let writes = self.pending.into_inner();
        let count = writes.len();
        for (key, write) in writes {
            match write {
                Some(value) => base.put_state(&key, value)?,
                None => base.del_state(&key)?,
            }
        }
        debug!(writes = count, "Write set committed");
        Ok(count)
    }
}

impl WorldState for BufferedWorldState<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(write) = self.pending.lock().get(key) {
            return Ok(write.clone());
        }
        self.base.get_state(key)
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.pending.lock().insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), StoreError> {
        self.pending.lock().insert(key.to_string(), None);
        Ok(())
    }

    fn get_query_result(
        &self,
        query: &str,
    ) -> Result<Box<dyn QueryIterator + '_>, StoreError> {
        self.base.get_query_result(query)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorldState;

    #[test]
    fn test_read_your_writes() {
        let base = InMemoryWorldState::new();
        base.insert("a", b"1".to_vec());

        let tx = BufferedWorldState::new(&base);
        tx.put_state("a", b"2".to_vec()).unwrap();
        tx.del_state("b").unwrap();

        assert_eq!(tx.get_state("a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(tx.get_state("b").unwrap(), None);
        assert_eq!(base.get("a"), Some(b"1".to_vec()));
    }

    #[test]
    fn test_discard_on_drop() {
        let base = InMemoryWorldState::new();
        {
            let tx = BufferedWorldState::new(&base);
            tx.put_state("a", b"1".to_vec()).unwrap();
        }
        assert_eq!(base.get("a"), None);
        assert_eq!(base.writes(), 0);
    }

    #[test]
    fn test_commit_applies_writes() {
        let base = InMemoryWorldState::new();
        base.insert("gone", b"x".to_vec());

        let tx = BufferedWorldState::new(&base);
        tx.put_state("a", b"1".to_vec()).unwrap();
        tx.del_state("gone").unwrap();
        assert_eq!(tx.pending_len(), 2);
        assert_eq!(tx.commit().unwrap(), 2);

        assert_eq!(base.get("a"), Some(b"1".to_vec()));
        assert_eq!(base.get("gone"), None);
    }
}
