//! # In-Memory World State
//!
//! Reference implementation of [`WorldState`] for tests and local runs.
//! Production peers provide their own store; this one keeps committed values
//! in a sorted map and answers equality selectors of the form
//! `{"selector": {"field": value, ...}}`.

use crate::errors::StoreError;
use crate::ports::outbound::{QueryIterator, QueryRecord, WorldState};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory world state.
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    /// Committed key/value pairs.
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    /// Cursors currently open.
    open_cursors: Arc<AtomicUsize>,
    /// Cursors ever opened.
    cursors_opened: AtomicUsize,
    /// Put/delete calls accepted.
    writes: AtomicUsize,
    /// Simulate an unreachable backend.
    unavailable: AtomicBool,
    /// Make the next cursor fail after yielding this many records.
    cursor_fault: Mutex<Option<usize>>,
}

impl InMemoryWorldState {
    /// Create a new empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write.
    pub fn insert(&self, key: &str, value: Vec<u8>) {
        self.entries.write().insert(key.to_string(), value);
    }

    /// Raw committed value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    /// Copy of all committed entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.entries.read().clone()
    }

    /// Toggle simulated backend failure.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Next cursor errors after yielding `records` records.
    pub fn fail_cursor_after(&self, records: usize) {
        *self.cursor_fault.lock() = Some(records);
    }

    /// Cursors not yet closed.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Cursors opened since creation.
    #[must_use]
    pub fn cursors_opened(&self) -> usize {
        self.cursors_opened.load(Ordering::SeqCst)
    }

    /// Put/delete calls accepted since creation.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.ensure_available()?;
        Ok(self.get(key))
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.entries.write().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.entries.write().remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_query_result(
        &self,
        query: &str,
    ) -> Result<Box<dyn QueryIterator + '_>, StoreError> {
        self.ensure_available()?;
        let selector = parse_selector(query)?;

        let records: VecDeque<QueryRecord> = self
            .entries
            .read()
            .iter()
            .filter(|(_, value)| matches_selector(value, &selector))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        self.cursors_opened.fetch_add(1, Ordering::SeqCst);
        self.open_cursors.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryCursor {
            records,
            yielded: 0,
            fail_after: self.cursor_fault.lock().take(),
            closed: false,
            open_cursors: Arc::clone(&self.open_cursors),
        }))
    }
}

// =============================================================================
// SELECTORS
// =============================================================================

/// Extract the field-equality map from a query document.
fn parse_selector(query: &str) -> Result<Map<String, Value>, StoreError> {
    let doc: Value =
        serde_json::from_str(query).map_err(|e| StoreError::MalformedQuery(e.to_string()))?;
    let selector = doc
        .get("selector")
        .and_then(Value::as_object)
        .ok_or_else(|| StoreError::MalformedQuery("missing 'selector' object".to_string()))?;

    for (field, expected) in selector {
        if let Value::Object(ops) = expected {
            if ops.keys().any(|k| k.starts_with('$')) {
                return Err(StoreError::MalformedQuery(format!(
                    "unsupported operator on field '{field}'"
                )));
            }
        }
    }
    Ok(selector.clone())
}

/// Records that are not JSON objects never match.
fn matches_selector(value: &[u8], selector: &Map<String, Value>) -> bool {
    let Ok(Value::Object(record)) = serde_json::from_slice::<Value>(value) else {
        return false;
    };
    selector
        .iter()
        .all(|(field, expected)| record.get(field) == Some(expected))
}

// =============================================================================
// CURSOR
// =============================================================================

struct MemoryCursor {
    records: VecDeque<QueryRecord>,
    yielded: usize,
    fail_after: Option<usize>,
    closed: bool,
    open_cursors: Arc<AtomicUsize>,
}

impl QueryIterator for MemoryCursor {
    fn has_next(&self) -> bool {
        !self.closed && !self.records.is_empty()
    }

    fn next_record(&mut self) -> Result<QueryRecord, StoreError> {
        if self.closed {
            return Err(StoreError::CursorClosed);
        }
        if self.fail_after == Some(self.yielded) {
            return Err(StoreError::Backend("cursor interrupted".to_string()));
        }
        let record = self
            .records
            .pop_front()
            .ok_or_else(|| StoreError::Backend("cursor exhausted".to_string()))?;
        self.yielded += 1;
        Ok(record)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(it: &mut dyn QueryIterator) -> Vec<String> {
        let mut keys = Vec::new();
        while it.has_next() {
            keys.push(it.next_record().unwrap().0);
        }
        keys
    }

    #[test]
    fn test_get_put_delete() {
        let state = InMemoryWorldState::new();
        assert_eq!(state.get_state("a").unwrap(), None);

        state.put_state("a", b"1".to_vec()).unwrap();
        assert_eq!(state.get_state("a").unwrap(), Some(b"1".to_vec()));

        state.del_state("a").unwrap();
        assert_eq!(state.get_state("a").unwrap(), None);
        assert_eq!(state.writes(), 2);
    }

    #[test]
    fn test_unavailable() {
        let state = InMemoryWorldState::new();
        state.set_unavailable(true);
        assert_eq!(state.get_state("a").unwrap_err(), StoreError::Unavailable);
        assert_eq!(
            state.put_state("a", vec![]).unwrap_err(),
            StoreError::Unavailable
        );
    }

    #[test]
    fn test_selector_equality() {
        let state = InMemoryWorldState::new();
        state.insert("bob", br#"{"docType":"user","userid":"bob"}"#.to_vec());
        state.insert("carol", br#"{"docType":"user","userid":"carol"}"#.to_vec());
        state.insert("alice", b"100".to_vec());

        let mut it = state
            .get_query_result(r#"{"selector":{"docType":"user"}}"#)
            .unwrap();
        assert_eq!(drain(it.as_mut()), vec!["bob", "carol"]);
        it.close().unwrap();

        let mut it = state
            .get_query_result(r#"{"selector":{"docType":"user","userid":"carol"}}"#)
            .unwrap();
        assert_eq!(drain(it.as_mut()), vec!["carol"]);
        it.close().unwrap();
        assert_eq!(state.open_cursors(), 0);
    }

    #[test]
    fn test_malformed_selectors() {
        let state = InMemoryWorldState::new();
        for query in ["nope", r#"{"fields":["a"]}"#, r#"{"selector":{"n":{"$gt":1}}}"#] {
            assert!(matches!(
                state.get_query_result(query),
                Err(StoreError::MalformedQuery(_))
            ));
        }
    }

    #[test]
    fn test_cursor_close_is_idempotent() {
        let state = InMemoryWorldState::new();
        let mut it = state.get_query_result(r#"{"selector":{}}"#).unwrap();
        assert_eq!(state.open_cursors(), 1);
        it.close().unwrap();
        it.close().unwrap();
        assert_eq!(state.open_cursors(), 0);
    }

    #[test]
    fn test_cursor_fault_injection() {
        let state = InMemoryWorldState::new();
        state.insert("a", b"{}".to_vec());
        state.insert("b", b"{}".to_vec());
        state.fail_cursor_after(1);

        let mut it = state.get_query_result(r#"{"selector":{}}"#).unwrap();
        assert!(it.next_record().is_ok());
        assert!(it.next_record().is_err());
        it.close().unwrap();

        // fault applies to one cursor only
        let mut it = state.get_query_result(r#"{"selector":{}}"#).unwrap();
        assert_eq!(drain(it.as_mut()).len(), 2);
        it.close().unwrap();
    }
}
