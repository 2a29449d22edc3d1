//! # Query Result Assembly
//!
//! Turns a store cursor into one JSON array document:
//!
//! ```text
//! [{"Key":"bob","Record":{...}},{"Key":"carol","Record":{...}}]
//! ```
//!
//! Records are embedded verbatim in iteration order. The cursor is wrapped in
//! a [`CursorGuard`] so it is closed exactly once on every exit path.

use crate::errors::{ChaincodeError, StoreError};
use crate::ports::outbound::{QueryIterator, QueryRecord, WorldState};
use tracing::{debug, warn};

// =============================================================================
// CURSOR GUARD
// =============================================================================

/// Owns a query cursor and closes it when dropped.
pub struct CursorGuard<'a> {
    inner: Box<dyn QueryIterator + 'a>,
    closed: bool,
}

impl<'a> CursorGuard<'a> {
    /// Take ownership of an open cursor.
    pub fn new(inner: Box<dyn QueryIterator + 'a>) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Returns true while more records remain.
    pub fn has_next(&self) -> bool {
        !self.closed && self.inner.has_next()
    }

    /// Fetch the next record.
    pub fn next_record(&mut self) -> Result<QueryRecord, StoreError> {
        if self.closed {
            return Err(StoreError::CursorClosed);
        }
        self.inner.next_record()
    }

    /// Close now and report the outcome.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.closed = true;
        self.inner.close()
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.inner.close() {
                warn!(error = %e, "Failed to close query cursor");
            }
        }
    }
}

// =============================================================================
// JSON ARRAY WRITER
// =============================================================================

/// Incremental writer for the `[{"Key":..,"Record":..},...]` document.
#[derive(Debug)]
pub struct JsonArrayWriter {
    buf: String,
    count: usize,
}

impl Default for JsonArrayWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonArrayWriter {
    /// Start an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: String::from("["),
            count: 0,
        }
    }

    /// Append one element. `record` must already be a JSON document.
    pub fn push_record(&mut self, key: &str, record: &[u8]) -> Result<(), ChaincodeError> {
        let record = std::str::from_utf8(record).map_err(|e| ChaincodeError::decode(key, e))?;
        let key_json = serde_json::to_string(key).map_err(|e| ChaincodeError::decode(key, e))?;

        if self.count > 0 {
            self.buf.push(',');
        }
        self.buf.push_str("{\"Key\":");
        self.buf.push_str(&key_json);
        self.buf.push_str(",\"Record\":");
        self.buf.push_str(record);
        self.buf.push('}');
        self.count += 1;
        Ok(())
    }

    /// Elements written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Close the array and return the document.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.buf.push(']');
        self.buf.into_bytes()
    }
}

// =============================================================================
// ASSEMBLER
// =============================================================================

/// Executes a selector query and assembles the JSON array result.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryResultAssembler {
    max_results: Option<usize>,
}

impl QueryResultAssembler {
    /// Assembler with an optional cap on emitted elements.
    #[must_use]
    pub const fn new(max_results: Option<usize>) -> Self {
        Self { max_results }
    }

    /// Run `query` against `state` and collect every match.
    pub fn assemble(&self, state: &dyn WorldState, query: &str) -> Result<Vec<u8>, ChaincodeError> {
        debug!(query, "Running rich query");

        let mut cursor = CursorGuard::new(state.get_query_result(query)?);
        let mut writer = JsonArrayWriter::new();

        while cursor.has_next() {
            let (key, record) = cursor.next_record()?;
            if let Some(limit) = self.max_results {
                if writer.len() >= limit {
                    return Err(StoreError::ResultLimitExceeded { limit }.into());
                }
            }
            writer.push_record(&key, &record)?;
        }
        cursor.close()?;

        debug!(results = writer.len(), "Rich query assembled");
        Ok(writer.finish())
    }
}

// =============================================================================
// TESTS
// =============================================================================
