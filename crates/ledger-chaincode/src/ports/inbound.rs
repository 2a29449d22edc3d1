//! # Driving Ports (API - Inbound)
//!
//! The single entry point the host peer calls for every transaction.

use crate::ports::outbound::WorldState;
use serde::{Deserialize, Serialize};

/// Status code of a successful response.
pub const STATUS_OK: u16 = 200;

/// Status code of a failed response.
pub const STATUS_ERROR: u16 = 500;

/// Result of one invocation as seen by the peer.
///
/// Errors carry only a message; no structured code crosses this boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeResponse {
    /// [`STATUS_OK`] or [`STATUS_ERROR`].
    pub status: u16,
    /// Error message, empty on success.
    pub message: String,
    /// Opaque success payload.
    pub payload: Vec<u8>,
}

impl ChaincodeResponse {
    /// Successful response with a payload.
    #[must_use]
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    /// Failed response with a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Returns true for a successful response.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Payload interpreted as UTF-8 (lossy).
    #[must_use]
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Chaincode entry points invoked by the peer.
pub trait ChaincodeApi: Send + Sync {
    /// Instantiate/upgrade hook.
    fn init(&self, state: &dyn WorldState) -> ChaincodeResponse;

    /// Execute one transaction function.
    fn invoke(&self, state: &dyn WorldState, function: &str, args: &[String]) -> ChaincodeResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_constructors() {
        let ok = ChaincodeResponse::success(b"130".to_vec());
        assert!(ok.is_ok());
        assert_eq!(ok.payload_text(), "130");

        let err = ChaincodeResponse::error("boom");
        assert!(!err.is_ok());
        assert_eq!(err.status, STATUS_ERROR);
        assert!(err.payload.is_empty());
    }
}
