//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete world-state implementations and a peer stand-in.
//!
//! - `InMemoryWorldState`: committed store with selector queries
//! - `BufferedWorldState`: per-transaction write set
//! - `MockPeer`: runs an invocation and commits its write set on success

pub mod buffered;
pub mod memory_state;
pub mod mock_peer;

pub use buffered::*;
pub use memory_state::*;
pub use mock_peer::*;
