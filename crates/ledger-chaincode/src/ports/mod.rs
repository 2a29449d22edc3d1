//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions at the chaincode boundary.
//!
//! - **Driving Port (Inbound)**: `ChaincodeApi`
//! - **Driven Ports (Outbound)**: `WorldState`, `QueryIterator`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
