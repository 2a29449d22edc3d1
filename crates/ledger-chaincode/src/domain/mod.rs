//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the ledger handlers.
//! NO I/O, NO store access.

pub mod entities;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;
