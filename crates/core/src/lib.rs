//! Pure domain logic for the lingua coin-economy backend.
//!
//! Zero I/O: everything here is usable from the repository layer, the API
//! server, and any future CLI tooling without pulling in a runtime.

pub mod csv;
pub mod economy;
pub mod error;
pub mod signature;
pub mod types;
