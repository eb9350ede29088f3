//! Shared types and models for the AgroNond Mandi Platform
//!
//! This crate contains the domain entities, the sale-lifecycle state
//! machine, and the settlement arithmetic shared between the backend and
//! reporting tooling. It carries no persistence or HTTP dependencies so
//! every invariant here is testable in isolation.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
