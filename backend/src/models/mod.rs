//! Database models for the AgroNond Mandi Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
