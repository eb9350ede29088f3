//! HTTP handlers for the AgroNond Mandi Platform

mod auth;
mod bill;
mod finance;
mod health;
mod lilav;
mod profile;
mod record;
mod report;
mod transaction;
mod weight;

pub use auth::*;
pub use bill::*;
pub use finance::*;
pub use health::*;
pub use lilav::*;
pub use profile::*;
pub use record::*;
pub use report::*;
pub use transaction::*;
pub use weight::*;
