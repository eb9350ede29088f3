//! Domain models for the AgroNond Mandi Platform

mod audit;
mod bill;
mod codes;
mod payment;
mod record;
mod settlement;
mod transaction;
mod user;

pub use audit::*;
pub use bill::*;
pub use codes::*;
pub use payment::*;
pub use record::*;
pub use settlement::*;
pub use transaction::*;
pub use user::*;
