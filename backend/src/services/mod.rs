//! Business logic services for the AgroNond Mandi Platform

pub mod audit;
pub mod auth;
pub mod bill;
pub mod notification;
pub mod otp;
pub mod profile;
pub mod record;
pub mod report;
pub mod sequence;
pub mod transaction;

pub use audit::AuditService;
pub use auth::AuthService;
pub use bill::BillService;
pub use notification::NotificationService;
pub use otp::OtpStore;
pub use profile::ProfileService;
pub use record::RecordService;
pub use report::ReportService;
pub use sequence::SequenceService;
pub use transaction::TransactionService;
