//! Year-scoped human-readable sequence codes
//!
//! Every lot record, market transaction, bill, and privileged profile gets
//! a code of the form `PREFIX-YEAR-NNN…`. The numeric suffix comes from an
//! atomic per-(kind, year) counter owned by the backend; this module only
//! knows prefixes, pad widths, and formatting.

use serde::{Deserialize, Serialize};

use super::UserRole;

/// The entity kinds that receive sequence codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    Lot,
    Transaction,
    FarmerBill,
    TraderBill,
    /// Privileged profiles only; construct via [`SequenceKind::for_role`]
    Profile(UserRole),
}

impl SequenceKind {
    /// Sequence kind for a profile role, if that role carries a custom id
    pub fn for_role(role: UserRole) -> Option<Self> {
        role.code_prefix().map(|_| SequenceKind::Profile(role))
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            SequenceKind::Lot => "LOT",
            SequenceKind::Transaction => "TXN",
            SequenceKind::FarmerBill => "FB",
            SequenceKind::TraderBill => "TB",
            // for_role guarantees the prefix exists
            SequenceKind::Profile(role) => role.code_prefix().unwrap_or("USR"),
        }
    }

    pub fn pad_width(&self) -> usize {
        match self {
            SequenceKind::Lot | SequenceKind::Profile(_) => 3,
            SequenceKind::FarmerBill | SequenceKind::TraderBill => 5,
            SequenceKind::Transaction => 6,
        }
    }

    /// Key of the counter row backing this kind; profile counters are
    /// per-role so each prefix numbers independently
    pub fn counter_key(&self) -> String {
        match self {
            SequenceKind::Lot => "lot".to_string(),
            SequenceKind::Transaction => "transaction".to_string(),
            SequenceKind::FarmerBill => "farmer_bill".to_string(),
            SequenceKind::TraderBill => "trader_bill".to_string(),
            SequenceKind::Profile(role) => format!("profile:{}", role.as_str()),
        }
    }
}

/// Format a sequence code, e.g. `format_code(&SequenceKind::Lot, 2026, 1)`
/// yields `"LOT-2026-001"`
pub fn format_code(kind: &SequenceKind, year: i32, sequence: i64) -> String {
    format!(
        "{}-{}-{:0width$}",
        kind.prefix(),
        year,
        sequence,
        width = kind.pad_width()
    )
}
