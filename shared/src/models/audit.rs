//! Audit events recorded after successful transitions
//!
//! The payload is a tagged union with one variant per entity/action pair,
//! so the compiler covers exactly what each action records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PaymentMode, SaleUnit, SettlementParty, UserRole};

/// What happened, with the fields that action records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuditEvent {
    RecordCreated {
        lot_code: String,
        farmer_id: Uuid,
        produce_name: String,
        estimated_quantity_kg: Decimal,
    },
    RateAssigned {
        lot_code: String,
        trader_id: Uuid,
        sale_unit: SaleUnit,
        sale_rate: Decimal,
        /// Whether this transition also computed the settlement
        settled: bool,
    },
    WeightFinalized {
        lot_code: String,
        official_quantity_kg: Option<Decimal>,
        official_nag: Option<i32>,
        official_carat: Option<Decimal>,
        settled: bool,
    },
    PaymentMarked {
        lot_code: String,
        party: SettlementParty,
        mode: PaymentMode,
        reference: Option<String>,
        /// Whether this payment closed the record
        closed: bool,
    },
    RecordDeleted {
        lot_code: String,
    },
    ProfileRegistered {
        role: UserRole,
        custom_id: Option<String>,
    },
}

impl AuditEvent {
    /// Short action name stored alongside the payload for filtering
    pub fn action(&self) -> &'static str {
        match self {
            AuditEvent::RecordCreated { .. } => "record_created",
            AuditEvent::RateAssigned { .. } => "rate_assigned",
            AuditEvent::WeightFinalized { .. } => "weight_finalized",
            AuditEvent::PaymentMarked { .. } => "payment_marked",
            AuditEvent::RecordDeleted { .. } => "record_deleted",
            AuditEvent::ProfileRegistered { .. } => "profile_registered",
        }
    }
}
