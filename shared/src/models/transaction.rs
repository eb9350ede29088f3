//! Market transaction: the committee-facing ledger twin of a settled lot
//!
//! Created once, at the moment a lot settles, by copying the record's
//! snapshot through [`NewMarketTransaction::from_settled_record`]. The two
//! are not kept in sync afterwards; each shows the amounts as they stood at
//! settlement time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LotRecord, PaymentLeg, PaymentStatus, SaleUnit, Settlement};

/// A settled sale in the committee ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketTransaction {
    pub id: Uuid,
    /// Generated code (e.g. "TXN-2026-000314"), independent of the lot code
    pub transaction_code: String,
    pub record_id: Uuid,
    pub lot_code: String,
    pub farmer_id: Uuid,
    pub trader_id: Uuid,
    pub produce_name: String,
    /// Billing quantity the settlement was computed on
    pub quantity: Decimal,
    pub sale_unit: SaleUnit,
    pub sale_rate: Decimal,
    pub settlement: Settlement,
    pub farmer_payment: PaymentLeg,
    pub trader_payment: PaymentLeg,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a market transaction about to be persisted
#[derive(Debug, Clone)]
pub struct NewMarketTransaction {
    pub transaction_code: String,
    pub record_id: Uuid,
    pub lot_code: String,
    pub farmer_id: Uuid,
    pub trader_id: Uuid,
    pub produce_name: String,
    pub quantity: Decimal,
    pub sale_unit: SaleUnit,
    pub sale_rate: Decimal,
    pub settlement: Settlement,
}

impl NewMarketTransaction {
    /// The one place a lot record's settlement snapshot is copied into the
    /// ledger. Returns `None` if the record has not settled.
    pub fn from_settled_record(record: &LotRecord, transaction_code: String) -> Option<Self> {
        let settlement = record.settlement.clone()?;
        Some(Self {
            transaction_code,
            record_id: record.id,
            lot_code: record.lot_code.clone(),
            farmer_id: record.farmer_id,
            trader_id: record.trader_id?,
            produce_name: record.produce_name.clone(),
            quantity: record.billing_quantity()?,
            sale_unit: record.sale_unit?,
            sale_rate: record.sale_rate?,
            settlement,
        })
    }
}
