//! Party bills: one farmer bill and one trader bill per settled transaction

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LotRecord, PaymentMode, PaymentStatus, SettlementParty};

/// A party-facing bill referencing exactly one transaction and one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    /// Generated code: "FB-…" for farmer bills, "TB-…" for trader bills
    pub bill_code: String,
    pub transaction_id: Uuid,
    pub record_id: Uuid,
    pub party: SettlementParty,
    pub party_id: Uuid,
    /// Net payable (farmer) or net receivable (trader) at settlement time
    pub amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_mode: Option<PaymentMode>,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Values for a bill about to be persisted
#[derive(Debug, Clone)]
pub struct NewBill {
    pub bill_code: String,
    pub record_id: Uuid,
    pub party: SettlementParty,
    pub party_id: Uuid,
    pub amount: Decimal,
}

impl NewBill {
    /// Bill one party of a settled record. Returns `None` if the record has
    /// not settled (or, for the trader leg, has no trader).
    pub fn for_party(record: &LotRecord, party: SettlementParty, bill_code: String) -> Option<Self> {
        let settlement = record.settlement.as_ref()?;
        let (party_id, amount) = match party {
            SettlementParty::Farmer => (record.farmer_id, settlement.net_payable_farmer),
            SettlementParty::Trader => (record.trader_id?, settlement.net_receivable_trader),
        };
        Some(Self {
            bill_code,
            record_id: record.id,
            party,
            party_id,
            amount,
        })
    }
}
