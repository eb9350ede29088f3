//! Lot record: one farmer-submitted batch of produce tracked from intake
//! through lilav (auction), weighing, settlement, and payment.
//!
//! The lifecycle transitions live here as pure methods so they can be
//! validated and tested without a database. The backend services load a
//! record, apply a transition, and persist the result.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{
    compute_settlement, CommissionRates, PaymentLeg, PaymentMode, PaymentStatus, Settlement,
    SettlementParty,
};

/// Lifecycle state of a lot record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    /// Created at farmer intake; no rate, no official weight
    Pending,
    /// Rate assigned at lilav; awaiting official weight
    RateAssigned,
    /// Official weight recorded before any rate was assigned
    Weighed,
    /// Settlement computed; record closed to further rate/weight changes
    Sold,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Pending => "pending",
            LotStatus::RateAssigned => "rate_assigned",
            LotStatus::Weighed => "weighed",
            LotStatus::Sold => "sold",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LotStatus::Pending),
            "rate_assigned" => Some(LotStatus::RateAssigned),
            "weighed" => Some(LotStatus::Weighed),
            "sold" => Some(LotStatus::Sold),
            _ => None,
        }
    }
}

impl std::fmt::Display for LotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit a sale is priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleUnit {
    /// Weight-based, rupees per kilogram
    Kg,
    /// Count-based ("nag"), rupees per piece
    Nag,
    /// Carat unit used for certain produce types
    Carat,
}

impl SaleUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleUnit::Kg => "kg",
            SaleUnit::Nag => "nag",
            SaleUnit::Carat => "carat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kg" => Some(SaleUnit::Kg),
            "nag" => Some(SaleUnit::Nag),
            "carat" => Some(SaleUnit::Carat),
            _ => None,
        }
    }
}

/// Official measurements supplied by weighing staff
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficialMeasurement {
    pub quantity_kg: Option<Decimal>,
    pub nag: Option<i32>,
    pub carat: Option<Decimal>,
}

impl OfficialMeasurement {
    pub fn is_empty(&self) -> bool {
        self.quantity_kg.is_none() && self.nag.is_none() && self.carat.is_none()
    }
}

/// Why a transition was rejected; the record is left unmodified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("sale rate must be greater than zero")]
    InvalidRate,
    #[error("official measurements cannot be negative")]
    InvalidQuantity,
    #[error("at least one official measurement is required")]
    EmptyMeasurement,
    #[error("official quantity is required before settlement")]
    MissingQuantity,
    #[error("official carat is required for carat-unit sales")]
    MissingCarat,
    #[error("rate already assigned")]
    RateAlreadyAssigned,
    #[error("record already sold")]
    AlreadySold,
    #[error("record has not been settled yet")]
    NotSettled,
    #[error("{party} payment already marked paid")]
    AlreadyPaid { party: SettlementParty },
}

/// What a successful transition did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// State advanced; settlement not yet due
    Recorded,
    /// Settlement was computed by this transition
    Settled,
    /// Settlement already existed; nothing changed
    AlreadySettled,
}

/// One farmer-submitted batch of produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotRecord {
    pub id: Uuid,
    /// Generated lot code (e.g. "LOT-2026-042"), assigned once, immutable
    pub lot_code: String,
    pub farmer_id: Uuid,
    pub trader_id: Option<Uuid>,
    pub weighed_by: Option<Uuid>,
    pub sold_by: Option<Uuid>,
    pub produce_name: String,
    /// Farmer-declared estimate at intake; zero when not declared
    pub estimated_quantity_kg: Decimal,
    /// Staff-measured weight, authoritative once present
    pub official_quantity_kg: Option<Decimal>,
    pub estimated_nag: Option<i32>,
    pub official_nag: Option<i32>,
    pub official_carat: Option<Decimal>,
    pub sale_unit: Option<SaleUnit>,
    pub sale_rate: Option<Decimal>,
    pub status: LotStatus,
    pub settlement: Option<Settlement>,
    pub farmer_payment: PaymentLeg,
    pub trader_payment: PaymentLeg,
    /// Overall status; closes on the trader leg only
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LotRecord {
    /// A fresh record as created by farmer intake
    pub fn intake(
        id: Uuid,
        lot_code: String,
        farmer_id: Uuid,
        produce_name: String,
        estimated_quantity_kg: Option<Decimal>,
        estimated_nag: Option<i32>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            lot_code,
            farmer_id,
            trader_id: None,
            weighed_by: None,
            sold_by: None,
            produce_name,
            estimated_quantity_kg: estimated_quantity_kg.unwrap_or(Decimal::ZERO),
            official_quantity_kg: None,
            estimated_nag,
            official_nag: None,
            official_carat: None,
            sale_unit: None,
            sale_rate: None,
            status: LotStatus::Pending,
            settlement: None,
            farmer_payment: PaymentLeg::pending(),
            trader_payment: PaymentLeg::pending(),
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The quantity a settlement is billed on: carat for carat-unit sales,
    /// nag count for count-based sales, official weight otherwise
    pub fn billing_quantity(&self) -> Option<Decimal> {
        match self.sale_unit? {
            SaleUnit::Kg => self.official_quantity_kg,
            SaleUnit::Nag => self.official_nag.map(Decimal::from),
            SaleUnit::Carat => self.official_carat,
        }
    }

    /// Assign the lilav sale rate.
    ///
    /// From `Pending` the record moves to `RateAssigned` and settlement
    /// waits for the official weight. From `Weighed` (weight taken before
    /// the auction) the official quantity is already known, so settlement
    /// is computed immediately and the record moves to `Sold`.
    pub fn assign_rate(
        &mut self,
        trader_id: Uuid,
        sale_unit: SaleUnit,
        sale_rate: Decimal,
        rates: &CommissionRates,
        sold_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, TransitionError> {
        if sale_rate <= Decimal::ZERO {
            return Err(TransitionError::InvalidRate);
        }

        match self.status {
            LotStatus::Pending => {
                self.apply_rate(trader_id, sale_unit, sale_rate, sold_by, now);
                self.status = LotStatus::RateAssigned;
                Ok(TransitionOutcome::Recorded)
            }
            LotStatus::Weighed => {
                // Validate settlement is computable before mutating anything
                let quantity = billing_quantity_for(
                    sale_unit,
                    self.official_quantity_kg,
                    self.official_nag,
                    self.official_carat,
                )?;
                self.apply_rate(trader_id, sale_unit, sale_rate, sold_by, now);
                self.settlement = Some(compute_settlement(quantity, sale_rate, rates));
                self.status = LotStatus::Sold;
                Ok(TransitionOutcome::Settled)
            }
            LotStatus::RateAssigned => Err(TransitionError::RateAlreadyAssigned),
            LotStatus::Sold => Err(TransitionError::AlreadySold),
        }
    }

    /// Record the official weight.
    ///
    /// From `RateAssigned` this also computes the settlement and moves the
    /// record to `Sold`. From `Pending` or `Weighed` only the measurements
    /// are stored. Once a settlement exists the call is an idempotent
    /// no-op: stored financials and quantities are never recomputed.
    pub fn finalize_weight(
        &mut self,
        measurement: OfficialMeasurement,
        weighed_by: Uuid,
        rates: &CommissionRates,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, TransitionError> {
        if self.settlement.is_some() {
            return Ok(TransitionOutcome::AlreadySettled);
        }
        if measurement.is_empty() {
            return Err(TransitionError::EmptyMeasurement);
        }
        if measurement.quantity_kg.is_some_and(|q| q < Decimal::ZERO)
            || measurement.carat.is_some_and(|c| c < Decimal::ZERO)
            || measurement.nag.is_some_and(|n| n < 0)
        {
            return Err(TransitionError::InvalidQuantity);
        }

        match self.status {
            LotStatus::RateAssigned => {
                // Unit and rate are set; check the measurement covers them
                // before mutating the record
                let unit = self.sale_unit.ok_or(TransitionError::NotSettled)?;
                let rate = self.sale_rate.ok_or(TransitionError::NotSettled)?;
                let quantity = billing_quantity_for(
                    unit,
                    measurement.quantity_kg.or(self.official_quantity_kg),
                    measurement.nag.or(self.official_nag),
                    measurement.carat.or(self.official_carat),
                )?;
                self.apply_measurement(measurement, weighed_by, now);
                self.settlement = Some(compute_settlement(quantity, rate, rates));
                self.status = LotStatus::Sold;
                Ok(TransitionOutcome::Settled)
            }
            LotStatus::Pending | LotStatus::Weighed => {
                self.apply_measurement(measurement, weighed_by, now);
                self.status = LotStatus::Weighed;
                Ok(TransitionOutcome::Recorded)
            }
            // Sold without a settlement cannot be constructed through
            // transitions; treat it as already settled
            LotStatus::Sold => Ok(TransitionOutcome::AlreadySettled),
        }
    }

    /// Mark one party leg paid, stamping mode, reference, and date.
    ///
    /// The overall `payment_status` closes on the trader leg only; a
    /// farmer-side payout leaves the record open. Returns whether the
    /// record is now closed.
    pub fn mark_paid(
        &mut self,
        party: SettlementParty,
        mode: PaymentMode,
        reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, TransitionError> {
        if self.settlement.is_none() {
            return Err(TransitionError::NotSettled);
        }

        let leg = match party {
            SettlementParty::Farmer => &mut self.farmer_payment,
            SettlementParty::Trader => &mut self.trader_payment,
        };
        if leg.is_paid() {
            return Err(TransitionError::AlreadyPaid { party });
        }

        leg.status = PaymentStatus::Paid;
        leg.mode = Some(mode);
        leg.reference = reference;
        leg.paid_at = Some(now);
        self.updated_at = now;

        if party == SettlementParty::Trader {
            self.payment_status = PaymentStatus::Paid;
        }
        Ok(self.payment_status == PaymentStatus::Paid)
    }

    fn apply_rate(
        &mut self,
        trader_id: Uuid,
        sale_unit: SaleUnit,
        sale_rate: Decimal,
        sold_by: Uuid,
        now: DateTime<Utc>,
    ) {
        self.trader_id = Some(trader_id);
        self.sale_unit = Some(sale_unit);
        self.sale_rate = Some(sale_rate);
        self.sold_by = Some(sold_by);
        self.updated_at = now;
    }

    fn apply_measurement(
        &mut self,
        measurement: OfficialMeasurement,
        weighed_by: Uuid,
        now: DateTime<Utc>,
    ) {
        if measurement.quantity_kg.is_some() {
            self.official_quantity_kg = measurement.quantity_kg;
        }
        if measurement.nag.is_some() {
            self.official_nag = measurement.nag;
        }
        if measurement.carat.is_some() {
            self.official_carat = measurement.carat;
        }
        self.weighed_by = Some(weighed_by);
        self.updated_at = now;
    }
}

/// Billing quantity for a unit from the available official measurements
fn billing_quantity_for(
    unit: SaleUnit,
    quantity_kg: Option<Decimal>,
    nag: Option<i32>,
    carat: Option<Decimal>,
) -> Result<Decimal, TransitionError> {
    match unit {
        SaleUnit::Kg => quantity_kg.ok_or(TransitionError::MissingQuantity),
        SaleUnit::Nag => nag.map(Decimal::from).ok_or(TransitionError::MissingQuantity),
        SaleUnit::Carat => carat.ok_or(TransitionError::MissingCarat),
    }
}
