//! Settlement arithmetic: derived financial amounts for a sold lot
//!
//! The calculator is a pure function of quantity, rate, and the two
//! commission rates. Rates are snapshotted onto the resulting
//! [`Settlement`] so later changes to the market's configured rates never
//! alter amounts already on record.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Market commission rates in effect at settlement time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRates {
    /// Fraction deducted from the farmer's proceeds (e.g. 0.04)
    pub farmer: Decimal,
    /// Fraction added on top of the trader's dues (e.g. 0.09)
    pub trader: Decimal,
}

impl CommissionRates {
    /// The market's standing default rates: 4% farmer, 9% trader
    pub fn standard() -> Self {
        Self {
            farmer: Decimal::new(4, 2),
            trader: Decimal::new(9, 2),
        }
    }
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self::standard()
    }
}

/// Snapshot of all derived financial fields for one settled sale.
///
/// Computed exactly once per lot, then copied verbatim onto the market
/// transaction and the party bills. Never hand-edited, never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub base_amount: Decimal,
    pub farmer_commission: Decimal,
    pub trader_commission: Decimal,
    pub net_payable_farmer: Decimal,
    pub net_receivable_trader: Decimal,
    pub total_amount: Decimal,
    pub commission_total: Decimal,
    /// Commission rates as they stood when this settlement was computed
    pub farmer_rate: Decimal,
    pub trader_rate: Decimal,
}

/// Compute the settlement for a billing quantity at a sale rate.
///
/// Commissions round to the nearest whole rupee, half away from zero —
/// a business rule, so that farmer and trader commissions sum exactly in
/// aggregate reports.
pub fn compute_settlement(
    billing_quantity: Decimal,
    sale_rate: Decimal,
    rates: &CommissionRates,
) -> Settlement {
    let base_amount = billing_quantity * sale_rate;
    let farmer_commission = round_rupees(base_amount * rates.farmer);
    let trader_commission = round_rupees(base_amount * rates.trader);

    Settlement {
        base_amount,
        farmer_commission,
        trader_commission,
        net_payable_farmer: base_amount - farmer_commission,
        net_receivable_trader: base_amount + trader_commission,
        total_amount: base_amount + trader_commission,
        commission_total: farmer_commission + trader_commission,
        farmer_rate: rates.farmer,
        trader_rate: rates.trader,
    }
}

/// Round to whole rupees, half away from zero
fn round_rupees(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
