//! Settlement calculator property-based and unit tests
//!
//! Covers:
//! - Base amount and commission algebra over wide quantity/rate ranges
//! - Whole-rupee commission rounding (half away from zero)
//! - Rate snapshotting onto the settlement value
//! - Serde round-trip of settled records

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::{compute_settlement, CommissionRates, LotRecord, OfficialMeasurement, SaleUnit};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Quantities from 0 to 10000.0 in tenths of a kg
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0..=100_000i64).prop_map(|n| Decimal::new(n, 1))
}

/// Rates from 0.01 to 5000.00 rupees per unit
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1..=500_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Commission rates from 0% to 25% in basis points
fn commission_rate_strategy() -> impl Strategy<Value = Decimal> {
    (0..=2_500i64).prop_map(|n| Decimal::new(n, 4))
}

fn standard_rates() -> CommissionRates {
    CommissionRates::standard()
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// base_amount is exactly quantity x rate
    #[test]
    fn test_base_amount_is_quantity_times_rate(
        quantity in quantity_strategy(),
        rate in rate_strategy()
    ) {
        let settlement = compute_settlement(quantity, rate, &standard_rates());
        prop_assert_eq!(settlement.base_amount, quantity * rate);
    }

    /// Net amounts are base minus/plus the rounded commissions
    #[test]
    fn test_net_amount_algebra(
        quantity in quantity_strategy(),
        rate in rate_strategy(),
        farmer_rate in commission_rate_strategy(),
        trader_rate in commission_rate_strategy()
    ) {
        let rates = CommissionRates { farmer: farmer_rate, trader: trader_rate };
        let s = compute_settlement(quantity, rate, &rates);

        prop_assert_eq!(s.net_payable_farmer, s.base_amount - s.farmer_commission);
        prop_assert_eq!(s.net_receivable_trader, s.base_amount + s.trader_commission);
        prop_assert_eq!(s.total_amount, s.net_receivable_trader);
        prop_assert_eq!(s.commission_total, s.farmer_commission + s.trader_commission);
    }

    /// Commissions are whole rupees, within half a rupee of the exact value
    #[test]
    fn test_commission_rounding(
        quantity in quantity_strategy(),
        rate in rate_strategy(),
        farmer_rate in commission_rate_strategy(),
        trader_rate in commission_rate_strategy()
    ) {
        let rates = CommissionRates { farmer: farmer_rate, trader: trader_rate };
        let s = compute_settlement(quantity, rate, &rates);

        prop_assert_eq!(s.farmer_commission, s.farmer_commission.trunc());
        prop_assert_eq!(s.trader_commission, s.trader_commission.trunc());

        let half = Decimal::new(5, 1);
        prop_assert!((s.farmer_commission - s.base_amount * farmer_rate).abs() <= half);
        prop_assert!((s.trader_commission - s.base_amount * trader_rate).abs() <= half);
    }

    /// The rates in effect are snapshotted onto the settlement
    #[test]
    fn test_rates_are_snapshotted(
        quantity in quantity_strategy(),
        rate in rate_strategy(),
        farmer_rate in commission_rate_strategy(),
        trader_rate in commission_rate_strategy()
    ) {
        let rates = CommissionRates { farmer: farmer_rate, trader: trader_rate };
        let s = compute_settlement(quantity, rate, &rates);

        prop_assert_eq!(s.farmer_rate, farmer_rate);
        prop_assert_eq!(s.trader_rate, trader_rate);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

/// Worked example: 105 kg at Rs 20/kg with standard 4%/9% rates
#[test]
fn test_worked_example() {
    let s = compute_settlement(Decimal::from(105), Decimal::from(20), &standard_rates());

    assert_eq!(s.base_amount, Decimal::from(2100));
    assert_eq!(s.farmer_commission, Decimal::from(84));
    assert_eq!(s.trader_commission, Decimal::from(189));
    assert_eq!(s.net_payable_farmer, Decimal::from(2016));
    assert_eq!(s.net_receivable_trader, Decimal::from(2289));
    assert_eq!(s.total_amount, Decimal::from(2289));
    assert_eq!(s.commission_total, Decimal::from(273));
}

/// Exactly half a rupee rounds away from zero, not to even
#[test]
fn test_half_rupee_rounds_up() {
    // 12.5 x 1 x 4% = 0.5 -> 1
    let s = compute_settlement(Decimal::new(125, 1), Decimal::ONE, &standard_rates());
    assert_eq!(s.farmer_commission, Decimal::ONE);

    // 12.5 x 1 x 9% = 1.125 -> 1
    assert_eq!(s.trader_commission, Decimal::ONE);
}

#[test]
fn test_zero_quantity_settles_to_zero() {
    let s = compute_settlement(Decimal::ZERO, Decimal::from(20), &standard_rates());
    assert_eq!(s.base_amount, Decimal::ZERO);
    assert_eq!(s.farmer_commission, Decimal::ZERO);
    assert_eq!(s.net_payable_farmer, Decimal::ZERO);
    assert_eq!(s.net_receivable_trader, Decimal::ZERO);
}

/// A settled record survives a serde round-trip with its snapshot intact
#[test]
fn test_settled_record_serde_round_trip() {
    let farmer = uuid::Uuid::new_v4();
    let trader = uuid::Uuid::new_v4();
    let staff = uuid::Uuid::new_v4();
    let now = chrono::Utc::now();

    let mut record = LotRecord::intake(
        uuid::Uuid::new_v4(),
        "LOT-2026-001".to_string(),
        farmer,
        "Tomato".to_string(),
        Some(Decimal::from(100)),
        None,
        now,
    );
    record
        .assign_rate(trader, SaleUnit::Kg, Decimal::from(20), &standard_rates(), staff, now)
        .unwrap();
    record
        .finalize_weight(
            OfficialMeasurement {
                quantity_kg: Some(Decimal::from(105)),
                nag: None,
                carat: None,
            },
            staff,
            &standard_rates(),
            now,
        )
        .unwrap();

    let json = serde_json::to_string(&record).unwrap();
    let decoded: LotRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, record);
    let settlement = decoded.settlement.expect("record is settled");
    assert_eq!(settlement.base_amount, Decimal::from(2100));
    assert_eq!(settlement.farmer_rate, Decimal::new(4, 2));
    assert_eq!(settlement.trader_rate, Decimal::new(9, 2));
}
