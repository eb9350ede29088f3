//! Sale lifecycle state machine tests
//!
//! Covers both orderings of rate assignment and weighing, settlement
//! idempotence, rejection of invalid transitions (leaving the record
//! unmodified), and the payment closing rule.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    CommissionRates, LotRecord, LotStatus, OfficialMeasurement, PaymentMode, PaymentStatus,
    SaleUnit, SettlementParty, TransitionError, TransitionOutcome,
};

fn rates() -> CommissionRates {
    CommissionRates::standard()
}

fn intake_record() -> LotRecord {
    LotRecord::intake(
        Uuid::new_v4(),
        "LOT-2026-001".to_string(),
        Uuid::new_v4(),
        "Tomato".to_string(),
        Some(Decimal::from(100)),
        None,
        Utc::now(),
    )
}

fn kg(n: i64) -> OfficialMeasurement {
    OfficialMeasurement {
        quantity_kg: Some(Decimal::from(n)),
        nag: None,
        carat: None,
    }
}

// ============================================================================
// Rate-then-weight ordering
// ============================================================================

#[test]
fn test_intake_starts_pending_without_financials() {
    let record = intake_record();
    assert_eq!(record.status, LotStatus::Pending);
    assert!(record.settlement.is_none());
    assert!(record.sale_rate.is_none());
    assert_eq!(record.payment_status, PaymentStatus::Pending);
}

#[test]
fn test_assign_rate_from_pending_defers_settlement() {
    let mut record = intake_record();
    let trader = Uuid::new_v4();

    let outcome = record
        .assign_rate(trader, SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::Recorded);
    assert_eq!(record.status, LotStatus::RateAssigned);
    assert_eq!(record.trader_id, Some(trader));
    // No official quantity yet, so no financials
    assert!(record.settlement.is_none());
}

#[test]
fn test_finalize_weight_after_rate_settles() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    let outcome = record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::Settled);
    assert_eq!(record.status, LotStatus::Sold);
    let settlement = record.settlement.as_ref().expect("settled");
    assert_eq!(settlement.base_amount, Decimal::from(2100));
    assert_eq!(settlement.net_payable_farmer, Decimal::from(2016));
    assert_eq!(settlement.net_receivable_trader, Decimal::from(2289));
}

// ============================================================================
// Weight-then-rate ordering
// ============================================================================

#[test]
fn test_finalize_weight_before_rate_records_only() {
    let mut record = intake_record();

    let outcome = record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::Recorded);
    assert_eq!(record.status, LotStatus::Weighed);
    assert!(record.settlement.is_none());
}

#[test]
fn test_assign_rate_after_weighing_settles_immediately() {
    let mut record = intake_record();
    record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    let outcome = record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::Settled);
    assert_eq!(record.status, LotStatus::Sold);
    assert_eq!(
        record.settlement.as_ref().unwrap().base_amount,
        Decimal::from(2100)
    );
}

#[test]
fn test_reweighing_before_rate_overwrites_measurement() {
    let mut record = intake_record();
    record
        .finalize_weight(kg(90), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();
    record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    assert_eq!(record.status, LotStatus::Weighed);
    assert_eq!(record.official_quantity_kg, Some(Decimal::from(105)));
}

// ============================================================================
// Idempotence and invalid transitions
// ============================================================================

#[test]
fn test_finalize_weight_is_idempotent_after_settlement() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();
    record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    let before = record.clone();
    let outcome = record
        .finalize_weight(kg(999), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::AlreadySettled);
    assert_eq!(record, before);
}

#[test]
fn test_settlement_keeps_original_rates_after_reconfiguration() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();
    record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    // The market later changes its configured rates; re-submitting the
    // weight must not move the stored snapshot
    let new_rates = CommissionRates {
        farmer: Decimal::new(10, 2),
        trader: Decimal::new(15, 2),
    };
    let outcome = record
        .finalize_weight(kg(105), Uuid::new_v4(), &new_rates, Utc::now())
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::AlreadySettled);
    let settlement = record.settlement.as_ref().unwrap();
    assert_eq!(settlement.farmer_rate, Decimal::new(4, 2));
    assert_eq!(settlement.trader_rate, Decimal::new(9, 2));
    assert_eq!(settlement.farmer_commission, Decimal::from(84));
}

#[test]
fn test_assign_rate_twice_fails_and_leaves_record_unmodified() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    let before = record.clone();
    let err = record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(25), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap_err();

    assert_eq!(err, TransitionError::RateAlreadyAssigned);
    assert_eq!(record, before);
}

#[test]
fn test_assign_rate_on_sold_record_fails() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();
    record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();

    let before = record.clone();
    let err = record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(25), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap_err();

    assert_eq!(err, TransitionError::AlreadySold);
    assert_eq!(record, before);
}

#[test]
fn test_zero_rate_is_rejected() {
    let mut record = intake_record();
    let err = record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::ZERO, &rates(), Uuid::new_v4(), Utc::now())
        .unwrap_err();
    assert_eq!(err, TransitionError::InvalidRate);
    assert_eq!(record.status, LotStatus::Pending);
}

#[test]
fn test_negative_measurement_is_rejected() {
    let mut record = intake_record();
    let err = record
        .finalize_weight(kg(-5), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap_err();
    assert_eq!(err, TransitionError::InvalidQuantity);
}

#[test]
fn test_empty_measurement_is_rejected() {
    let mut record = intake_record();
    let err = record
        .finalize_weight(OfficialMeasurement::default(), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap_err();
    assert_eq!(err, TransitionError::EmptyMeasurement);
}

// ============================================================================
// Alternate sale units
// ============================================================================

#[test]
fn test_carat_sale_bills_on_carat() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Carat, Decimal::from(50), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    let outcome = record
        .finalize_weight(
            OfficialMeasurement {
                quantity_kg: Some(Decimal::from(200)),
                nag: None,
                carat: Some(Decimal::from(40)),
            },
            Uuid::new_v4(),
            &rates(),
            Utc::now(),
        )
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::Settled);
    // 40 carat x 50, not 200 kg x 50
    assert_eq!(
        record.settlement.as_ref().unwrap().base_amount,
        Decimal::from(2000)
    );
}

#[test]
fn test_carat_sale_without_carat_measurement_fails() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Carat, Decimal::from(50), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    let err = record
        .finalize_weight(kg(200), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap_err();
    assert_eq!(err, TransitionError::MissingCarat);
    // Measurement is not applied when settlement cannot be computed
    assert_eq!(record.status, LotStatus::RateAssigned);
    assert!(record.official_quantity_kg.is_none());
}

#[test]
fn test_nag_sale_bills_on_count() {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Nag, Decimal::from(15), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();

    record
        .finalize_weight(
            OfficialMeasurement {
                quantity_kg: None,
                nag: Some(120),
                carat: None,
            },
            Uuid::new_v4(),
            &rates(),
            Utc::now(),
        )
        .unwrap();

    // 120 nag x 15
    assert_eq!(
        record.settlement.as_ref().unwrap().base_amount,
        Decimal::from(1800)
    );
}

// ============================================================================
// Payment legs and the closing rule
// ============================================================================

fn settled_record() -> LotRecord {
    let mut record = intake_record();
    record
        .assign_rate(Uuid::new_v4(), SaleUnit::Kg, Decimal::from(20), &rates(), Uuid::new_v4(), Utc::now())
        .unwrap();
    record
        .finalize_weight(kg(105), Uuid::new_v4(), &rates(), Utc::now())
        .unwrap();
    record
}

#[test]
fn test_farmer_payment_alone_does_not_close_record() {
    let mut record = settled_record();

    let closed = record
        .mark_paid(SettlementParty::Farmer, PaymentMode::Cash, None, Utc::now())
        .unwrap();

    assert!(!closed);
    assert_eq!(record.farmer_payment.status, PaymentStatus::Paid);
    assert_eq!(record.payment_status, PaymentStatus::Pending);
}

#[test]
fn test_trader_payment_closes_record_regardless_of_farmer_leg() {
    let mut record = settled_record();

    let closed = record
        .mark_paid(
            SettlementParty::Trader,
            PaymentMode::Upi,
            Some("UPI-12345".to_string()),
            Utc::now(),
        )
        .unwrap();

    assert!(closed);
    assert_eq!(record.trader_payment.status, PaymentStatus::Paid);
    // Farmer leg is still open, but the record is closed
    assert_eq!(record.farmer_payment.status, PaymentStatus::Pending);
    assert_eq!(record.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_payment_stamps_mode_reference_and_date() {
    let mut record = settled_record();
    let now = Utc::now();

    record
        .mark_paid(
            SettlementParty::Trader,
            PaymentMode::Cheque,
            Some("CHQ-009".to_string()),
            now,
        )
        .unwrap();

    assert_eq!(record.trader_payment.mode, Some(PaymentMode::Cheque));
    assert_eq!(record.trader_payment.reference.as_deref(), Some("CHQ-009"));
    assert_eq!(record.trader_payment.paid_at, Some(now));
}

#[test]
fn test_marking_a_leg_paid_twice_fails() {
    let mut record = settled_record();
    record
        .mark_paid(SettlementParty::Farmer, PaymentMode::Cash, None, Utc::now())
        .unwrap();

    let before = record.clone();
    let err = record
        .mark_paid(SettlementParty::Farmer, PaymentMode::Cash, None, Utc::now())
        .unwrap_err();

    assert_eq!(
        err,
        TransitionError::AlreadyPaid {
            party: SettlementParty::Farmer
        }
    );
    assert_eq!(record, before);
}

#[test]
fn test_payment_before_settlement_fails() {
    let mut record = intake_record();
    let err = record
        .mark_paid(SettlementParty::Farmer, PaymentMode::Cash, None, Utc::now())
        .unwrap_err();
    assert_eq!(err, TransitionError::NotSettled);
}
