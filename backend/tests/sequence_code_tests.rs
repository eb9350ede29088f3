//! Sequence code formatting tests
//!
//! The numeric suffix comes from the database counter; formatting is pure
//! and covered here: prefixes, zero-pad widths, year scoping, and the
//! role-to-prefix mapping for profiles.

use std::collections::HashSet;

use proptest::prelude::*;

use shared::{format_code, SequenceKind, UserRole};

#[test]
fn test_lot_code_format() {
    assert_eq!(format_code(&SequenceKind::Lot, 2026, 1), "LOT-2026-001");
    assert_eq!(format_code(&SequenceKind::Lot, 2026, 42), "LOT-2026-042");
    assert_eq!(format_code(&SequenceKind::Lot, 2026, 1234), "LOT-2026-1234");
}

#[test]
fn test_transaction_code_format() {
    assert_eq!(
        format_code(&SequenceKind::Transaction, 2026, 314),
        "TXN-2026-000314"
    );
}

#[test]
fn test_bill_code_formats() {
    assert_eq!(
        format_code(&SequenceKind::FarmerBill, 2026, 7),
        "FB-2026-00007"
    );
    assert_eq!(
        format_code(&SequenceKind::TraderBill, 2026, 7),
        "TB-2026-00007"
    );
}

#[test]
fn test_role_prefixes() {
    let cases = [
        (UserRole::Trader, "TRD-2026-014"),
        (UserRole::Admin, "ADM-2026-014"),
        (UserRole::Committee, "MCDB-2026-014"),
        (UserRole::Auctioneer, "LLV-2026-014"),
    ];
    for (role, expected) in cases {
        let kind = SequenceKind::for_role(role).expect("privileged role has a code");
        assert_eq!(format_code(&kind, 2026, 14), expected);
    }
}

#[test]
fn test_unprivileged_roles_have_no_code() {
    assert!(SequenceKind::for_role(UserRole::Farmer).is_none());
    assert!(SequenceKind::for_role(UserRole::WeighingStaff).is_none());
    assert!(SequenceKind::for_role(UserRole::Accountant).is_none());
}

#[test]
fn test_counter_keys_are_distinct() {
    let kinds = [
        SequenceKind::Lot,
        SequenceKind::Transaction,
        SequenceKind::FarmerBill,
        SequenceKind::TraderBill,
        SequenceKind::Profile(UserRole::Trader),
        SequenceKind::Profile(UserRole::Committee),
    ];
    let keys: HashSet<String> = kinds.iter().map(|k| k.counter_key()).collect();
    assert_eq!(keys.len(), kinds.len());
}

proptest! {
    /// Codes are unique across kinds, years, and sequence numbers
    #[test]
    fn test_codes_are_unique(
        entries in prop::collection::hash_set((2020..=2030i32, 1..=99_999i64), 10..100)
    ) {
        for kind in [
            SequenceKind::Lot,
            SequenceKind::Transaction,
            SequenceKind::FarmerBill,
            SequenceKind::TraderBill,
        ] {
            let codes: HashSet<String> = entries
                .iter()
                .map(|(year, seq)| format_code(&kind, *year, *seq))
                .collect();
            prop_assert_eq!(codes.len(), entries.len());
        }
    }

    /// The numeric suffix always parses back to the sequence number
    #[test]
    fn test_suffix_round_trips(year in 2020..=2030i32, seq in 1..=999_999i64) {
        let code = format_code(&SequenceKind::Transaction, year, seq);
        let suffix = code.rsplit('-').next().unwrap();
        prop_assert_eq!(suffix.parse::<i64>().unwrap(), seq);
    }
}
