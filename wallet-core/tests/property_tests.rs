//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Conservation: a transfer debits exactly `amount + fee` and credits
//!   exactly `amount`
//! - Fee rounding: the fee never undershoots the configured percentage
//! - Unit conversion: satoshi amounts survive the BTC round trip

use proptest::prelude::*;
use wallet_core::units::{btc_to_satoshi, satoshi_to_btc, transfer_fee, SATOSHIS_PER_BITCOIN};

proptest! {
    /// The fee is the smallest whole satoshi amount covering the
    /// configured percentage.
    #[test]
    fn fee_covers_percentage(amount in 1i64..10 * SATOSHIS_PER_BITCOIN) {
        let fee = transfer_fee(amount, 1.5);
        let exact = amount as f64 * 0.015;
        prop_assert!(fee as f64 >= exact);
        prop_assert!((fee - 1) as f64 <= exact);
    }

    /// A positive cross-user amount always pays at least one satoshi.
    #[test]
    fn fee_never_zero_for_positive_amount(amount in 1i64..SATOSHIS_PER_BITCOIN) {
        prop_assert!(transfer_fee(amount, 1.5) >= 1);
    }

    /// Debit and credit stay conserved: what the source loses equals the
    /// transferred amount plus the platform's profit.
    #[test]
    fn transfer_conserves_money(
        amount in 1i64..SATOSHIS_PER_BITCOIN,
        fee_percent in 0.0f64..5.0,
    ) {
        let fee = transfer_fee(amount, fee_percent);
        let debited = amount + fee;
        let credited = amount;
        prop_assert_eq!(debited - credited, fee);
        prop_assert!(fee >= 0);
    }

    /// Satoshi amounts below ~90 BTC convert to BTC and back without
    /// loss (f64 has 53 bits of mantissa, amounts here fit easily).
    #[test]
    fn satoshi_btc_round_trip(satoshi in 0i64..90 * SATOSHIS_PER_BITCOIN) {
        prop_assert_eq!(btc_to_satoshi(satoshi_to_btc(satoshi)), satoshi);
    }
}
