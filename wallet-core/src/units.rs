//! Satoshi/BTC unit conversions and fee arithmetic

/// Satoshi per bitcoin.
pub const SATOSHIS_PER_BITCOIN: i64 = 100_000_000;

/// Convert a BTC amount to satoshi, rounding to the nearest unit.
///
/// Amounts beyond the i64 range saturate at the range bounds; a NaN input
/// maps to zero. Callers reject amounts the ledger cannot hold.
pub fn btc_to_satoshi(btc: f64) -> i64 {
    (btc * SATOSHIS_PER_BITCOIN as f64).round() as i64
}

/// Convert a satoshi amount to BTC.
pub fn satoshi_to_btc(satoshi: i64) -> f64 {
    satoshi as f64 / SATOSHIS_PER_BITCOIN as f64
}

/// Fee on a transferred amount, rounded up to the next whole satoshi.
///
/// Any positive amount therefore pays at least one satoshi when the fee
/// percentage is positive.
pub fn transfer_fee(amount: i64, fee_percent: f64) -> i64 {
    (amount as f64 * fee_percent / 100.0).ceil() as i64
}
