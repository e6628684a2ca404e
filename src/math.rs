//! Fee arithmetic for coin selection
//!
//! Fee rates are expressed in satoshis per virtual byte. Multiplication goes
//! through `rust_decimal` so large sizes do not accumulate float error, and
//! results round up: a selection must never underpay its feerate.
//!
//! All value arithmetic in the selection core runs on `i64` satoshis with
//! saturating operations; a fee-heavy output may legitimately be worth less
//! than it costs to spend, which is why effective values are signed.

use crate::types::DUST_THRESHOLD;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Fee to pay for `vsize` virtual bytes at `fee_rate` sat/vB, rounded up.
pub fn fee_for_vsize(vsize: u64, fee_rate: f32) -> u64 {
    let rate = Decimal::from_f32(fee_rate).unwrap_or(Decimal::ONE);
    let fee = rate * Decimal::from(vsize);
    fee.ceil().to_u64().unwrap_or(0)
}

/// Value of a UTXO after deducting the fee to spend it at `fee_rate`.
///
/// Negative results mark dust: the output costs more to spend than it holds.
pub fn effective_value(value: u64, input_vsize: u64, fee_rate: f32) -> i64 {
    let fee = fee_for_vsize(input_vsize, fee_rate);
    (value as i64).saturating_sub(fee as i64)
}

/// Minimum change amount worth creating at `fee_rate` for an output of
/// `output_size` virtual bytes.
///
/// Anything below the fee to create the output plus the dust threshold would
/// cost more than it returns.
pub fn min_economical_change(fee_rate: f32, output_size: usize) -> u64 {
    let output_fee = fee_for_vsize(output_size as u64, fee_rate);
    DUST_THRESHOLD + output_fee
}
