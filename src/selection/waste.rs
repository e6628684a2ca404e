//! The waste objective and the change-target oracle
//!
//! Waste prices a selection in satoshis so results from different algorithms
//! compare on one axis. It has two parts: the opportunity cost of spending
//! the chosen inputs now instead of at the long-term feerate, and either the
//! cost of creating-then-spending a change output or the overshoot burned as
//! fee when no change is made.
//!
//! The change-target oracle randomizes the change amount a selection aims
//! for, so that the wallet's change outputs do not cluster at a telltale
//! size.

use crate::selection::types::Candidate;
use rand::Rng;

/// Lower bound for the randomly-chosen target change amount, in satoshis
pub const CHANGE_LOWER: u64 = 50_000;

/// Upper bound for the randomly-chosen target change amount, in satoshis
pub const CHANGE_UPPER: u64 = 1_000_000;

/// Compute the waste of spending `inputs` to cover `target`.
///
/// With change (`change_cost > 0`):
/// `waste = change_cost + sum(fee - long_term_fee)`.
/// Without change (`change_cost == 0`):
/// `waste = excess + sum(fee - long_term_fee)`, where `excess` is the
/// selected value beyond the target.
///
/// `change_cost` must be zero exactly when the selection makes no change;
/// the caller owns that contract. Waste can be negative when the long-term
/// feerate exceeds the current one: spending now is then a bargain.
///
/// # Arguments
/// * `inputs` - The selected candidates
/// * `change_cost` - Cost of creating and later spending change; 0 for none
/// * `target` - The value the selection had to cover, in satoshis
/// * `use_effective_value` - Whether selected value means effective or gross
pub fn selection_waste<'a, I>(
    inputs: I,
    change_cost: i64,
    target: u64,
    use_effective_value: bool,
) -> i64
where
    I: IntoIterator<Item = &'a Candidate>,
{
    debug_assert!(change_cost >= 0, "change cost cannot be negative");

    let mut waste: i64 = 0;
    let mut selected: i64 = 0;
    for input in inputs {
        waste = waste.saturating_add(input.fee_excess());
        let value = if use_effective_value {
            input.effective_value().to_sat()
        } else {
            input.value.to_sat() as i64
        };
        selected = selected.saturating_add(value);
    }

    if change_cost > 0 {
        waste = waste.saturating_add(change_cost);
    } else {
        let excess = selected.saturating_sub(target as i64);
        debug_assert!(excess >= 0, "selection does not cover its target");
        waste = waste.saturating_add(excess);
    }
    waste
}

/// Draw a randomized change target for a payment.
///
/// Returns `change_fee` plus a uniform draw from
/// `[CHANGE_LOWER, min(2 * payment_value, CHANGE_UPPER)]`. Payments at or
/// below half of `CHANGE_LOWER` skip the draw and use `CHANGE_LOWER`
/// directly; change near their size would hide nothing.
///
/// Change drawn from the payment's own magnitude defeats the
/// smallest-output-is-change and unnecessary-input heuristics.
pub fn generate_change_target(
    payment_value: u64,
    change_fee: u64,
    rng: &mut impl Rng,
) -> u64 {
    if payment_value <= CHANGE_LOWER / 2 {
        return change_fee.saturating_add(CHANGE_LOWER);
    }
    let upper = payment_value.saturating_mul(2).min(CHANGE_UPPER);
    change_fee.saturating_add(rng.gen_range(CHANGE_LOWER..=upper))
}
