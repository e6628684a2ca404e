//! Single-random-draw selection
//!
//! Walks a uniform random permutation of the positive-value pool and
//! accumulates groups until the target is covered. No optimization at all,
//! and that is the point: the chosen set carries no fingerprint of a
//! selection heuristic, at the price of a higher expected waste than the
//! exact-match search.

use crate::selection::group::OutputGroup;
use crate::selection::result::{Algorithm, SelectionResult};
use crate::types::SelectionError;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Select coins by accumulating a random permutation of the pool.
///
/// # Arguments
/// * `utxo_pool` - Eligible groups with positive selection amounts
/// * `target` - Value to cover, in satoshis; already includes the expected
///   change amount and non-input fees
/// * `rng` - Randomness for the permutation
pub fn select_coins_srd(
    utxo_pool: &[OutputGroup],
    target: u64,
    rng: &mut impl Rng,
) -> Result<SelectionResult, SelectionError> {
    if target == 0 {
        return Err(SelectionError::InvalidParameters(
            "selection target must be positive".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..utxo_pool.len()).collect();
    order.shuffle(rng);

    let mut result = SelectionResult::new(target, Algorithm::Srd);
    let mut value: i64 = 0;
    for index in order {
        let group = &utxo_pool[index];
        result.add_input(group)?;
        value = value.saturating_add(group.selection_amount());
        if value >= target as i64 {
            debug!(
                "srd covered {} sat with {} inputs",
                target,
                result.input_count()
            );
            return Ok(result);
        }
    }

    Err(SelectionError::InsufficientFunds {
        available: value.max(0) as u64,
        required: target,
    })
}
