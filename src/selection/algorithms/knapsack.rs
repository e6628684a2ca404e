//! Knapsack selection with stochastic approximation
//!
//! The fallback solver. It aims past the target by a change budget so the
//! transaction can pay for a change output, scans for trivial answers (an
//! exact single match, or nothing-but-a-larger-coin), and otherwise runs a
//! randomized subset search over the coins smaller than the goal, keeping
//! the combination that overshoots least. A single larger coin wins only if
//! it overshoots strictly less than the best combination found.

use crate::selection::group::OutputGroup;
use crate::selection::result::{Algorithm, SelectionResult};
use crate::types::SelectionError;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;

/// Repetitions of the two-pass Bernoulli sampling
pub const ITERATIONS: u32 = 1_000;

/// Select coins with the knapsack approximation.
///
/// # Arguments
/// * `groups` - Eligible groups; may mix positive and negative amounts
/// * `target` - Value to cover, in satoshis; must be positive
/// * `change_target` - Change budget to aim for on top of the target
/// * `rng` - Randomness for the shuffle and the sampling passes
pub fn select_coins_knapsack(
    groups: &[OutputGroup],
    target: u64,
    change_target: u64,
    rng: &mut impl Rng,
) -> Result<SelectionResult, SelectionError> {
    if target == 0 {
        return Err(SelectionError::InvalidParameters(
            "selection target must be positive".to_string(),
        ));
    }
    let effective_target = (target as i64).saturating_add(change_target as i64);

    let mut result = SelectionResult::new(target, Algorithm::Knapsack);

    let mut shuffled: Vec<&OutputGroup> = groups.iter().collect();
    shuffled.shuffle(rng);

    let mut lowest_larger: Option<&OutputGroup> = None;
    let mut applicable: Vec<&OutputGroup> = Vec::new();
    let mut total_lower: i64 = 0;

    for group in shuffled {
        let amount = group.selection_amount();
        if amount == effective_target {
            result.add_input(group)?;
            return Ok(result);
        } else if amount < effective_target {
            applicable.push(group);
            total_lower = total_lower.saturating_add(amount);
        } else if lowest_larger.map_or(true, |ll| amount < ll.selection_amount()) {
            lowest_larger = Some(group);
        }
    }

    if total_lower == effective_target {
        for group in &applicable {
            result.add_input(group)?;
        }
        return Ok(result);
    }

    if total_lower < effective_target {
        if let Some(larger) = lowest_larger {
            result.add_input(larger)?;
            return Ok(result);
        }
        return Err(SelectionError::InsufficientFunds {
            available: total_lower.max(0) as u64,
            required: effective_target.max(0) as u64,
        });
    }

    applicable.sort_by_key(|g| Reverse(g.selection_amount()));
    let (best_set, best_value) =
        approximate_best_subset(&applicable, total_lower, effective_target, rng);

    // The single larger coin wins only on a strictly smaller overshoot;
    // a tie keeps the combination and preserves the large coin for later.
    if let Some(larger) = lowest_larger {
        if larger.selection_amount() < best_value {
            result.add_input(larger)?;
            return Ok(result);
        }
    }
    for (include, group) in best_set.iter().zip(&applicable) {
        if *include {
            result.add_input(group)?;
        }
    }
    debug!(
        "knapsack reached {} sat of {} sat goal with {} inputs",
        best_value,
        effective_target,
        result.input_count()
    );
    Ok(result)
}

/// Randomized subset-sum search over coins smaller than the goal.
///
/// Each repetition makes two passes: the first includes each coin with
/// probability one half, the second picks up whatever the first left out.
/// Whenever the running sum crosses the goal the crossing coin is backed out
/// again, so every subset evaluated is a minimal cover for its path.
fn approximate_best_subset(
    groups: &[&OutputGroup],
    total_lower: i64,
    target: i64,
    rng: &mut impl Rng,
) -> (Vec<bool>, i64) {
    let mut best = vec![true; groups.len()];
    let mut best_value = total_lower;

    for _ in 0..ITERATIONS {
        if best_value == target {
            break;
        }
        let mut included = vec![false; groups.len()];
        let mut total: i64 = 0;
        let mut reached = false;
        for pass in 0..2 {
            if reached {
                break;
            }
            for (i, group) in groups.iter().enumerate() {
                // Random inclusion order keeps fragmented wallets from
                // degenerating into the same subset every repetition.
                let toss = if pass == 0 {
                    rng.gen_bool(0.5)
                } else {
                    !included[i]
                };
                if toss {
                    total = total.saturating_add(group.selection_amount());
                    included[i] = true;
                    if total >= target {
                        reached = true;
                        if total < best_value {
                            best_value = total;
                            best.copy_from_slice(&included);
                        }
                        total = total.saturating_sub(group.selection_amount());
                        included[i] = false;
                    }
                }
            }
        }
    }

    (best, best_value)
}
