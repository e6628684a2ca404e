//! Branch-and-bound exact-match selection
//!
//! Searches the positive-value pool for a subset whose summed value lands in
//! `[target, target + cost_of_change]`: close enough to the target that
//! creating a change output would cost more than the overshoot it avoids.
//! Among in-window subsets the search keeps the one with the lowest waste,
//! which with no change output is the overshoot plus the spend-now fee
//! premium of the chosen inputs.

use crate::selection::group::OutputGroup;
use crate::selection::result::{Algorithm, SelectionResult};
use crate::types::SelectionError;
use log::debug;
use std::cmp::Reverse;

/// Node budget for the depth-first search
pub const TOTAL_TRIES: u32 = 100_000;

/// Select coins with the branch-and-bound exact-match search.
///
/// # Arguments
/// * `utxo_pool` - Eligible groups with positive selection amounts
/// * `target` - Value to cover, in satoshis; must be positive
/// * `cost_of_change` - Largest acceptable overshoot, in satoshis
///
/// # Failures
/// * `InsufficientFunds` - the pool sums below the target
/// * `NoSolutionWithinTolerance` - no subset lands inside the window
/// * `SearchExhausted` - the node budget ran out before any solution
pub fn select_coins_bnb(
    utxo_pool: &[OutputGroup],
    target: u64,
    cost_of_change: u64,
) -> Result<SelectionResult, SelectionError> {
    if target == 0 {
        return Err(SelectionError::InvalidParameters(
            "selection target must be positive".to_string(),
        ));
    }

    let available: i64 = utxo_pool
        .iter()
        .fold(0i64, |acc, g| acc.saturating_add(g.selection_amount()));
    if available < target as i64 {
        return Err(SelectionError::InsufficientFunds {
            available: available.max(0) as u64,
            required: target,
        });
    }

    let mut pool: Vec<&OutputGroup> = utxo_pool.iter().collect();
    pool.sort_by_key(|g| Reverse(g.selection_amount()));

    let mut search = Search {
        pool: &pool,
        target: target as i64,
        upper_bound: (target as i64).saturating_add(cost_of_change as i64),
        tries: TOTAL_TRIES,
        best: None,
        best_waste: i64::MAX,
        // Waste only ever grows with inclusion when current fees are at or
        // above the long-term rate; pruning on it otherwise discards valid
        // improvements.
        prune_on_waste: pool.iter().all(|g| g.fee_excess() >= 0),
        exhausted: false,
        done: false,
    };
    let mut selection: Vec<usize> = Vec::new();
    search.explore(0, &mut selection, 0, 0, available);

    let nodes_used = TOTAL_TRIES - search.tries;
    match search.best {
        Some(best) => {
            debug!(
                "bnb found {} inputs with waste {} after {} nodes",
                best.len(),
                search.best_waste,
                nodes_used
            );
            let mut result = SelectionResult::new(target, Algorithm::Bnb);
            for index in best {
                result.add_input(pool[index])?;
            }
            Ok(result)
        }
        None if search.exhausted => {
            debug!("bnb exhausted its node budget over {} groups", pool.len());
            Err(SelectionError::SearchExhausted)
        }
        None => Err(SelectionError::NoSolutionWithinTolerance),
    }
}

struct Search<'a> {
    pool: &'a [&'a OutputGroup],
    target: i64,
    upper_bound: i64,
    tries: u32,
    best: Option<Vec<usize>>,
    best_waste: i64,
    prune_on_waste: bool,
    exhausted: bool,
    done: bool,
}

impl Search<'_> {
    /// Depth-first walk of the inclusion tree.
    ///
    /// `value` and `waste` describe the current partial selection;
    /// `remaining` is the summed amount of the not-yet-visited tail.
    fn explore(
        &mut self,
        depth: usize,
        selection: &mut Vec<usize>,
        value: i64,
        waste: i64,
        remaining: i64,
    ) {
        if self.done {
            return;
        }
        // The tail cannot reach the target from here.
        if value.saturating_add(remaining) < self.target {
            return;
        }
        // Overshot the window.
        if value > self.upper_bound {
            return;
        }
        // A known solution already beats everything below this node.
        if self.prune_on_waste && self.best.is_some() && waste > self.best_waste {
            return;
        }
        if value >= self.target {
            // In range. Adding further inputs past the target only burns
            // value, so record and turn back.
            let total_waste = waste.saturating_add(value - self.target);
            if total_waste < self.best_waste {
                self.best_waste = total_waste;
                self.best = Some(selection.clone());
                if total_waste == 0 && self.prune_on_waste {
                    self.done = true;
                }
            }
            return;
        }
        if depth == self.pool.len() {
            return;
        }
        if self.tries == 0 {
            self.exhausted = true;
            self.done = true;
            return;
        }
        self.tries -= 1;

        let amount = self.pool[depth].selection_amount();
        // A skipped twin of equal amount and fee already covered the
        // subsets this inclusion would generate.
        let duplicate_branch = depth > 0
            && selection.last() != Some(&(depth - 1))
            && self.pool[depth - 1].selection_amount() == amount
            && self.pool[depth - 1].fee == self.pool[depth].fee;

        if !duplicate_branch {
            selection.push(depth);
            self.explore(
                depth + 1,
                selection,
                value.saturating_add(amount),
                waste.saturating_add(self.pool[depth].fee_excess()),
                remaining - amount,
            );
            selection.pop();
            if self.done {
                return;
            }
        }
        self.explore(depth + 1, selection, value, waste, remaining - amount);
    }
}
