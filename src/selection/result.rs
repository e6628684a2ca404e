//! Selection results
//!
//! A [`SelectionResult`] is what a solver hands back: the set of chosen
//! candidates (as pool indices), the target it solved for, its algorithm
//! tag, and the aggregates the caller needs to price and assemble the
//! transaction. Results from disjoint pools can be merged; results sharing
//! an outpoint refuse to combine.

use crate::selection::group::OutputGroup;
use crate::selection::types::CandidatePool;
use crate::types::SelectionError;
use bitcoin::OutPoint;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// The algorithm that produced a selection result.
///
/// A closed set: callers invoke solvers directly and branch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Branch-and-bound exact-match search
    Bnb,
    /// Knapsack stochastic approximation
    Knapsack,
    /// Single random draw
    Srd,
    /// Inputs chosen by the user
    Manual,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Bnb => "bnb",
            Algorithm::Knapsack => "knapsack",
            Algorithm::Srd => "srd",
            Algorithm::Manual => "manual",
        };
        write!(f, "{}", name)
    }
}

/// The outcome of one selection algorithm run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    /// Pool indices of the selected candidates
    selected: BTreeSet<usize>,
    /// The target the algorithm selected for, in satoshis
    target: u64,
    /// The algorithm that produced this result
    algorithm: Algorithm,
    /// Whether effective value (true) or gross value (false) is authoritative
    use_effective: bool,
    /// Waste, cached once computed
    waste: Option<i64>,
    /// Summed input size of the selected candidates, in virtual bytes
    weight: u64,
    /// Summed gross value, in satoshis
    value: u64,
    /// Summed effective value, in satoshis
    effective_value: i64,
    /// Summed fee at the effective feerate, in satoshis
    fee: u64,
    /// Summed fee at the long-term feerate, in satoshis
    long_term_fee: u64,
}

impl SelectionResult {
    /// Create an empty result for the given target and algorithm
    pub fn new(target: u64, algorithm: Algorithm) -> Self {
        Self {
            selected: BTreeSet::new(),
            target,
            algorithm,
            use_effective: false,
            waste: None,
            weight: 0,
            value: 0,
            effective_value: 0,
            fee: 0,
            long_term_fee: 0,
        }
    }

    /// Add a group's candidates to this result.
    ///
    /// Fails with [`SelectionError::ResultConflict`] if any member is
    /// already selected. The result's value mode follows the group's
    /// fee-subtraction flag.
    pub fn add_input(&mut self, group: &OutputGroup) -> Result<(), SelectionError> {
        for index in group.indices() {
            if self.selected.contains(index) {
                return Err(SelectionError::ResultConflict);
            }
        }
        self.selected.extend(group.indices().iter().copied());
        self.use_effective = !group.subtract_fee_outputs;
        self.weight = self.weight.saturating_add(group.weight);
        self.value = self.value.saturating_add(group.value);
        self.effective_value = self.effective_value.saturating_add(group.effective_value);
        self.fee = self.fee.saturating_add(group.fee);
        self.long_term_fee = self.long_term_fee.saturating_add(group.long_term_fee);
        self.waste = None;
        Ok(())
    }

    /// Combine another result into this one.
    ///
    /// Targets sum; this result's algorithm tag is retained unless it is
    /// `Manual`, in which case the other tag takes over. Fails with
    /// [`SelectionError::ResultConflict`] if the two results share any
    /// selected outpoint; nothing is modified in that case.
    pub fn merge(&mut self, other: &SelectionResult) -> Result<(), SelectionError> {
        if !self.selected.is_disjoint(&other.selected) {
            return Err(SelectionError::ResultConflict);
        }
        self.selected.extend(other.selected.iter().copied());
        self.target = self.target.saturating_add(other.target);
        if self.algorithm == Algorithm::Manual {
            self.algorithm = other.algorithm;
        }
        self.use_effective |= other.use_effective;
        self.weight = self.weight.saturating_add(other.weight);
        self.value = self.value.saturating_add(other.value);
        self.effective_value = self.effective_value.saturating_add(other.effective_value);
        self.fee = self.fee.saturating_add(other.fee);
        self.long_term_fee = self.long_term_fee.saturating_add(other.long_term_fee);
        self.waste = None;
        Ok(())
    }

    /// Change amount after fees, in satoshis.
    ///
    /// Selected value beyond the target and the change fee, clamped to zero
    /// when it falls below `min_viable_change`; such residue is absorbed as
    /// fee instead of becoming an output.
    pub fn change(&self, min_viable_change: u64, change_fee: u64) -> u64 {
        let selected = if self.use_effective {
            self.effective_value
        } else {
            self.value as i64
        };
        let change = selected
            .saturating_sub(self.target as i64)
            .saturating_sub(change_fee as i64);
        let floor = i64::try_from(min_viable_change).unwrap_or(i64::MAX);
        if change < floor {
            return 0;
        }
        change as u64
    }

    /// Compute and cache the waste of this result.
    ///
    /// When the change budget falls below `min_viable_change` the no-change
    /// branch applies and the excess is counted as burned fee; otherwise the
    /// supplied `change_cost` is charged.
    pub fn compute_waste(
        &mut self,
        min_viable_change: u64,
        change_cost: u64,
        change_fee: u64,
    ) -> i64 {
        let fee_excess = (self.fee as i64).saturating_sub(self.long_term_fee as i64);
        let change = self.change(min_viable_change, change_fee);
        let waste = if change > 0 {
            fee_excess.saturating_add(change_cost as i64)
        } else {
            let selected = if self.use_effective {
                self.effective_value
            } else {
                self.value as i64
            };
            fee_excess.saturating_add(selected.saturating_sub(self.target as i64))
        };
        self.waste = Some(waste);
        waste
    }

    /// The cached waste, if [`Self::compute_waste`] has run
    pub fn waste(&self) -> Option<i64> {
        self.waste
    }

    /// Order results by (waste ascending, selected effective value descending).
    ///
    /// Results without a computed waste sort last.
    pub fn cmp_by_waste(&self, other: &SelectionResult) -> Ordering {
        let own = self.waste.unwrap_or(i64::MAX);
        let theirs = other.waste.unwrap_or(i64::MAX);
        own.cmp(&theirs)
            .then_with(|| other.effective_value.cmp(&self.effective_value))
    }

    /// Pool indices of the selected candidates, in outpoint-stable order
    pub fn indices(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Resolve the selected candidates to their outpoints
    pub fn outpoints(&self, pool: &CandidatePool) -> Vec<OutPoint> {
        self.selected
            .iter()
            .filter_map(|&index| pool.candidate(index))
            .map(|candidate| candidate.outpoint)
            .collect()
    }

    /// Selected indices in a fresh random order, for transaction assembly
    pub fn shuffled_input_vector(&self, rng: &mut impl Rng) -> Vec<usize> {
        let mut inputs: Vec<usize> = self.selected.iter().copied().collect();
        inputs.shuffle(rng);
        inputs
    }

    /// The target this result was solved for, in satoshis
    pub fn target(&self) -> u64 {
        self.target
    }

    /// The algorithm that produced this result
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether effective value is the authoritative value notion
    pub fn uses_effective_value(&self) -> bool {
        self.use_effective
    }

    /// Summed input size of the selected candidates, in virtual bytes
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Summed gross value of the selected candidates, in satoshis
    pub fn selected_value(&self) -> u64 {
        self.value
    }

    /// Summed effective value of the selected candidates, in satoshis
    pub fn selected_effective_value(&self) -> i64 {
        self.effective_value
    }

    /// Number of selected candidates
    pub fn input_count(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing has been selected yet
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
