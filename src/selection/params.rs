//! Per-call configuration for coin selection
//!
//! A [`SelectionParams`] value carries everything one selection attempt
//! needs beyond the candidate pool itself: the two feerates, the size and
//! cost figures for a prospective change output, and the behavioral flags.
//! It is plain data; the randomness source is threaded separately through
//! every call that draws from it.

use crate::math;
use crate::types::{SelectionError, MIN_FINAL_CHANGE};

/// Parameters for one coin selection attempt.
#[derive(Debug, Clone)]
pub struct SelectionParams {
    /// Effective feerate in sat/vB; fees and effective values derive from it
    pub effective_feerate: f32,
    /// Long-term feerate in sat/vB; values deferred spending
    pub long_term_feerate: f32,
    /// Size of a change output, in virtual bytes
    pub change_output_size: u64,
    /// Size of the input that later spends the change output, in virtual bytes
    pub change_spend_size: u64,
    /// Size of the transaction before inputs and change, in virtual bytes
    pub tx_noinputs_size: u64,
    /// Minimum change to aim for in the knapsack solver, in satoshis
    pub min_change_target: u64,
    /// Change below this is forgone and absorbed as fee, in satoshis
    pub min_viable_change: u64,
    /// Fee for creating the change output, in satoshis
    pub change_fee: u64,
    /// Fee for creating the change output plus spending it later, in satoshis
    pub cost_of_change: u64,
    /// Whether fees are subtracted from the recipient outputs
    pub subtract_fee_outputs: bool,
    /// Whether outputs sharing a script must be spent together
    pub avoid_partial_spends: bool,
    /// Whether unsafe (unconfirmed foreign) outputs may be selected
    pub include_unsafe_inputs: bool,
    /// Pass-through hint to skip the transaction weight check downstream.
    /// Has no effect on selection arithmetic.
    pub coinstake: bool,
}

impl SelectionParams {
    /// Derive a parameter set from feerates and change-output sizing.
    ///
    /// The change fee is the cost of creating the change output at the
    /// effective feerate; the cost of change adds what spending it later at
    /// the long-term feerate will cost.
    pub fn new(
        effective_feerate: f32,
        long_term_feerate: f32,
        change_output_size: u64,
        change_spend_size: u64,
        tx_noinputs_size: u64,
    ) -> Result<Self, SelectionError> {
        if effective_feerate < 0.0 || long_term_feerate < 0.0 {
            return Err(SelectionError::InvalidParameters(
                "feerates must be non-negative".to_string(),
            ));
        }
        let change_fee = math::fee_for_vsize(change_output_size, effective_feerate);
        let change_spend_fee = math::fee_for_vsize(change_spend_size, long_term_feerate);
        let cost_of_change = change_fee.saturating_add(change_spend_fee);

        Ok(Self {
            effective_feerate,
            long_term_feerate,
            change_output_size,
            change_spend_size,
            tx_noinputs_size,
            min_change_target: MIN_FINAL_CHANGE,
            min_viable_change: MIN_FINAL_CHANGE,
            change_fee,
            cost_of_change,
            subtract_fee_outputs: false,
            avoid_partial_spends: false,
            include_unsafe_inputs: false,
            coinstake: false,
        })
    }

    /// Set the knapsack change target, usually from the change-target oracle
    pub fn with_min_change_target(mut self, min_change_target: u64) -> Self {
        self.min_change_target = min_change_target;
        self
    }

    /// Set the threshold under which change is forgone
    pub fn with_min_viable_change(mut self, min_viable_change: u64) -> Self {
        self.min_viable_change = min_viable_change;
        self
    }

    /// Subtract fees from the recipient outputs instead of adding them on top
    pub fn subtracting_fee_from_outputs(mut self) -> Self {
        self.subtract_fee_outputs = true;
        self
    }

    /// Spend all outputs paid to the same script together
    pub fn avoiding_partial_spends(mut self) -> Self {
        self.avoid_partial_spends = true;
        self
    }

    /// Allow unsafe outputs into the candidate groups
    pub fn including_unsafe_inputs(mut self) -> Self {
        self.include_unsafe_inputs = true;
        self
    }

    /// Fee for the fixed, no-input part of the transaction, in satoshis
    pub fn non_input_fee(&self) -> u64 {
        math::fee_for_vsize(self.tx_noinputs_size, self.effective_feerate)
    }
}
