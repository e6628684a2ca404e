//! Coin selection subsystem
//!
//! This module composes the data model and the three solvers into the entry
//! points a wallet actually calls:
//!
//! - [`select_coins`]: run every applicable solver over one pool of groups
//!   and keep the lowest-waste success
//! - [`attempt_selection`]: walk a filter ladder from strictest to loosest,
//!   trying same-kind pools before the mixed-kind union at each rung
//! - [`standard_filter_ladder`]: the ladder a wallet uses by default
//!
//! # Usage
//!
//! ```no_run
//! use coinselect::selection::{self, SelectionParams};
//! use coinselect::selection::types::CandidatePool;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let pool = CandidatePool::new();
//! let params = SelectionParams::new(2.0, 1.0, 31, 68, 11).unwrap();
//! let filters = selection::standard_filter_ladder(25, 25);
//! let catalogs = selection::group_candidates(&pool, &params, &filters, 10);
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let result = selection::attempt_selection(
//!     &pool, &catalogs, &filters, 50_000, &params, &mut rng, None,
//! );
//! ```
//!
//! Selection is purely computational: no I/O, no shared state, and the only
//! nondeterminism is the caller's RNG.

pub mod algorithms;
pub mod group;
pub mod params;
pub mod result;
pub mod types;
pub mod waste;

pub use algorithms::{select_coins_bnb, select_coins_knapsack, select_coins_srd};
pub use algorithms::{ITERATIONS, TOTAL_TRIES};
pub use group::{
    group_candidates, EligibilityFilter, FilteredGroups, GroupCatalog, Groups, OutputGroup,
    OutputKind,
};
pub use params::SelectionParams;
pub use result::{Algorithm, SelectionResult};
pub use types::{Candidate, CandidatePool};
pub use waste::{generate_change_target, selection_waste, CHANGE_LOWER, CHANGE_UPPER};

use crate::events::{OutPointInfo, SelectionEvent, SelectionEventBus};
use crate::logging::sanitize_for_logging;
use crate::types::SelectionError;
use log::debug;
use rand::Rng;

/// Run every applicable solver over one pool of groups and keep the best.
///
/// Branch-and-bound searches the positive groups for a changeless match
/// inside the cost-of-change window; knapsack works the mixed groups toward
/// the target plus the change fee, aiming for at least the minimum change
/// target; single random draw covers the target plus change fee plus the
/// change floor from the positive groups. Each success gets its waste
/// computed and the minimum by (waste, then effective value) wins.
///
/// Callers typically seed `params.min_change_target` from
/// [`generate_change_target`] so the knapsack's change lands in a
/// randomized band rather than a fingerprintable one.
///
/// When nothing succeeds, insufficient funds is reported if any solver ran
/// out of pool; otherwise the exact-match failure is passed through.
pub fn select_coins(
    pool: &CandidatePool,
    groups: &Groups,
    target: u64,
    params: &SelectionParams,
    rng: &mut impl Rng,
    bus: Option<&SelectionEventBus>,
) -> Result<SelectionResult, SelectionError> {
    if target == 0 {
        return Err(SelectionError::InvalidParameters(
            "selection target must be positive".to_string(),
        ));
    }

    let mut candidates: Vec<SelectionResult> = Vec::new();
    let mut failures: Vec<SelectionError> = Vec::new();

    match select_coins_bnb(&groups.positive, target, params.cost_of_change) {
        Ok(result) => candidates.push(result),
        Err(e) => failures.push(e),
    }

    let knapsack_target = target.saturating_add(params.change_fee);
    match select_coins_knapsack(&groups.mixed, knapsack_target, params.min_change_target, rng) {
        Ok(result) => candidates.push(result),
        Err(e) => failures.push(e),
    }

    let srd_target = target
        .saturating_add(params.change_fee)
        .saturating_add(CHANGE_LOWER);
    match select_coins_srd(&groups.positive, srd_target, rng) {
        Ok(result) => candidates.push(result),
        Err(e) => failures.push(e),
    }

    for result in &mut candidates {
        result.compute_waste(params.min_viable_change, params.cost_of_change, params.change_fee);
    }
    candidates.sort_by(|a, b| a.cmp_by_waste(b));

    match candidates.into_iter().next() {
        Some(best) => {
            let chosen: Vec<String> = best
                .outpoints(pool)
                .iter()
                .map(|outpoint| {
                    format!(
                        "{}:{}",
                        sanitize_for_logging(&outpoint.txid.to_string()),
                        outpoint.vout
                    )
                })
                .collect();
            debug!(
                "selection won by {} with waste {:?} using [{}]",
                best.algorithm(),
                best.waste(),
                chosen.join(", ")
            );
            if let Some(bus) = bus {
                bus.publish(SelectionEvent::Completed {
                    inputs: best
                        .outpoints(pool)
                        .iter()
                        .map(OutPointInfo::from)
                        .collect(),
                    algorithm: best.algorithm().to_string(),
                    target,
                    waste: best.waste().unwrap_or(0),
                    change: best.change(params.min_viable_change, params.change_fee),
                });
            }
            Ok(best)
        }
        None => {
            // Insufficient funds dominates the report: it is the failure a
            // caller can act on by loosening its filter.
            let error = failures
                .iter()
                .filter(|e| matches!(e, SelectionError::InsufficientFunds { .. }))
                .max_by_key(|e| match e {
                    SelectionError::InsufficientFunds { available, .. } => *available,
                    _ => 0,
                })
                .or_else(|| failures.first())
                .cloned()
                .unwrap_or(SelectionError::InsufficientFunds {
                    available: 0,
                    required: target,
                });
            if let Some(bus) = bus {
                let available: i64 = groups
                    .mixed
                    .iter()
                    .fold(0i64, |acc, g| acc.saturating_add(g.selection_amount()));
                bus.publish(SelectionEvent::Failed {
                    reason: failure_reason(&error).to_string(),
                    target,
                    available: available.max(0) as u64,
                });
            }
            Err(error)
        }
    }
}

/// Walk a filter ladder from strictest to loosest until one rung yields a
/// selection.
///
/// `filters` carries the ladder in the order to try; `filtered` is the
/// catalog [`group_candidates`] built for those filters. The map key order
/// is lexicographic and says nothing about strictness, so the walk follows
/// the slice. At each rung the same-kind pools are tried before the union
/// across kinds, so a transaction spends one script kind when it can. The
/// last failure is reported when every rung fails.
pub fn attempt_selection(
    pool: &CandidatePool,
    filtered: &FilteredGroups,
    filters: &[EligibilityFilter],
    target: u64,
    params: &SelectionParams,
    rng: &mut impl Rng,
    bus: Option<&SelectionEventBus>,
) -> Result<SelectionResult, SelectionError> {
    let mut last_error = SelectionError::InsufficientFunds {
        available: 0,
        required: target,
    };

    for filter in filters {
        let catalog = match filtered.get(filter) {
            Some(catalog) => catalog,
            None => continue,
        };
        for groups in catalog.by_kind.values() {
            match select_coins(pool, groups, target, params, rng, bus) {
                Ok(result) => return Ok(result),
                Err(e @ SelectionError::InvalidParameters(_)) => return Err(e),
                Err(e) => last_error = e,
            }
        }
        if catalog.kinds_count() > 1 {
            match select_coins(pool, &catalog.all, target, params, rng, bus) {
                Ok(result) => return Ok(result),
                Err(e @ SelectionError::InvalidParameters(_)) => return Err(e),
                Err(e) => last_error = e,
            }
        }
        debug!("no selection under filter {:?}, loosening", filter);
    }

    Err(last_error)
}

/// The default strict-to-loose eligibility ladder.
///
/// Own unconfirmed change is trusted early; foreign outputs need deep
/// confirmation first and are admitted unconfirmed only at the loosest
/// rungs, which also open up partial groups.
pub fn standard_filter_ladder(max_ancestors: u64, max_descendants: u64) -> Vec<EligibilityFilter> {
    vec![
        EligibilityFilter::new(1, 6, 0),
        EligibilityFilter::new(1, 1, 0),
        EligibilityFilter::with_descendants(0, 1, max_ancestors / 3, max_descendants / 3),
        EligibilityFilter::with_descendants(0, 1, max_ancestors / 2, max_descendants / 2),
        EligibilityFilter::with_descendants(
            0,
            1,
            max_ancestors.saturating_sub(1),
            max_descendants.saturating_sub(1),
        ),
        EligibilityFilter::with_descendants(
            0,
            1,
            max_ancestors.saturating_sub(1),
            max_descendants.saturating_sub(1),
        )
        .including_partial_groups(),
    ]
}

fn failure_reason(error: &SelectionError) -> &'static str {
    match error {
        SelectionError::InsufficientFunds { .. } => "insufficient_funds",
        SelectionError::NoSolutionWithinTolerance => "no_solution_within_tolerance",
        SelectionError::SearchExhausted => "search_exhausted",
        SelectionError::InvalidParameters(_) => "invalid_parameters",
        SelectionError::ResultConflict => "result_conflict",
    }
}
