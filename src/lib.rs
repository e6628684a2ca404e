//! Coin Selection Core
//!
//! This crate implements the coin-selection core of a Bitcoin wallet: given
//! a pool of candidate UTXOs, a funding target, and a fee model, it chooses
//! a subset of inputs that pays the target while minimizing a waste metric
//! covering both the current fee cost and the future cost of the coins left
//! behind.
//!
//! # Modules
//!
//! - `types`: crate-level constants and the selection error taxonomy
//! - `math`: fee arithmetic and effective-value helpers
//! - `logging`: log-facade configuration
//! - `events`: selection event bus
//! - `selection`: the data model, the three solvers, and the entry points
//!
//! # Design
//!
//! Candidates live in an outpoint-keyed pool; groups of same-script outputs
//! are the unit of selection; three independent solvers (branch-and-bound,
//! single random draw, knapsack) compete on the waste metric. The crate
//! holds no global state and performs no I/O; randomness is supplied by the
//! caller and is seedable for reproducible tests.
//!
//! Transaction signing, feerate estimation, chain queries, and broadcast
//! are out of scope; the crate consumes their outputs as plain values.

/// Crate-level constants and the selection error taxonomy
pub mod types;

/// Fee arithmetic and effective-value helpers
pub mod math;

/// Logging configuration for the log facade
pub mod logging;

/// Event publication for selection outcomes
pub mod events;

/// The selection data model, solvers, and entry points
pub mod selection;

/// Re-export the error type and monetary constants
pub use types::{SelectionError, DUST_THRESHOLD, MIN_FINAL_CHANGE, SATS_PER_BTC};

/// Re-export the selection entry points and core types
pub use selection::{
    attempt_selection, generate_change_target, group_candidates, select_coins, select_coins_bnb,
    select_coins_knapsack, select_coins_srd, selection_waste, standard_filter_ladder, Algorithm,
    Candidate, CandidatePool, EligibilityFilter, FilteredGroups, GroupCatalog, Groups,
    OutputGroup, OutputKind, SelectionParams, SelectionResult, CHANGE_LOWER, CHANGE_UPPER,
    ITERATIONS, TOTAL_TRIES,
};

/// Re-export the event bus for observers
pub use events::{OutPointInfo, SelectionEvent, SelectionEventBus};

/// Re-export commonly used Bitcoin types
pub use bitcoin::{Amount, OutPoint, ScriptBuf, SignedAmount, Txid};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the library's default logging once.
///
/// Safe to call repeatedly; only the first call configures the logger.
/// Callers that install their own `log` backend skip this entirely.
pub fn init() -> Result<(), String> {
    let mut result = Ok(());
    INIT.call_once(|| {
        let config = logging::LogConfig::default();
        result = logging::init(&config);
    });
    result
}
