//! Common data types and constants for the coin selection core
//!
//! These types are shared across the selection subsystem: network-level
//! monetary constants and the error taxonomy every solver reports through.
//!
//! # Error Boundaries
//!
//! Solver failures (`InsufficientFunds`, `NoSolutionWithinTolerance`,
//! `SearchExhausted`) are recoverable: the caller is expected to loosen its
//! eligibility filter or try another algorithm. Validation failures
//! (`InvalidParameters`, `ResultConflict`) signal a logic bug in the caller
//! and must abort the operation that triggered them.

use thiserror::Error;

/// Constant for dust threshold (minimum output value)
pub const DUST_THRESHOLD: u64 = 546;

/// Constant for satoshis per Bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Constant for maximum Bitcoin supply in satoshis
pub const MAX_BITCOIN_SUPPLY: u64 = 21_000_000 * SATS_PER_BTC;

/// Final minimum change amount after paying for fees.
///
/// Change below this value is not worth creating as an output and is
/// absorbed into the fee instead.
pub const MIN_FINAL_CHANGE: u64 = DUST_THRESHOLD;

/// Failure modes of a coin selection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The eligible pool cannot cover the target, even in aggregate.
    ///
    /// Recoverable: retry with a looser eligibility filter, or report the
    /// shortfall to the user.
    #[error("insufficient funds: {available} sat available, {required} sat required")]
    InsufficientFunds {
        /// Total value of the pool that was searched
        available: u64,
        /// Value the selection needed to reach
        required: u64,
    },

    /// The exact-match search found no subset inside its overshoot window.
    ///
    /// Recoverable: another algorithm with a change output may still succeed.
    #[error("no input combination within the allowed overshoot window")]
    NoSolutionWithinTolerance,

    /// The exact-match search exhausted its node budget before finding any
    /// solution.
    ///
    /// Recoverable: another algorithm may still succeed.
    #[error("search budget exhausted before any solution was found")]
    SearchExhausted,

    /// A caller passed structurally invalid input (non-positive target,
    /// negative cost bounds, zero-size input metadata).
    ///
    /// Fatal: this is a programming error, not a property of the wallet.
    #[error("invalid selection parameters: {0}")]
    InvalidParameters(String),

    /// Two selection results being combined spend the same outpoint.
    ///
    /// Fatal: results fed to a merge must come from disjoint pools.
    #[error("selection results share an input outpoint")]
    ResultConflict,
}
