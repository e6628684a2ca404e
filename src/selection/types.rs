//! Core types for coin selection
//!
//! This module defines the candidate UTXO and the pool that owns it.
//!
//! # Key Types
//!
//! - [`Candidate`]: a single spendable output under consideration, with its
//!   fee and effective value derived at construction
//! - [`CandidatePool`]: an outpoint-keyed arena of candidates; groups and
//!   selection results refer to candidates by stable index into the pool
//!
//! # Usage
//!
//! ```no_run
//! use coinselect::selection::types::{Candidate, CandidatePool};
//! use bitcoin::{Amount, OutPoint, ScriptBuf, Txid};
//! use std::str::FromStr;
//!
//! let outpoint = OutPoint::new(
//!     Txid::from_str("7967a5185e907a25225574544c31f7b059c1a191d65b53dcc1554d339c4f9efc").unwrap(),
//!     0,
//! );
//! let candidate = Candidate::new(
//!     outpoint,
//!     Amount::from_sat(100_000),
//!     ScriptBuf::new(),
//!     6,          // confirmations
//!     Some(68),   // input vsize
//!     2.0,        // effective feerate, sat/vB
//!     1.0,        // long-term feerate, sat/vB
//! ).unwrap();
//!
//! let mut pool = CandidatePool::new();
//! assert!(pool.add(candidate));
//! ```
//!
//! # Immutability
//!
//! Candidates are immutable after construction; their fee and effective
//! value are fixed by the feerates the pool was built with. A fresh pool is
//! built for every selection call that changes feerates.

use crate::math;
use crate::types::SelectionError;
use bitcoin::{Amount, OutPoint, ScriptBuf, SignedAmount};
use std::cmp::Ordering;

/// A spendable output under consideration for funding a transaction.
///
/// # Fields
///
/// * `outpoint` - Reference to the transaction output (txid and vout)
/// * `value` - Gross amount of this output
/// * `script_pubkey` - Locking script, used to group outputs paid to the
///   same destination
/// * `depth` - Chain depth: positive = confirmations, 0 = in mempool,
///   negative = conflicted
/// * `input_vsize` - Virtual bytes this output adds when spent, `None` when
///   the wallet cannot estimate it
/// * `spendable` - Whether the wallet holds the keys to spend this output
/// * `solvable` - Whether the wallet knows how to spend it, keys aside
/// * `safe` - Whether the output is trusted enough to fund new spends
/// * `time` - Smart timestamp of the containing transaction
/// * `from_me` - Whether the containing transaction was sent by this wallet
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Reference to the transaction output (txid and vout)
    pub outpoint: OutPoint,

    /// Gross amount in this output
    pub value: Amount,

    /// Locking script of this output
    pub script_pubkey: ScriptBuf,

    /// Chain depth; positive = confirmed, 0 = mempool, negative = conflicted
    pub depth: i32,

    /// Estimated size as a fully-signed input, in virtual bytes
    pub input_vsize: Option<u32>,

    /// Whether we hold the private keys to spend this output
    pub spendable: bool,

    /// Whether we know how to spend this output, ignoring the lack of keys
    pub solvable: bool,

    /// Whether this output is considered safe to spend
    pub safe: bool,

    /// Smart timestamp of the transaction containing this output
    pub time: i64,

    /// Whether the containing transaction was sent from the owning wallet
    pub from_me: bool,

    /// Count of unconfirmed ancestors of the containing transaction
    pub ancestors: u64,

    /// Count of in-mempool descendants of the containing transaction
    pub descendants: u64,

    fee: Amount,
    long_term_fee: Amount,
    effective_value: SignedAmount,
}

impl Candidate {
    /// Create a new candidate, deriving its spend fees from the feerates.
    ///
    /// When `input_vsize` is unknown the fee is zero and the effective value
    /// equals the gross value. A declared size of zero virtual bytes is a
    /// caller bug and is rejected.
    ///
    /// # Arguments
    /// * `outpoint` - The transaction outpoint (txid and vout)
    /// * `value` - The gross amount of this output
    /// * `script_pubkey` - The locking script of this output
    /// * `depth` - Chain depth (confirmations, 0, or negative)
    /// * `input_vsize` - Estimated signed-input size in virtual bytes
    /// * `effective_feerate` - Current feerate in sat/vB
    /// * `long_term_feerate` - Consolidation feerate in sat/vB
    pub fn new(
        outpoint: OutPoint,
        value: Amount,
        script_pubkey: ScriptBuf,
        depth: i32,
        input_vsize: Option<u32>,
        effective_feerate: f32,
        long_term_feerate: f32,
    ) -> Result<Self, SelectionError> {
        let (fee, long_term_fee, effective_value) = match input_vsize {
            None => (Amount::ZERO, Amount::ZERO, value.to_sat() as i64),
            Some(0) => {
                return Err(SelectionError::InvalidParameters(
                    "candidate input size must be unknown or positive".to_string(),
                ))
            }
            Some(vsize) => (
                Amount::from_sat(math::fee_for_vsize(vsize as u64, effective_feerate)),
                Amount::from_sat(math::fee_for_vsize(vsize as u64, long_term_feerate)),
                math::effective_value(value.to_sat(), vsize as u64, effective_feerate),
            ),
        };
        let effective_value = SignedAmount::from_sat(effective_value);

        Ok(Self {
            outpoint,
            value,
            script_pubkey,
            depth,
            input_vsize,
            spendable: true,
            solvable: true,
            safe: true,
            time: 0,
            from_me: false,
            ancestors: 0,
            descendants: 0,
            fee,
            long_term_fee,
            effective_value,
        })
    }

    /// Set the capability and trust flags for this candidate
    pub fn with_flags(mut self, spendable: bool, solvable: bool, safe: bool) -> Self {
        self.spendable = spendable;
        self.solvable = solvable;
        self.safe = safe;
        self
    }

    /// Set the provenance of this candidate
    ///
    /// # Arguments
    /// * `time` - Smart timestamp of the containing transaction
    /// * `from_me` - Whether the containing transaction was sent by this wallet
    pub fn with_provenance(mut self, time: i64, from_me: bool) -> Self {
        self.time = time;
        self.from_me = from_me;
        self
    }

    /// Set the mempool ancestry counts for this candidate
    ///
    /// # Arguments
    /// * `ancestors` - Unconfirmed ancestor count of the containing transaction
    /// * `descendants` - In-mempool descendant count of the containing transaction
    pub fn with_ancestry(mut self, ancestors: u64, descendants: u64) -> Self {
        self.ancestors = ancestors;
        self.descendants = descendants;
        self
    }

    /// The fee to spend this output at the effective feerate
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// The fee to spend this output at the long-term feerate
    pub fn long_term_fee(&self) -> Amount {
        self.long_term_fee
    }

    /// Gross value minus the fee to spend at the effective feerate
    pub fn effective_value(&self) -> SignedAmount {
        self.effective_value
    }

    /// Difference between spending now and spending at the long-term rate
    pub fn fee_excess(&self) -> i64 {
        (self.fee.to_sat() as i64).saturating_sub(self.long_term_fee.to_sat() as i64)
    }

    /// Virtual bytes this candidate contributes as an input, 0 when unknown
    pub fn spend_vsize(&self) -> u64 {
        self.input_vsize.map(u64::from).unwrap_or(0)
    }

    /// Check if this candidate is confirmed
    pub fn is_confirmed(&self) -> bool {
        self.depth > 0
    }

    /// Check if spending this candidate costs more than it returns
    pub fn is_dust(&self) -> bool {
        self.effective_value.to_sat() <= 0
    }

    /// Get a unique identifier for this candidate
    pub fn id(&self) -> String {
        format!("{}:{}", self.outpoint.txid, self.outpoint.vout)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.outpoint == other.outpoint
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.outpoint.cmp(&other.outpoint)
    }
}

/// Outpoint-keyed arena of candidates.
///
/// Groups and selection results hold indices into this pool, so the
/// "no shared outpoint" invariant between merged results reduces to index
/// set disjointness.
pub struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    /// Create a new empty candidate pool
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Create a pool from prepared candidates, dropping duplicates.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        let mut pool = Self::new();
        for candidate in candidates {
            pool.add(candidate);
        }
        pool
    }

    /// Add a candidate to this pool
    ///
    /// # Returns
    /// * `true` if the candidate was added, `false` if a candidate with the
    ///   same outpoint already exists
    pub fn add(&mut self, candidate: Candidate) -> bool {
        if self.position(&candidate.outpoint).is_some() {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    /// Get a candidate by outpoint
    pub fn get(&self, outpoint: &OutPoint) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.outpoint == *outpoint)
    }

    /// Get the pool index of a candidate by outpoint
    pub fn position(&self, outpoint: &OutPoint) -> Option<usize> {
        self.candidates.iter().position(|c| c.outpoint == *outpoint)
    }

    /// Get a candidate by pool index
    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Get all candidates in this pool
    pub fn all(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Get the total gross value of the pool
    pub fn total_value(&self) -> Amount {
        self.candidates.iter().map(|c| c.value).sum()
    }

    /// Get the total effective value of the pool, in satoshis
    pub fn total_effective_value(&self) -> i64 {
        self.candidates
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(c.effective_value().to_sat()))
    }

    /// Check if this pool is empty
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Get the number of candidates in this pool
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

impl Default for CandidatePool {
    fn default() -> Self {
        Self::new()
    }
}
