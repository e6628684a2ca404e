//! Shared helpers for the integration tests
#![allow(dead_code)]

use bitcoin::{Amount, OutPoint, ScriptBuf, Txid};
use coinselect::selection::{Candidate, CandidatePool, OutputGroup, SelectionParams};
use log::LevelFilter;
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .try_init();
    });
}

/// Deterministic outpoint for test candidate `index`
pub fn test_outpoint(index: u32) -> OutPoint {
    let txid = Txid::from_str(&format!("{:064x}", u64::from(index) + 1)).unwrap();
    OutPoint::new(txid, 0)
}

/// Candidate with the given value, depth 6, known input size, and the given
/// feerates
pub fn test_candidate(index: u32, value_sat: u64, eff_rate: f32, lt_rate: f32) -> Candidate {
    Candidate::new(
        test_outpoint(index),
        Amount::from_sat(value_sat),
        ScriptBuf::new(),
        6,
        Some(68),
        eff_rate,
        lt_rate,
    )
    .unwrap()
}

/// Pool of candidates with the given values at zero feerates, so effective
/// values equal the listed values exactly
pub fn pool_from_values(values: &[u64]) -> CandidatePool {
    let mut pool = CandidatePool::new();
    for (index, &value) in values.iter().enumerate() {
        assert!(pool.add(test_candidate(index as u32, value, 0.0, 0.0)));
    }
    pool
}

/// Zero-feerate parameters: no fees, no change cost
pub fn zero_fee_params() -> SelectionParams {
    SelectionParams::new(0.0, 0.0, 31, 68, 11).unwrap()
}

/// One singleton group per pool candidate
pub fn singleton_groups(pool: &CandidatePool, params: &SelectionParams) -> Vec<OutputGroup> {
    pool.all()
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let mut group = OutputGroup::new(params);
            group.insert(index, candidate);
            group
        })
        .collect()
}
