//! Solver fan-out and filter-ladder integration tests

mod test_helpers;

use bitcoin::{Amount, ScriptBuf};
use coinselect::events::{SelectionEvent, SelectionEventBus};
use coinselect::selection::{
    attempt_selection, group_candidates, select_coins, selection_waste, standard_filter_ladder,
    Algorithm, Candidate, CandidatePool, EligibilityFilter, Groups, SelectionParams,
    SelectionResult,
};
use coinselect::SelectionError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_helpers::{
    init_test_logging, pool_from_values, singleton_groups, test_candidate, test_outpoint,
    zero_fee_params,
};

fn groups_of(pool: &CandidatePool, params: &SelectionParams) -> Groups {
    let mut groups = Groups::default();
    for group in singleton_groups(pool, params) {
        if group.selection_amount() > 0 {
            groups.positive.push(group.clone());
        }
        groups.mixed.push(group);
    }
    groups
}

#[test]
fn fan_out_prefers_the_changeless_match() {
    init_test_logging();
    // At 1 sat/vB each 68 vB input costs 68 sat; values are padded so the
    // effective values land on round numbers.
    let mut pool = CandidatePool::new();
    for (index, value) in [100_068u64, 200_068, 300_068].iter().enumerate() {
        assert!(pool.add(test_candidate(index as u32, *value, 1.0, 1.0)));
    }
    let params = SelectionParams::new(1.0, 1.0, 31, 68, 11).unwrap();
    let groups = groups_of(&pool, &params);
    let mut rng = StdRng::seed_from_u64(21);

    let result = select_coins(&pool, &groups, 300_000, &params, &mut rng, None).unwrap();
    // The exact match costs nothing; every change-making alternative pays
    // at least the cost of change.
    assert_eq!(result.algorithm(), Algorithm::Bnb);
    assert_eq!(result.selected_effective_value(), 300_000);
    assert_eq!(result.waste(), Some(0));
}

#[test]
fn fan_out_falls_back_when_no_exact_match_exists() {
    init_test_logging();
    let pool = pool_from_values(&[37_000, 10_000]);
    let params = zero_fee_params();
    let groups = groups_of(&pool, &params);
    let mut rng = StdRng::seed_from_u64(21);

    // No subset lands in [40k, 40k]; knapsack or srd must cover instead.
    let result = select_coins(&pool, &groups, 40_000, &params, &mut rng, None).unwrap();
    assert_ne!(result.algorithm(), Algorithm::Bnb);
    assert_eq!(result.selected_effective_value(), 47_000);
}

#[test]
fn fan_out_reports_insufficient_funds() {
    init_test_logging();
    let pool = pool_from_values(&[10_000]);
    let params = zero_fee_params();
    let groups = groups_of(&pool, &params);
    let mut rng = StdRng::seed_from_u64(21);

    let result = select_coins(&pool, &groups, 50_000, &params, &mut rng, None);
    assert!(matches!(
        result,
        Err(SelectionError::InsufficientFunds { .. })
    ));
}

#[test]
fn fan_out_rejects_zero_target() {
    init_test_logging();
    let pool = pool_from_values(&[10_000]);
    let params = zero_fee_params();
    let groups = groups_of(&pool, &params);
    let mut rng = StdRng::seed_from_u64(21);

    assert!(matches!(
        select_coins(&pool, &groups, 0, &params, &mut rng, None),
        Err(SelectionError::InvalidParameters(_))
    ));
}

#[test]
fn completion_event_reports_the_winner() {
    init_test_logging();
    let pool = pool_from_values(&[60_000]);
    let params = zero_fee_params();
    let groups = groups_of(&pool, &params);
    let mut rng = StdRng::seed_from_u64(21);

    let bus = SelectionEventBus::new();
    let events = bus.subscribe_all();
    let result = select_coins(&pool, &groups, 60_000, &params, &mut rng, Some(&bus)).unwrap();

    match events.recv().unwrap() {
        SelectionEvent::Completed {
            inputs,
            algorithm,
            target,
            ..
        } => {
            assert_eq!(inputs.len(), result.input_count());
            assert_eq!(algorithm, result.algorithm().to_string());
            assert_eq!(target, 60_000);
        }
        other => panic!("expected completion event, got {:?}", other),
    }
}

#[test]
fn failure_event_reports_the_shortfall() {
    init_test_logging();
    let pool = pool_from_values(&[10_000]);
    let params = zero_fee_params();
    let groups = groups_of(&pool, &params);
    let mut rng = StdRng::seed_from_u64(21);

    let bus = SelectionEventBus::new();
    let events = bus.subscribe("failed");
    let _ = select_coins(&pool, &groups, 50_000, &params, &mut rng, Some(&bus));

    match events.recv().unwrap() {
        SelectionEvent::Failed {
            reason, available, ..
        } => {
            assert_eq!(reason, "insufficient_funds");
            assert_eq!(available, 10_000);
        }
        other => panic!("expected failure event, got {:?}", other),
    }
}

#[test]
fn ladder_loosens_until_unconfirmed_change_qualifies() {
    init_test_logging();
    let mut pool = CandidatePool::new();
    // A confirmed foreign coin and our own unconfirmed change.
    assert!(pool.add(
        Candidate::new(
            test_outpoint(0),
            Amount::from_sat(100_000),
            ScriptBuf::new(),
            10,
            Some(68),
            0.0,
            0.0,
        )
        .unwrap()
    ));
    assert!(pool.add(
        Candidate::new(
            test_outpoint(1),
            Amount::from_sat(200_000),
            ScriptBuf::new(),
            0,
            Some(68),
            0.0,
            0.0,
        )
        .unwrap()
        .with_provenance(0, true)
    ));

    let params = zero_fee_params();
    let filters = standard_filter_ladder(30, 30);
    let catalogs = group_candidates(&pool, &params, &filters, 10);
    let mut rng = StdRng::seed_from_u64(21);

    // 250k needs both coins; only the looser rungs admit the change.
    let result = attempt_selection(
        &pool, &catalogs, &filters, 250_000, &params, &mut rng, None,
    )
    .unwrap();
    assert_eq!(result.input_count(), 2);
    assert_eq!(result.selected_effective_value(), 300_000);
}

#[test]
fn ladder_with_empty_pool_is_insufficient() {
    init_test_logging();
    let pool = CandidatePool::new();
    let params = zero_fee_params();
    let filters = vec![EligibilityFilter::new(0, 1, 10)];
    let catalogs = group_candidates(&pool, &params, &filters, 10);
    let mut rng = StdRng::seed_from_u64(21);

    let result = attempt_selection(&pool, &catalogs, &filters, 10_000, &params, &mut rng, None);
    assert_eq!(
        result,
        Err(SelectionError::InsufficientFunds {
            available: 0,
            required: 10_000,
        })
    );
}

#[test]
fn oracle_seeded_change_target_drives_the_knapsack() {
    init_test_logging();
    let pool = pool_from_values(&[400_000, 500_000]);
    let mut rng = StdRng::seed_from_u64(33);

    let payment = 600_000u64;
    let change_target =
        coinselect::generate_change_target(payment, 0, &mut rng);
    let params = zero_fee_params().with_min_change_target(change_target);
    let groups = groups_of(&pool, &params);

    // With at least 50k of change demanded, a lone 500k coin cannot carry a
    // 600k payment; both coins come in and the change stays healthy.
    let result = select_coins(&pool, &groups, payment, &params, &mut rng, None).unwrap();
    assert_eq!(result.input_count(), 2);
    assert!(result.change(0, 0) > 0);
}

#[test]
fn result_waste_matches_the_pure_function() {
    init_test_logging();
    let mut pool = CandidatePool::new();
    assert!(pool.add(test_candidate(0, 50_000, 2.0, 1.0)));
    assert!(pool.add(test_candidate(1, 30_000, 2.0, 1.0)));
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let target = 79_000u64;
    let mut result = SelectionResult::new(target, Algorithm::Manual);
    result.add_input(&groups[0]).unwrap();
    result.add_input(&groups[1]).unwrap();

    // Force the no-change branch on both sides and compare.
    let computed = result.compute_waste(10_000, 0, 0);
    let pure = selection_waste(pool.all().iter(), 0, target, true);
    assert_eq!(computed, pure);
}
