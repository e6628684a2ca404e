//! Branch-and-bound solver tests

mod test_helpers;

use coinselect::selection::{select_coins_bnb, Algorithm};
use coinselect::SelectionError;
use test_helpers::{init_test_logging, pool_from_values, singleton_groups, zero_fee_params};

#[test]
fn finds_exact_match_alone() {
    init_test_logging();
    let pool = pool_from_values(&[100_000, 200_000, 300_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let mut result = select_coins_bnb(&groups, 300_000, 10_000).unwrap();
    assert_eq!(result.algorithm(), Algorithm::Bnb);
    assert_eq!(result.input_count(), 1);
    assert_eq!(result.selected_effective_value(), 300_000);
    // No overshoot and no fee excess at equal feerates.
    assert_eq!(result.compute_waste(0, 0, 0), 0);
}

#[test]
fn accepts_overshoot_within_window() {
    init_test_logging();
    let pool = pool_from_values(&[37_000, 10_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    // 37k + 10k = 47k lands inside [45k, 48k].
    let result = select_coins_bnb(&groups, 45_000, 3_000).unwrap();
    assert_eq!(result.selected_effective_value(), 47_000);
    assert_eq!(result.input_count(), 2);
}

#[test]
fn rejects_solutions_outside_window() {
    init_test_logging();
    // 37k is short of 40k; 47k overshoots 40k + 5k.
    let pool = pool_from_values(&[37_000, 10_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let result = select_coins_bnb(&groups, 40_000, 5_000);
    assert_eq!(result, Err(SelectionError::NoSolutionWithinTolerance));
}

#[test]
fn no_combination_fits_tolerance() {
    init_test_logging();
    let pool = pool_from_values(&[100_000, 200_000, 300_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    // Every subset either stops below 350k or jumps past 370k.
    let result = select_coins_bnb(&groups, 350_000, 20_000);
    assert_eq!(result, Err(SelectionError::NoSolutionWithinTolerance));
}

#[test]
fn reports_insufficient_funds() {
    init_test_logging();
    let pool = pool_from_values(&[1_000, 2_000, 3_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let result = select_coins_bnb(&groups, 7_000, 0);
    assert_eq!(
        result,
        Err(SelectionError::InsufficientFunds {
            available: 6_000,
            required: 7_000,
        })
    );
}

#[test]
fn empty_pool_is_insufficient() {
    init_test_logging();
    let result = select_coins_bnb(&[], 1_000, 0);
    assert_eq!(
        result,
        Err(SelectionError::InsufficientFunds {
            available: 0,
            required: 1_000,
        })
    );
}

#[test]
fn zero_target_is_invalid() {
    init_test_logging();
    let pool = pool_from_values(&[1_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    assert!(matches!(
        select_coins_bnb(&groups, 0, 0),
        Err(SelectionError::InvalidParameters(_))
    ));
}

#[test]
fn terminates_on_large_uniform_pool() {
    init_test_logging();
    // 1000 equal groups; an exact cover of 500 coins exists and the search
    // must find it inside its node budget.
    let values = vec![1_000u64; 1_000];
    let pool = pool_from_values(&values);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let mut result = select_coins_bnb(&groups, 500_000, 1_000).unwrap();
    assert_eq!(result.input_count(), 500);
    assert_eq!(result.selected_effective_value(), 500_000);
    assert_eq!(result.compute_waste(0, 0, 0), 0);
}

#[test]
fn waste_is_stable_under_pool_order() {
    init_test_logging();
    let params = zero_fee_params();

    let pool_a = pool_from_values(&[5_000, 90_000, 12_000, 43_000]);
    let pool_b = pool_from_values(&[43_000, 12_000, 90_000, 5_000]);
    let groups_a = singleton_groups(&pool_a, &params);
    let groups_b = singleton_groups(&pool_b, &params);

    let mut result_a = select_coins_bnb(&groups_a, 55_000, 2_000).unwrap();
    let mut result_b = select_coins_bnb(&groups_b, 55_000, 2_000).unwrap();
    assert_eq!(
        result_a.compute_waste(0, 0, 0),
        result_b.compute_waste(0, 0, 0)
    );
}

#[test]
fn prefers_lower_overshoot() {
    init_test_logging();
    // Both {60k} and {40k, 25k} cover 58k within the window; 60k wastes less.
    let pool = pool_from_values(&[60_000, 40_000, 25_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let result = select_coins_bnb(&groups, 58_000, 10_000).unwrap();
    assert_eq!(result.selected_effective_value(), 60_000);
    assert_eq!(result.input_count(), 1);
}
