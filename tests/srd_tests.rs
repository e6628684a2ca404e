//! Single-random-draw solver tests

mod test_helpers;

use coinselect::selection::{select_coins_srd, Algorithm};
use coinselect::SelectionError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_helpers::{init_test_logging, pool_from_values, singleton_groups, zero_fee_params};

#[test]
fn covers_target() {
    init_test_logging();
    let pool = pool_from_values(&[10_000, 20_000, 30_000, 40_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);
    let mut rng = StdRng::seed_from_u64(7);

    let result = select_coins_srd(&groups, 55_000, &mut rng).unwrap();
    assert_eq!(result.algorithm(), Algorithm::Srd);
    assert!(result.selected_effective_value() >= 55_000);
    assert!(result.input_count() >= 2);
}

#[test]
fn whole_pool_short_of_target() {
    init_test_logging();
    let pool = pool_from_values(&[10_000, 20_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);
    let mut rng = StdRng::seed_from_u64(7);

    let result = select_coins_srd(&groups, 50_000, &mut rng);
    assert_eq!(
        result,
        Err(SelectionError::InsufficientFunds {
            available: 30_000,
            required: 50_000,
        })
    );
}

#[test]
fn seeded_runs_are_reproducible() {
    init_test_logging();
    let pool = pool_from_values(&[5_000, 15_000, 25_000, 35_000, 45_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let mut rng_a = StdRng::seed_from_u64(42);
    let mut rng_b = StdRng::seed_from_u64(42);
    let result_a = select_coins_srd(&groups, 60_000, &mut rng_a).unwrap();
    let result_b = select_coins_srd(&groups, 60_000, &mut rng_b).unwrap();
    assert_eq!(result_a.indices(), result_b.indices());
}

#[test]
fn draws_vary_across_seeds() {
    init_test_logging();
    // 100 equal coins; two different permutations almost surely differ.
    let values = vec![10_000u64; 100];
    let pool = pool_from_values(&values);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);

    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(2);
    let result_a = select_coins_srd(&groups, 500_000, &mut rng_a).unwrap();
    let result_b = select_coins_srd(&groups, 500_000, &mut rng_b).unwrap();
    assert_eq!(result_a.input_count(), 50);
    assert_eq!(result_b.input_count(), 50);
    assert_ne!(result_a.indices(), result_b.indices());
}

#[test]
fn single_group_covering_target_is_returned() {
    init_test_logging();
    let pool = pool_from_values(&[75_000]);
    let params = zero_fee_params();
    let groups = singleton_groups(&pool, &params);
    let mut rng = StdRng::seed_from_u64(3);

    let result = select_coins_srd(&groups, 75_000, &mut rng).unwrap();
    assert_eq!(result.input_count(), 1);
    assert_eq!(result.selected_effective_value(), 75_000);
}
