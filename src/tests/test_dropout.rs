use ndarray::{Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::layers::{dpp_mask, random_mask, DropoutKind};

#[test]
fn test_dropout_kind_names_deserialize() {
    let parsed: Vec<DropoutKind> =
        serde_json::from_str(r#"["nodropout", "random", "dpp"]"#).unwrap();
    assert_eq!(
        parsed,
        vec![DropoutKind::NoDropout, DropoutKind::Random, DropoutKind::Dpp]
    );
    assert!(serde_json::from_str::<DropoutKind>(r#""bernoulli""#).is_err());
}

#[test]
fn test_random_mask_with_zero_probability_changes_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut batch = Array2::from_elem((4, 6), 2.5);
    let original = batch.clone();
    random_mask(&mut batch, 0.0, &mut rng);
    assert_eq!(batch, original);
}

#[test]
fn test_random_mask_zeroes_roughly_the_configured_fraction() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut batch = Array2::from_elem((100, 101), 1.0);
    random_mask(&mut batch, 0.5, &mut rng);

    let units = batch.slice(ndarray::s![.., ..100]);
    let zeroed = units.iter().filter(|&&v| v == 0.0).count();
    let fraction = zeroed as f64 / units.len() as f64;
    assert!((fraction - 0.5).abs() < 0.05, "zeroed fraction {}", fraction);
}

#[test]
fn test_random_mask_leaves_bias_column_alone() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut batch = Array2::from_elem((50, 11), 1.0);
    random_mask(&mut batch, 0.9, &mut rng);
    assert!(batch.column(10).iter().all(|&v| v == 1.0));
}

#[test]
fn test_random_mask_differs_per_sample() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut batch = Array2::from_elem((2, 101), 1.0);
    random_mask(&mut batch, 0.5, &mut rng);
    let first = batch.index_axis(Axis(0), 0);
    let second = batch.index_axis(Axis(0), 1);
    assert_ne!(first, second, "each sample row must draw its own mask");
}

#[test]
fn test_dpp_mask_with_zero_probability_is_a_strict_noop() {
    let mut rng = StdRng::seed_from_u64(4);
    let weights = Array2::random_using((9, 5), Uniform::new(-1.0, 1.0), &mut rng);
    let mut batch = Array2::random_using((3, 9), Uniform::new(0.0, 1.0), &mut rng);
    let original = batch.clone();
    dpp_mask(&mut batch, &weights, 0.0, &mut rng);
    assert_eq!(batch, original);
}

#[test]
fn test_dpp_mask_retains_k_shared_columns() {
    let mut rng = StdRng::seed_from_u64(12);
    let weights = Array2::random_using((9, 6), Uniform::new(-1.0, 1.0), &mut rng);
    let mut batch = Array2::from_elem((4, 9), 1.0);
    dpp_mask(&mut batch, &weights, 0.5, &mut rng);

    // k = floor(0.5 * 8) = 4 unit columns survive; the mask is shared by
    // every sample and the bias column is untouched.
    let mut retained = 0;
    for column in batch.slice(ndarray::s![.., ..8]).axis_iter(Axis(1)) {
        let all_ones = column.iter().all(|&v| v == 1.0);
        let all_zeros = column.iter().all(|&v| v == 0.0);
        assert!(all_ones || all_zeros, "mask must be shared across the batch");
        if all_ones {
            retained += 1;
        }
    }
    assert_eq!(retained, 4);
    assert!(batch.column(8).iter().all(|&v| v == 1.0));
}
