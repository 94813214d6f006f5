use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::layers::{DenseLayer, DropoutKind, Phase};

#[test]
fn test_layer_shapes() {
    let mut rng = StdRng::seed_from_u64(0);
    let layer = DenseLayer::new(
        3,
        4,
        Activation::Sigmoid,
        DropoutKind::NoDropout,
        &mut rng,
    );
    // Bias row folded into the weights.
    assert_eq!(layer.weights.dim(), (4, 4));
    assert_eq!(layer.input_size(), 3);
    assert_eq!(layer.output_size(), 4);
}

#[test]
fn test_layer_initialization_is_seeded() {
    let mut rng_a = StdRng::seed_from_u64(42);
    let mut rng_b = StdRng::seed_from_u64(42);
    let a = DenseLayer::new(5, 3, Activation::Sigmoid, DropoutKind::NoDropout, &mut rng_a);
    let b = DenseLayer::new(5, 3, Activation::Sigmoid, DropoutKind::NoDropout, &mut rng_b);
    assert_eq!(a.weights, b.weights);
}

#[test]
fn test_compute_activation_without_dropout() {
    let mut rng = StdRng::seed_from_u64(1);
    let layer = DenseLayer::new(
        2,
        1,
        Activation::RectifiedLinear,
        DropoutKind::NoDropout,
        &mut rng,
    )
    .with_weights(array![[1.0], [2.0], [3.0]]);

    // Bias-augmented input: two units plus the constant 1.
    let x = array![[1.0, 1.0, 1.0]];
    let (z, cache) = layer
        .compute_activation(x.clone(), 0.0, Phase::Test)
        .unwrap();
    assert_eq!(z, array![[6.0]]);
    assert_eq!(cache.inputs, x);
    assert_eq!(cache.derivative, array![[1.0]]);
}

#[test]
fn test_compute_activation_rejects_wrong_width() {
    let mut rng = StdRng::seed_from_u64(1);
    let layer = DenseLayer::new(
        4,
        2,
        Activation::Sigmoid,
        DropoutKind::NoDropout,
        &mut rng,
    );
    let too_narrow = array![[1.0, 2.0, 3.0]];
    assert!(layer
        .compute_activation(too_narrow, 0.0, Phase::Test)
        .is_err());
}

#[test]
fn test_testing_phase_scales_unit_weights_but_not_bias() {
    let mut rng = StdRng::seed_from_u64(1);
    let layer = DenseLayer::new(
        2,
        1,
        Activation::RectifiedLinear,
        DropoutKind::Random,
        &mut rng,
    )
    .with_weights(array![[2.0], [4.0], [6.0]]);

    let x = array![[1.0, 1.0, 1.0]];
    let (z, _) = layer.compute_activation(x, 0.5, Phase::Test).unwrap();
    // (2 + 4) * 0.5 + 6
    assert_eq!(z, array![[9.0]]);
}

#[test]
fn test_train_and_test_phases_agree_without_dropout() {
    let mut rng = StdRng::seed_from_u64(8);
    let layer = DenseLayer::new(
        3,
        2,
        Activation::Sigmoid,
        DropoutKind::NoDropout,
        &mut rng,
    );
    let x = array![[0.2, -0.4, 0.9, 1.0], [1.5, 0.1, -0.3, 1.0]];

    let mut mask_rng = StdRng::seed_from_u64(77);
    let (train_z, _) = layer
        .compute_activation(x.clone(), 0.5, Phase::Train { rng: &mut mask_rng })
        .unwrap();
    let (test_z, _) = layer.compute_activation(x, 0.5, Phase::Test).unwrap();
    assert_eq!(train_z, test_z);
}

#[test]
fn test_training_phase_masks_before_the_product() {
    let mut rng = StdRng::seed_from_u64(1);
    let layer = DenseLayer::new(
        2,
        1,
        Activation::RectifiedLinear,
        DropoutKind::Random,
        &mut rng,
    )
    .with_weights(array![[1.0], [1.0], [10.0]]);

    // With a keep probability of zero every unit entry is dropped, leaving
    // only the bias contribution.
    let x = array![[5.0, 5.0, 1.0]];
    let mut mask_rng = StdRng::seed_from_u64(0);
    let (z, cache) = layer
        .compute_activation(x, 1.0, Phase::Train { rng: &mut mask_rng })
        .unwrap();
    assert_eq!(z, array![[10.0]]);
    assert_eq!(cache.inputs, array![[0.0, 0.0, 1.0]]);
}
