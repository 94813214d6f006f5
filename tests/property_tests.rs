#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use minerva::activations::Activation;
    use minerva::network::{DropoutSettings, Mlp};
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Strategy for bounded finite activation inputs.
    fn input_matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f64>> {
        prop::collection::vec(-30.0f64..30.0, rows * cols).prop_map(move |values| {
            Array2::from_shape_vec((rows, cols), values).unwrap()
        })
    }

    proptest! {
        #[test]
        fn softmax_rows_always_sum_to_one(input in input_matrix_strategy(5, 4)) {
            let mut output = input;
            Activation::Softmax.apply_batch(&mut output);
            for row in output.outer_iter() {
                prop_assert!((row.sum() - 1.0).abs() < 1e-9);
                prop_assert!(row.iter().all(|v| v.is_finite() && *v >= 0.0));
            }
        }

        #[test]
        fn sigmoid_derivative_matches_finite_difference(x in -8.0f64..8.0) {
            let h = 1e-5;
            let point = Array2::from_elem((1, 1), x);
            let analytic = Activation::Sigmoid.derivative_batch(point.view())[[0, 0]];

            let mut plus = Array2::from_elem((1, 1), x + h);
            let mut minus = Array2::from_elem((1, 1), x - h);
            Activation::Sigmoid.apply_batch(&mut plus);
            Activation::Sigmoid.apply_batch(&mut minus);
            let numeric = (plus[[0, 0]] - minus[[0, 0]]) / (2.0 * h);

            let relative = (numeric - analytic).abs() / (numeric.abs() + analytic.abs() + 1e-12);
            prop_assert!(relative < 1e-3, "relative error {} at {}", relative, x);
        }

        #[test]
        fn rectified_linear_derivative_matches_finite_difference(
            x in (-8.0f64..8.0).prop_filter("away from the kink", |v| v.abs() > 1e-3)
        ) {
            let h = 1e-5;
            let point = Array2::from_elem((1, 1), x);
            let analytic = Activation::RectifiedLinear.derivative_batch(point.view())[[0, 0]];

            let mut plus = Array2::from_elem((1, 1), x + h);
            let mut minus = Array2::from_elem((1, 1), x - h);
            Activation::RectifiedLinear.apply_batch(&mut plus);
            Activation::RectifiedLinear.apply_batch(&mut minus);
            let numeric = (plus[[0, 0]] - minus[[0, 0]]) / (2.0 * h);

            prop_assert!((numeric - analytic).abs() < 1e-9);
        }

        #[test]
        fn forward_output_has_batch_rows_of_distributions(
            batch in 1usize..12,
            hidden in 1usize..20,
            seed in 0u64..1000
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mlp = Mlp::new(
                &[6, hidden, 3],
                &[Activation::Sigmoid, Activation::Softmax],
                DropoutSettings::disabled(),
                &mut rng,
            ).unwrap();

            let x = Array2::from_shape_fn((batch, 6), |(i, j)| {
                ((i * 6 + j) as f64 * 0.23 + seed as f64 * 0.01).sin()
            });
            let output = mlp.predict(x.view()).unwrap();
            prop_assert_eq!(output.dim(), (batch, 3));
            for row in output.outer_iter() {
                prop_assert!((row.sum() - 1.0).abs() < 1e-9);
            }
        }
    }
}
