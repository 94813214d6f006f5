use ndarray::ArrayView2;
use rand::{Rng, RngCore};

use crate::error::Result;
use crate::network::{cross_entropy, Mlp};

/// Perturbation used for the central finite difference.
pub const EPSILON: f64 = 1e-4;

/// Relative error above which an entry is reported.
pub const TOLERANCE: f64 = 1e-3;

/// A single analytic/numeric disagreement.
#[derive(Clone, Debug)]
pub struct GradientMismatch {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
    pub analytic: f64,
    pub numeric: f64,
    pub relative_error: f64,
}

/// Outcome of a finite-difference sweep over every weight entry. Mismatches
/// are warnings for diagnostic runs, never fatal.
#[derive(Clone, Debug, Default)]
pub struct GradientCheckReport {
    pub mismatches: Vec<GradientMismatch>,
    /// Accumulated relative error per layer.
    pub layer_error_totals: Vec<f64>,
}

impl GradientCheckReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare the analytic gradients against central finite differences of the
/// cross-entropy cost, perturbing every weight entry by ±`EPSILON`.
///
/// Dropout masks are pinned with one seed per layer so each forward pass
/// inside the sweep sees identical masks; with DPP dropout the kernel itself
/// depends on the perturbed weights, so checks are only meaningful with
/// dropout disabled.
pub fn check_gradients(
    mlp: &mut Mlp,
    inputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    rng: &mut dyn RngCore,
) -> Result<GradientCheckReport> {
    let seeds: Vec<u64> = (0..mlp.layers.len()).map(|_| rng.gen()).collect();

    let (output, caches) = mlp.forward_seeded(inputs, &seeds)?;
    let analytic = mlp.calculate_gradient(&output, targets, &caches);

    let mut report = GradientCheckReport::default();
    for layer in 0..mlp.layers.len() {
        let (rows, cols) = mlp.layers[layer].weights.dim();
        let mut layer_error = 0.0f64;
        for row in 0..rows {
            for col in 0..cols {
                let original = mlp.layers[layer].weights[[row, col]];

                mlp.layers[layer].weights[[row, col]] = original + EPSILON;
                let (output_plus, _) = mlp.forward_seeded(inputs, &seeds)?;
                let cost_plus = cross_entropy(targets, output_plus.view());

                mlp.layers[layer].weights[[row, col]] = original - EPSILON;
                let (output_minus, _) = mlp.forward_seeded(inputs, &seeds)?;
                let cost_minus = cross_entropy(targets, output_minus.view());

                mlp.layers[layer].weights[[row, col]] = original;

                let numeric = (cost_plus - cost_minus) / (2.0 * EPSILON);
                let analytic_entry = analytic[layer][[row, col]];
                let relative_error = (numeric - analytic_entry).abs()
                    / (numeric.abs() + analytic_entry.abs() + 1e-10);
                layer_error += relative_error;
                if relative_error > TOLERANCE {
                    report.mismatches.push(GradientMismatch {
                        layer,
                        row,
                        col,
                        analytic: analytic_entry,
                        numeric,
                        relative_error,
                    });
                }
            }
        }
        report.layer_error_totals.push(layer_error);
    }

    Ok(report)
}
