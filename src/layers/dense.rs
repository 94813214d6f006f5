use ndarray::{s, Array2, Axis};
use ndarray_rand::RandomExt;
use rand::{Rng, RngCore};
use rand_distr::Normal;

use crate::activations::Activation;
use crate::error::{MinervaError, Result};
use super::dropout::{dpp_mask, random_mask, DropoutKind};

/// Standard deviation of the Gaussian weight initialization.
const WEIGHT_SIGMA: f64 = 0.01;

/// Which direction data is flowing through a dropout-enabled layer.
/// Training draws masks from the supplied generator; testing rescales the
/// non-bias weights instead and never touches the RNG.
pub enum Phase<'a> {
    Train { rng: &'a mut dyn RngCore },
    Test,
}

/// Per-forward-pass state consumed by the immediately following backward
/// pass: the bias-augmented (and masked) input that was actually multiplied
/// into the weights, and the activation derivative at the pre-activation.
/// Returned by value so a backward pass can never observe stale state from
/// an earlier forward call.
pub struct LayerCache {
    pub inputs: Array2<f64>,
    pub derivative: Array2<f64>,
}

/// A fully connected layer. The bias is folded into the weight matrix as its
/// last row, so `weights` has shape `(inputs + 1) x outputs` and every input
/// batch arrives with a constant-1 column appended.
pub struct DenseLayer {
    pub weights: Array2<f64>,
    pub activation: Activation,
    pub dropout: DropoutKind,
}

impl DenseLayer {
    /// Create a new layer for `input_size` non-bias inputs and `output_size`
    /// outputs. Weights are drawn from N(0, 0.01^2) through the caller's
    /// generator, so construction is reproducible under a fixed seed.
    pub fn new<R: Rng>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        dropout: DropoutKind,
        rng: &mut R,
    ) -> Self {
        let distribution = Normal::new(0.0, WEIGHT_SIGMA).expect("weight sigma is positive");
        let weights = Array2::random_using((input_size + 1, output_size), distribution, rng);
        DenseLayer {
            weights,
            activation,
            dropout,
        }
    }

    pub fn with_weights(mut self, weights: Array2<f64>) -> Self {
        assert_eq!(weights.dim(), self.weights.dim());
        self.weights = weights;
        self
    }

    /// Number of non-bias inputs.
    pub fn input_size(&self) -> usize {
        self.weights.nrows() - 1
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Compute the layer activation for a bias-augmented input batch.
    ///
    /// With dropout bound and `Phase::Train`, the strategy masks the non-bias
    /// input columns in place before the weight product. With `Phase::Test`,
    /// the non-bias weights are scaled by `(1 - prob)` and the bias
    /// contribution is added unscaled. Without dropout both phases are the
    /// plain product `x . W`.
    pub fn compute_activation(
        &self,
        x: Array2<f64>,
        prob: f64,
        phase: Phase<'_>,
    ) -> Result<(Array2<f64>, LayerCache)> {
        if x.ncols() != self.weights.nrows() {
            return Err(MinervaError::dimension_mismatch(
                format!("bias-augmented input width {}", self.weights.nrows()),
                format!("input width {}", x.ncols()),
            ));
        }

        let mut prev_z = x;
        let a = if self.dropout == DropoutKind::NoDropout {
            prev_z.dot(&self.weights)
        } else {
            match phase {
                Phase::Train { rng } => {
                    match self.dropout {
                        DropoutKind::Random => random_mask(&mut prev_z, prob, rng),
                        DropoutKind::Dpp => dpp_mask(&mut prev_z, &self.weights, prob, rng),
                        DropoutKind::NoDropout => {}
                    }
                    prev_z.dot(&self.weights)
                }
                Phase::Test => {
                    let units = self.input_size();
                    let unit_weights = self.weights.slice(s![..-1, ..]);
                    let bias_weights = self.weights.row(units);
                    let mut a = prev_z.slice(s![.., ..units]).dot(&unit_weights) * (1.0 - prob);
                    // The bias input stays unscaled.
                    let bias_inputs = prev_z.column(units).to_owned();
                    for (mut row, &bias_in) in a.axis_iter_mut(Axis(0)).zip(bias_inputs.iter()) {
                        row.scaled_add(bias_in, &bias_weights);
                    }
                    a
                }
            }
        };

        let derivative = self.activation.derivative_batch(a.view());
        let mut z = a;
        self.activation.apply_batch(&mut z);

        Ok((
            z,
            LayerCache {
                inputs: prev_z,
                derivative,
            },
        ))
    }
}
