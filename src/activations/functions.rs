use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// An enumeration of the activation functions that can be used in a network
/// layer. The serde names match the strings accepted in configuration files
/// (`sigmoid`, `rectified_linear`, `softmax`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    RectifiedLinear,
    Softmax,
}

impl Activation {
    /// Apply the activation function to a batch of pre-activations in-place.
    /// Sigmoid and rectified-linear are elementwise; softmax operates on each
    /// row independently, subtracting the row maximum before exponentiating
    /// so large logits cannot overflow.
    pub fn apply_batch(&self, inputs: &mut Array2<f64>) {
        match self {
            Activation::Sigmoid => {
                inputs.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
            }
            Activation::RectifiedLinear => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Softmax => {
                for mut row in inputs.axis_iter_mut(Axis(0)) {
                    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    row.mapv_inplace(|v| (v - max).exp());
                    let sum = row.sum();
                    row.mapv_inplace(|v| v / sum);
                }
            }
        }
    }

    /// Compute the local derivative of the activation function for a batch of
    /// pre-activations.
    ///
    /// Softmax returns all ones: paired with a cross-entropy cost the output
    /// delta is `output - Y` directly, so no Jacobian is applied there.
    pub fn derivative_batch(&self, inputs: ArrayView2<f64>) -> Array2<f64> {
        match self {
            Activation::Sigmoid => inputs.mapv(|v| {
                let sigmoid = 1.0 / (1.0 + (-v).exp());
                sigmoid * (1.0 - sigmoid)
            }),
            Activation::RectifiedLinear => {
                inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
            }
            Activation::Softmax => Array2::ones(inputs.dim()),
        }
    }
}
