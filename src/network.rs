use ndarray::{s, Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::activations::Activation;
use crate::config::NetworkConfig;
use crate::error::{MinervaError, Result};
use crate::layers::{DenseLayer, DropoutKind, LayerCache, Phase};
use crate::metrics::argmax;

/// Dropout configuration shared by the whole network: the strategy every
/// layer binds, the probability for hidden layers, and the (typically lower)
/// probability for the input layer.
#[derive(Clone, Copy, Debug)]
pub struct DropoutSettings {
    pub kind: DropoutKind,
    pub hidden_prob: f64,
    pub input_prob: f64,
}

impl DropoutSettings {
    pub fn disabled() -> Self {
        DropoutSettings {
            kind: DropoutKind::NoDropout,
            hidden_prob: 0.0,
            input_prob: 0.0,
        }
    }
}

enum ForwardMode<'a> {
    Train(&'a mut dyn RngCore),
    Seeded(&'a [u64]),
    Test,
}

/// A multi-layer perceptron: an ordered stack of dense layers plus one
/// persistent momentum buffer per layer. Weights are mutated in place by
/// every training step; the momentum buffers live as long as the network.
pub struct Mlp {
    pub layers: Vec<DenseLayer>,
    current_grad: Vec<Array2<f64>>,
    dropout: DropoutSettings,
}

impl Mlp {
    /// Create a network from consecutive layer sizes and one activation per
    /// weight layer. Weight matrices are drawn through `rng` at
    /// construction; momentum buffers start at zero.
    pub fn new<R: Rng>(
        layer_sizes: &[usize],
        activations: &[Activation],
        dropout: DropoutSettings,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(MinervaError::invalid_parameter(
                "layer_sizes",
                "need at least an input and an output size",
            ));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(MinervaError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(MinervaError::invalid_parameter(
                "layer_sizes",
                "layer sizes must be nonzero",
            ));
        }
        for (name, prob) in [
            ("hidden_prob", dropout.hidden_prob),
            ("input_prob", dropout.input_prob),
        ] {
            if !(0.0..1.0).contains(&prob) {
                return Err(MinervaError::invalid_parameter(
                    name,
                    "dropout probability must lie in [0, 1)",
                ));
            }
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                DenseLayer::new(window[0], window[1], activation, dropout.kind, rng)
            })
            .collect::<Vec<_>>();
        let current_grad = layers
            .iter()
            .map(|layer| Array2::zeros(layer.weights.dim()))
            .collect();

        Ok(Mlp {
            layers,
            current_grad,
            dropout,
        })
    }

    /// Build a network from a validated configuration.
    pub fn from_config<R: Rng>(config: &NetworkConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let dropout = DropoutSettings {
            kind: config.dropout_type,
            hidden_prob: config.dropout_prob,
            input_prob: config.dropout_input_prob,
        };
        Mlp::new(&config.layer_sizes, &config.activations, dropout, rng)
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(DenseLayer::input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(DenseLayer::output_size).unwrap_or(0)
    }

    /// The persistent per-layer momentum buffers.
    pub fn momentum_buffers(&self) -> &[Array2<f64>] {
        &self.current_grad
    }

    fn layer_prob(&self, index: usize) -> f64 {
        if index == 0 {
            self.dropout.input_prob
        } else {
            self.dropout.hidden_prob
        }
    }

    fn propagate(
        &self,
        inputs: ArrayView2<f64>,
        mut mode: ForwardMode<'_>,
    ) -> Result<(Array2<f64>, Vec<LayerCache>)> {
        if inputs.ncols() != self.input_size() {
            return Err(MinervaError::dimension_mismatch(
                format!("{} features", self.input_size()),
                format!("{} features", inputs.ncols()),
            ));
        }

        let mut z = inputs.to_owned();
        let mut caches = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let x = append_bias_column(&z);
            let prob = self.layer_prob(i);
            let (next, cache) = match &mut mode {
                ForwardMode::Train(rng) => {
                    layer.compute_activation(x, prob, Phase::Train { rng: &mut **rng })?
                }
                ForwardMode::Seeded(seeds) => {
                    let mut layer_rng = StdRng::seed_from_u64(seeds[i]);
                    layer.compute_activation(x, prob, Phase::Train { rng: &mut layer_rng })?
                }
                ForwardMode::Test => layer.compute_activation(x, prob, Phase::Test)?,
            };
            caches.push(cache);
            z = next;
        }
        Ok((z, caches))
    }

    /// Training-phase forward pass: appends a constant-1 bias column before
    /// each layer and applies that layer's dropout strategy (the first layer
    /// uses the input probability, later layers the hidden one). Returns the
    /// predicted distribution per sample and the per-layer caches the
    /// backward pass consumes.
    pub fn forward_batch(
        &self,
        inputs: ArrayView2<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<(Array2<f64>, Vec<LayerCache>)> {
        self.propagate(inputs, ForwardMode::Train(rng))
    }

    /// Training-phase forward pass with one fixed mask seed per layer, so
    /// repeated calls reproduce bit-identical dropout masks. Used by
    /// gradient checking.
    pub fn forward_seeded(
        &self,
        inputs: ArrayView2<f64>,
        seeds: &[u64],
    ) -> Result<(Array2<f64>, Vec<LayerCache>)> {
        if seeds.len() != self.layers.len() {
            return Err(MinervaError::dimension_mismatch(
                format!("{} seeds", self.layers.len()),
                format!("{} seeds", seeds.len()),
            ));
        }
        self.propagate(inputs, ForwardMode::Seeded(seeds))
    }

    /// Testing-phase forward pass: no masks are drawn, dropout-enabled
    /// layers scale their non-bias weights by `(1 - prob)` instead, and
    /// weights are never mutated.
    pub fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (output, _) = self.propagate(inputs, ForwardMode::Test)?;
        Ok(output)
    }

    /// Per-layer weight gradients for one batch. The output delta is
    /// `output - Y` (softmax paired with cross-entropy); each hidden delta
    /// folds that layer's stored activation derivative with the next layer's
    /// non-bias weights; each gradient is `prevZ^T . delta` in the shape of
    /// that layer's weight matrix.
    pub fn calculate_gradient(
        &self,
        output: &Array2<f64>,
        targets: ArrayView2<f64>,
        caches: &[LayerCache],
    ) -> Vec<Array2<f64>> {
        let error = output - &targets;

        let mut deltas = vec![error];
        for i in (0..self.layers.len() - 1).rev() {
            let unit_weights = self.layers[i + 1].weights.slice(s![..-1, ..]);
            let propagated = deltas[0].dot(&unit_weights.t());
            deltas.insert(0, &caches[i].derivative * &propagated);
        }

        caches
            .iter()
            .zip(&deltas)
            .map(|(cache, delta)| cache.inputs.t().dot(delta))
            .collect()
    }

    /// Update the momentum buffers and step the weights. The blended update
    /// is preserved exactly:
    /// `buffer = momentum * buffer - (1 - momentum) * eta * gradient`,
    /// then `W += buffer`.
    pub fn backpropagate(
        &mut self,
        output: &Array2<f64>,
        targets: ArrayView2<f64>,
        caches: &[LayerCache],
        eta: f64,
        momentum: f64,
    ) {
        let gradients = self.calculate_gradient(output, targets, caches);
        for (i, gradient) in gradients.into_iter().enumerate() {
            let buffer = &mut self.current_grad[i];
            *buffer *= momentum;
            buffer.scaled_add(-(1.0 - momentum) * eta, &gradient);
            self.layers[i].weights += &self.current_grad[i];
        }
    }

    /// One unit of training work: a training-phase forward pass followed by
    /// one backpropagation step at the given learning rate and momentum.
    pub fn train(
        &mut self,
        inputs: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        eta: f64,
        momentum: f64,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        if inputs.nrows() != targets.nrows() {
            return Err(MinervaError::dimension_mismatch(
                format!("{} label rows", inputs.nrows()),
                format!("{} label rows", targets.nrows()),
            ));
        }
        if targets.ncols() != self.output_size() {
            return Err(MinervaError::dimension_mismatch(
                format!("{} classes", self.output_size()),
                format!("{} classes", targets.ncols()),
            ));
        }
        let (output, caches) = self.propagate(inputs, ForwardMode::Train(rng))?;
        self.backpropagate(&output, targets, &caches, eta, momentum);
        Ok(())
    }
}

/// Cross-entropy cost of predicted distributions against one-hot targets:
/// `-sum ln(p of the true class)` over the batch. A log of zero would be
/// -inf; such terms are clamped to contribute nothing instead of poisoning
/// the sum.
pub fn cross_entropy(targets: ArrayView2<f64>, predictions: ArrayView2<f64>) -> f64 {
    let mut cost = 0.0f64;
    for (target_row, prediction_row) in targets.outer_iter().zip(predictions.outer_iter()) {
        let class = argmax(target_row);
        let log_p = prediction_row[class].ln();
        if log_p.is_finite() {
            cost -= log_p;
        }
    }
    cost
}

fn append_bias_column(x: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = x.dim();
    let mut augmented = Array2::ones((rows, cols + 1));
    augmented.slice_mut(s![.., ..cols]).assign(x);
    augmented
}
