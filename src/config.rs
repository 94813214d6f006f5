use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::activations::Activation;
use crate::error::{MinervaError, Result};
use crate::layers::DropoutKind;

fn default_dropout_prob() -> f64 {
    0.5
}

fn default_dropout_input_prob() -> f64 {
    0.2
}

fn default_rate_decay() -> f64 {
    1.0
}

/// Network-construction parameters: the `net` section of an experiment file.
///
/// Activation and dropout names deserialize into closed enums, so an unknown
/// name fails at parse time instead of at some later lookup.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub layer_sizes: Vec<usize>,
    pub activations: Vec<Activation>,
    #[serde(default)]
    pub dropout_type: DropoutKind,
    #[serde(default = "default_dropout_prob")]
    pub dropout_prob: f64,
    #[serde(default = "default_dropout_input_prob")]
    pub dropout_input_prob: f64,
    /// Accepted for compatibility with older experiment files; the
    /// weight-length constraint is disabled.
    #[serde(default)]
    pub w_len_limit: Option<f64>,
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(MinervaError::invalid_parameter(
                "layer_sizes",
                "need at least an input and an output size",
            ));
        }
        if self.activations.len() != self.layer_sizes.len() - 1 {
            return Err(MinervaError::dimension_mismatch(
                format!("{} activations", self.layer_sizes.len() - 1),
                format!("{} activations", self.activations.len()),
            ));
        }
        if self.layer_sizes.iter().any(|&size| size == 0) {
            return Err(MinervaError::invalid_parameter(
                "layer_sizes",
                "layer sizes must be nonzero",
            ));
        }
        for (name, prob) in [
            ("dropout_prob", self.dropout_prob),
            ("dropout_input_prob", self.dropout_input_prob),
        ] {
            if !(0.0..1.0).contains(&prob) {
                return Err(MinervaError::invalid_parameter(
                    name,
                    "dropout probability must lie in [0, 1)",
                ));
            }
        }
        Ok(())
    }
}

/// Training-loop parameters: the `experiment` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub num_epochs: usize,
    pub minibatch_size: usize,
    pub learning_rate: f64,
    #[serde(default = "default_rate_decay")]
    pub rate_decay: f64,
    #[serde(default)]
    pub momentum_initial: f64,
    #[serde(default)]
    pub momentum_final: f64,
    /// Epochs over which momentum ramps linearly from initial to final.
    #[serde(default)]
    pub momentum_t: usize,
    /// Grace epochs to keep training after the first zero-error epoch.
    #[serde(default)]
    pub num_epochs_after_overfit: usize,
    #[serde(default)]
    pub check_gradient: bool,
    /// Restrict the dataset to these class labels, when present.
    #[serde(default)]
    pub digits: Option<Vec<usize>>,
    #[serde(default)]
    pub data_path: Option<String>,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.minibatch_size == 0 {
            return Err(MinervaError::invalid_parameter(
                "minibatch_size",
                "must be nonzero",
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(MinervaError::invalid_parameter(
                "learning_rate",
                "must be positive",
            ));
        }
        if self.rate_decay <= 0.0 {
            return Err(MinervaError::invalid_parameter(
                "rate_decay",
                "must be positive",
            ));
        }
        for (name, momentum) in [
            ("momentum_initial", self.momentum_initial),
            ("momentum_final", self.momentum_final),
        ] {
            if !(0.0..1.0).contains(&momentum) {
                return Err(MinervaError::invalid_parameter(
                    name,
                    "momentum must lie in [0, 1)",
                ));
            }
        }
        Ok(())
    }
}

/// A full experiment description: network plus training loop.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub net: NetworkConfig,
    pub experiment: ExperimentConfig,
}

impl Config {
    /// Parse and validate a JSON experiment description.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.net.validate()?;
        self.experiment.validate()
    }
}
