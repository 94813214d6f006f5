//! # Minerva - Digit Classification From Scratch
//!
//! Minerva implements two supervised-learning algorithms for handwritten
//! digit classification without an ML framework: a multi-layer perceptron
//! trained by mini-batch gradient descent with backpropagation and momentum,
//! and a greedy information-gain decision tree. The MLP supports uniform
//! random dropout and a determinantal-point-process-based structured dropout
//! that retains a diverse subset of units instead of an independent random
//! one.
//!
//! ## Key Features
//!
//! - **Layered forward/backward computation** with the bias folded into each
//!   weight matrix and explicit per-pass caches
//! - **Blended momentum updates** with a persistent buffer per layer
//! - **Dropout**: uniform Bernoulli masks or k-DPP structured unit selection,
//!   inverted at test time by weight scaling
//! - **Numerical gradient checking** of the backpropagation implementation
//! - **Reproducibility**: every stochastic operation draws from an
//!   explicitly passed, seedable generator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minerva::activations::Activation;
//! use minerva::network::{DropoutSettings, Mlp};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use ndarray::array;
//!
//! let mut rng = StdRng::seed_from_u64(1234);
//! let mut mlp = Mlp::new(
//!     &[4, 8, 2],
//!     &[Activation::Sigmoid, Activation::Softmax],
//!     DropoutSettings::disabled(),
//!     &mut rng,
//! ).unwrap();
//!
//! let x = array![[0.0, 1.0, 0.0, 1.0]];
//! let y = array![[1.0, 0.0]];
//! mlp.train(x.view(), y.view(), 0.1, 0.0, &mut rng).unwrap();
//! let prediction = mlp.predict(x.view()).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (sigmoid, rectified linear, softmax)
//! - [`config`] - Experiment configuration parsing and validation
//! - [`data`] - Dataset matrices, one-hot labels, MNIST IDX reader
//! - [`debug`] - Finite-difference gradient checking
//! - [`dpp`] - k-determinantal-point-process sampling
//! - [`error`] - Error types and result handling
//! - [`layers`] - The dense layer and its dropout strategies
//! - [`metrics`] - Misclassification counts and related metrics
//! - [`network`] - The multi-layer perceptron
//! - [`reporting`] - Per-epoch training records and sinks
//! - [`trainer`] - The mini-batch training driver
//! - [`tree`] - The information-gain decision tree

pub mod activations;
pub mod config;
pub mod data;
pub mod debug;
pub mod dpp;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod reporting;
pub mod trainer;
pub mod tree;

#[cfg(test)]
mod tests;
