//! # Activation Functions Module
//!
//! This module provides the activation functions used by the network layers.
//! The set is closed: configuration names resolve to enum variants at load
//! time, so an unknown activation is rejected before any layer is built.
//!
//! ## Available Activations
//!
//! - **Sigmoid**: `1 / (1 + e^(-x))` - Outputs between 0 and 1
//! - **RectifiedLinear**: `max(0, x)` - Cheap and robust for hidden layers
//! - **Softmax**: row-normalized exponential - Output layer for classification
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use minerva::activations::Activation;
//! use ndarray::array;
//!
//! let sigmoid = Activation::Sigmoid;
//! let mut data = array![[1.0, -0.5], [0.0, 2.0]];
//! sigmoid.apply_batch(&mut data);
//! ```

pub mod functions;

pub use functions::Activation;
