//! Network layers: the fully connected layer and its dropout strategies.

pub mod dense;
pub mod dropout;

pub use dense::{DenseLayer, LayerCache, Phase};
pub use dropout::{dpp_mask, random_mask, DropoutKind};
