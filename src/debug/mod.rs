//! Diagnostic tooling for verifying the backpropagation implementation.

pub mod gradient_check;

pub use gradient_check::{check_gradients, GradientCheckReport, GradientMismatch};
