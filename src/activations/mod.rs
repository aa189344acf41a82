//! # Activation Functions Module
//!
//! The regressor only needs two activations:
//!
//! - **ReLU**: `max(0, x)` on the hidden layers
//! - **Linear**: identity on the output layer, so trajectory coefficients are unbounded

pub mod functions;

pub use functions::Activation;
