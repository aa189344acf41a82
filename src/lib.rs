//! # Birdshot - Reinforcement Learning for Trajectory Targeting
//!
//! Birdshot trains an agent to clear a fixed set of point targets ("pigs")
//! with as few shots as possible. A shot is a trajectory `y = a·x² + b·x`;
//! it destroys every remaining target within a small tolerance of the curve.
//!
//! ## Key Features
//!
//! - **Deterministic environment**: tolerance-based hit testing over a canonically ordered target set
//! - **Tabular Q-learning**: exact values over a discrete `(a, b)` grid
//! - **Value-function approximation**: online and target regressors, replay buffer, epsilon decay
//! - **Evaluation**: greedy shots-to-clear, compared against the exact optimum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use birdshot::action::DiscreteGrid;
//! use birdshot::config::TrainerConfig;
//! use birdshot::targets::read_targets;
//! use birdshot::trainer::{RunBudget, Trainer};
//!
//! let pigs = read_targets("pigs.txt").unwrap();
//! let config = TrainerConfig::default();
//! let mut trainer = Trainer::tabular(pigs, DiscreteGrid::standard(), &config).unwrap();
//! let report = trainer.run(&RunBudget::new(20_000).with_eval_every(4_000)).unwrap();
//! println!("{} shots", report.final_evaluation.shots);
//! ```
//!
//! ## Module Organization
//!
//! - [`action`] - Trajectory coefficients and action spaces
//! - [`activations`] - Activation functions for the regressor
//! - [`agent`] - Tabular, approximate and random agents
//! - [`config`] - Trainer configuration and validation
//! - [`encoding`] - State encoders for each learner
//! - [`environment`] - The reset/step targeting environment
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`metrics`] - Training metrics and tracking
//! - [`network`] - Feed-forward regressor
//! - [`optimal`] - Exact minimum shots-to-clear
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Experience replay for the approximate learner
//! - [`targets`] - Targets, target sets and coordinate-list reading
//! - [`trainer`] - Training loop and evaluation

pub mod action;
pub mod activations;
pub mod agent;
pub mod config;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod optimal;
pub mod optimizer;
pub mod replay_buffer;
pub mod targets;
pub mod trainer;

#[cfg(test)]
mod tests;
