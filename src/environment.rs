//! # Targeting Environment
//!
//! Wraps a [`TargetSet`] behind a `reset`/`step` interface. A shot removes
//! every remaining target within the hit tolerance of its trajectory, scores
//! the hits according to the configured [`RewardMode`], and ends the episode
//! once nothing is left.
//!
//! ```rust
//! use birdshot::action::Action;
//! use birdshot::config::RewardMode;
//! use birdshot::encoding::TableEncoder;
//! use birdshot::environment::TargetingEnv;
//!
//! let mut env = TargetingEnv::new(
//!     vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)],
//!     TableEncoder,
//!     0.01,
//!     RewardMode::Hits,
//! ).unwrap();
//! env.reset();
//! let step = env.step(&Action::new(1.0, 0.0));
//! assert_eq!(step.reward, 3.0);
//! assert!(step.done);
//! ```

use crate::action::Action;
use crate::config::{RewardMode, TrainerConfig};
use crate::encoding::StateEncoder;
use crate::error::{BirdshotError, Result};
use crate::targets::{Target, TargetSet};

/// Outcome of a single shot.
#[derive(Clone, Debug)]
pub struct Step<S> {
    pub next_state: S,
    pub reward: f64,
    pub done: bool,
    /// Targets destroyed by this shot
    pub hits: Vec<Target>,
}

/// The transition only depends on the remaining targets and the action;
/// nothing else is carried between steps or across resets.
#[derive(Clone, Debug)]
pub struct TargetingEnv<E: StateEncoder> {
    targets: TargetSet,
    encoder: E,
    hit_tolerance: f64,
    reward_mode: RewardMode,
}

impl<E: StateEncoder> TargetingEnv<E> {
    pub fn new<I, T>(targets: I, encoder: E, hit_tolerance: f64, reward_mode: RewardMode) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        if !(hit_tolerance.is_finite() && hit_tolerance > 0.0) {
            return Err(BirdshotError::invalid_parameter(
                "hit_tolerance".to_string(),
                format!("must be positive and finite, got {}", hit_tolerance),
            ));
        }
        let targets = TargetSet::new(targets);
        if let Some(max) = encoder.capacity() {
            if targets.initial().len() > max {
                return Err(BirdshotError::TooManyTargets {
                    count: targets.initial().len(),
                    max,
                });
            }
        }
        Ok(TargetingEnv {
            targets,
            encoder,
            hit_tolerance,
            reward_mode,
        })
    }

    /// Build from the tolerance and reward mode of a validated configuration.
    pub fn from_config<I, T>(targets: I, encoder: E, config: &TrainerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        config.validate()?;
        Self::new(targets, encoder, config.hit_tolerance, config.reward_mode)
    }

    /// Restore every target and return the initial state.
    pub fn reset(&mut self) -> E::State {
        self.targets.restore();
        self.state()
    }

    /// Fire one shot along `y = a·x² + b·x`.
    pub fn step(&mut self, action: &Action) -> Step<E::State> {
        let hits = self.targets.strike(action, self.hit_tolerance);
        Step {
            next_state: self.state(),
            reward: self.reward_mode.reward(hits.len()),
            done: self.targets.is_cleared(),
            hits,
        }
    }

    pub fn state(&self) -> E::State {
        self.encoder.encode(self.targets.remaining())
    }

    pub fn remaining(&self) -> &[Target] {
        self.targets.remaining()
    }

    pub fn initial(&self) -> &[Target] {
        self.targets.initial()
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn hit_tolerance(&self) -> f64 {
        self.hit_tolerance
    }

    pub fn reward_mode(&self) -> RewardMode {
        self.reward_mode
    }
}
