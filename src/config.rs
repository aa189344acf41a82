//! # Trainer Configuration
//!
//! A single `TrainerConfig` carries the options of both learners. Values are
//! checked by [`TrainerConfig::validate`], which every agent and trainer
//! constructor calls, so an out-of-range value is a fatal error before the
//! first episode runs.
//!
//! Configurations can be read from JSON. Missing fields take their defaults:
//!
//! ```rust
//! use birdshot::config::{RewardMode, TrainerConfig};
//!
//! let config = TrainerConfig::from_json_str(r#"{ "gamma": 0.7, "reward_mode": "hits" }"#).unwrap();
//! assert_eq!(config.gamma, 0.7);
//! assert_eq!(config.reward_mode, RewardMode::Hits);
//! assert_eq!(config.batch_size, 32);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BirdshotError, Result};

/// How a shot is scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Reward is the number of targets destroyed.
    Hits,
    /// Reward is the number of targets destroyed minus one per shot.
    #[default]
    HitsMinusOne,
}

impl RewardMode {
    /// Reward for a shot that destroyed `hits` targets.
    pub fn reward(&self, hits: usize) -> f64 {
        match self {
            RewardMode::Hits => hits as f64,
            RewardMode::HitsMinusOne => hits as f64 - 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Discount factor
    pub gamma: f64,
    /// Step size of the tabular Bellman update
    pub learning_rate: f64,
    /// Fixed exploration rate of the tabular learner
    pub epsilon: f64,
    pub epsilon_start: f64,
    pub epsilon_end: f64,
    /// Geometric decay applied after every completed episode
    pub epsilon_decay: f64,
    pub batch_size: usize,
    /// Target network refresh cadence, in episodes
    pub sync_interval: usize,
    pub hit_tolerance: f64,
    pub reward_mode: RewardMode,
    /// Replay buffer capacity; the oldest experience is evicted when full
    pub buffer_capacity: usize,
    pub network_learning_rate: f32,
    pub hidden_layers: Vec<usize>,
    /// Largest target count the fixed-length state vector can hold
    pub max_targets: usize,
    /// Standard deviation of Gaussian exploration over continuous actions
    pub action_std: f64,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            gamma: 0.9,
            learning_rate: 0.01,
            epsilon: 0.1,
            epsilon_start: 1.0,
            epsilon_end: 0.01,
            epsilon_decay: 0.995,
            batch_size: 32,
            sync_interval: 10,
            hit_tolerance: 0.01,
            reward_mode: RewardMode::HitsMinusOne,
            buffer_capacity: 10_000,
            network_learning_rate: 1e-3,
            hidden_layers: vec![64, 64],
            max_targets: 20,
            action_std: 1.0,
            seed: None,
        }
    }
}

impl TrainerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_schedule(mut self, start: f64, end: f64, decay: f64) -> Self {
        self.epsilon_start = start;
        self.epsilon_end = end;
        self.epsilon_decay = decay;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_sync_interval(mut self, sync_interval: usize) -> Self {
        self.sync_interval = sync_interval;
        self
    }

    pub fn with_hit_tolerance(mut self, hit_tolerance: f64) -> Self {
        self.hit_tolerance = hit_tolerance;
        self
    }

    pub fn with_reward_mode(mut self, reward_mode: RewardMode) -> Self {
        self.reward_mode = reward_mode;
        self
    }

    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    pub fn with_hidden_layers(mut self, hidden_layers: &[usize]) -> Self {
        self.hidden_layers = hidden_layers.to_vec();
        self
    }

    pub fn with_max_targets(mut self, max_targets: usize) -> Self {
        self.max_targets = max_targets;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every value against its sane range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(invalid("gamma", format!("must be in [0, 1), got {}", self.gamma)));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(invalid(
                "learning_rate",
                format!("must be in (0, 1], got {}", self.learning_rate),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid("epsilon", format!("must be in [0, 1], got {}", self.epsilon)));
        }
        if !(self.epsilon_start > 0.0 && self.epsilon_start <= 1.0) {
            return Err(invalid(
                "epsilon_start",
                format!("must be in (0, 1], got {}", self.epsilon_start),
            ));
        }
        if !(self.epsilon_end > 0.0 && self.epsilon_end <= self.epsilon_start) {
            return Err(invalid(
                "epsilon_end",
                format!(
                    "must be in (0, epsilon_start = {}], got {}",
                    self.epsilon_start, self.epsilon_end
                ),
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(invalid(
                "epsilon_decay",
                format!("must be in (0, 1], got {}", self.epsilon_decay),
            ));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be at least 1".to_string()));
        }
        if self.sync_interval == 0 {
            return Err(invalid("sync_interval", "must be at least 1".to_string()));
        }
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance > 0.0) {
            return Err(invalid(
                "hit_tolerance",
                format!("must be positive and finite, got {}", self.hit_tolerance),
            ));
        }
        // training starts once the buffer holds more than one batch
        if self.buffer_capacity <= self.batch_size {
            return Err(invalid(
                "buffer_capacity",
                format!(
                    "must exceed batch_size ({}), got {}",
                    self.batch_size, self.buffer_capacity
                ),
            ));
        }
        if !(self.network_learning_rate.is_finite() && self.network_learning_rate > 0.0) {
            return Err(invalid(
                "network_learning_rate",
                format!("must be positive, got {}", self.network_learning_rate),
            ));
        }
        if self.hidden_layers.iter().any(|&size| size == 0) {
            return Err(invalid("hidden_layers", "every layer needs at least one unit".to_string()));
        }
        if self.max_targets == 0 {
            return Err(invalid("max_targets", "must be at least 1".to_string()));
        }
        if !(self.action_std.is_finite() && self.action_std > 0.0) {
            return Err(invalid(
                "action_std",
                format!("must be positive, got {}", self.action_std),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: String) -> BirdshotError {
    BirdshotError::invalid_parameter(name.to_string(), reason)
}
