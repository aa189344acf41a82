//! # Learning Agents
//!
//! Every learner implements [`Agent`], so the trainer can drive either one
//! through the same `act → step → observe` loop.
//!
//! ## Available Agents
//!
//! - **TabularAgent**: exact Q-learning over a [`DiscreteGrid`](crate::action::DiscreteGrid)
//!   - Lazily populated table keyed by the canonical remaining-target set
//!   - Fixed epsilon-greedy exploration, first-in-order argmax
//! - **DqnAgent**: value-function approximation with continuous actions
//!   - Online and target regressors, the target refreshed every `sync_interval` episodes
//!   - Bounded replay buffer, uniform minibatches
//!   - Geometric epsilon decay after each episode
//! - **RandomAgent**: uniform random shots, the baseline a learner has to beat
//!
//! ## Example Usage
//!
//! ```rust
//! use birdshot::action::DiscreteGrid;
//! use birdshot::agent::{Agent, TabularAgent};
//! use birdshot::config::TrainerConfig;
//! use birdshot::encoding::{StateEncoder, TableEncoder};
//! use birdshot::targets::Target;
//!
//! let grid = DiscreteGrid::new(-1.0..0.0, 0.0..2.0, 0.5, 2).unwrap();
//! let config = TrainerConfig::default().with_seed(1);
//! let mut agent = TabularAgent::new(grid, &config).unwrap();
//!
//! let state = TableEncoder.encode(&[Target::new(1.0, 0.5)]);
//! let choice = agent.act(&state, true).unwrap();
//! let action = agent.trajectory(&choice).unwrap();
//! assert!(action.a < 0.0);
//! ```

pub mod dqn;
pub mod random;
pub mod tabular;
pub mod traits;

pub use dqn::DqnAgent;
pub use random::RandomAgent;
pub use tabular::{QTable, TabularAgent};
pub use traits::{Agent, Transition};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator when a seed is configured, entropy otherwise.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
