use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use super::seeded_rng;
use super::traits::{Agent, Transition};
use crate::action::{Action, ContinuousSpace};
use crate::config::TrainerConfig;
use crate::error::{BirdshotError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::replay_buffer::{Experience, ReplayBuffer};

/// Value-function approximation agent with a target network.
///
/// The online network maps a padded state vector straight to the trajectory
/// coefficients `(a, b)`. Training follows the DQN recipe:
/// - every transition goes into a bounded replay buffer
/// - once the buffer holds more than `batch_size` experiences, each step trains
///   the online network on a uniform minibatch
/// - targets are `r + γ · max(target(s')) · (1 − done)`, broadcast across the
///   output components
/// - the target network is overwritten with the online weights every
///   `sync_interval` completed episodes
/// - epsilon decays geometrically after each completed episode
///
/// # Example
///
/// ```rust
/// use birdshot::agent::{Agent, DqnAgent};
/// use birdshot::config::TrainerConfig;
/// use ndarray::Array1;
///
/// let config = TrainerConfig::default().with_hidden_layers(&[16]).with_seed(5);
/// let mut agent = DqnAgent::new(8, &config).unwrap();
/// let output = agent.act(&Array1::zeros(8), false).unwrap();
/// assert_eq!(output.len(), 2);
/// ```
pub struct DqnAgent {
    /// Main network for action selection
    pub q_network: NeuralNetwork,

    /// Target network for stable bootstrap targets
    pub target_network: NeuralNetwork,

    buffer: ReplayBuffer,
    space: ContinuousSpace,
    epsilon: f64,
    epsilon_end: f64,
    epsilon_decay: f64,
    gamma: f32,
    learning_rate: f32,
    batch_size: usize,
    sync_interval: usize,
    episodes_completed: usize,

    /// Number of training steps performed
    pub train_steps: usize,

    rng: StdRng,
}

impl DqnAgent {
    pub fn new(state_size: usize, config: &TrainerConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let optimizer = OptimizerWrapper::Adam(Adam::default());
        let q_network = NeuralNetwork::regressor(
            state_size,
            &config.hidden_layers,
            ContinuousSpace::DIM,
            optimizer,
            &mut rng,
        )?;
        let target_network = q_network.clone();

        Ok(DqnAgent {
            q_network,
            target_network,
            buffer: ReplayBuffer::new(config.buffer_capacity),
            space: ContinuousSpace::new(config.action_std)?,
            epsilon: config.epsilon_start,
            epsilon_end: config.epsilon_end,
            epsilon_decay: config.epsilon_decay,
            gamma: config.gamma as f32,
            learning_rate: config.network_learning_rate,
            batch_size: config.batch_size,
            sync_interval: config.sync_interval,
            episodes_completed: 0,
            train_steps: 0,
            rng,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn episodes_completed(&self) -> usize {
        self.episodes_completed
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Update target network weights from main network
    pub fn sync_target_network(&mut self) {
        self.target_network = self.q_network.clone();
    }

    /// Bootstrap targets for a batch, one row per experience, every column
    /// holding the same value.
    pub fn bootstrap_targets(&self, experiences: &[Experience]) -> Result<Array2<f32>> {
        let next_states = stack_rows(experiences.iter().map(|exp| &exp.next_state))?;
        let next_q_values = self.target_network.forward_batch(next_states.view())?;

        let mut targets = Array2::zeros(next_q_values.dim());
        for (i, exp) in experiences.iter().enumerate() {
            let max_next_q = next_q_values
                .row(i)
                .iter()
                .fold(f32::NEG_INFINITY, |max, &val| max.max(val));
            let not_done = if exp.done { 0.0 } else { 1.0 };
            targets.row_mut(i).fill(exp.reward + self.gamma * max_next_q * not_done);
        }
        Ok(targets)
    }

    /// One gradient step of the online network on a batch. Returns the MSE loss.
    pub fn train_on_batch(&mut self, experiences: &[Experience]) -> Result<f32> {
        if experiences.is_empty() {
            return Err(BirdshotError::EmptyBuffer("No experiences to train on".to_string()));
        }
        let states = stack_rows(experiences.iter().map(|exp| &exp.state))?;
        let targets = self.bootstrap_targets(experiences)?;
        let loss = self
            .q_network
            .train_minibatch(states.view(), targets.view(), self.learning_rate)?;
        self.train_steps += 1;
        Ok(loss)
    }
}

fn stack_rows<'a, I>(rows: I) -> Result<Array2<f32>>
where
    I: ExactSizeIterator<Item = &'a Array1<f32>>,
{
    let count = rows.len();
    let mut width = None;
    let mut data = Vec::new();
    for row in rows {
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(BirdshotError::dimension_mismatch(
                    format!("rows of length {}", w),
                    format!("{}", row.len()),
                ))
            }
            Some(_) => {}
        }
        data.extend(row.iter().copied());
    }
    Array2::from_shape_vec((count, width.unwrap_or(0)), data)
        .map_err(|err| BirdshotError::dimension_mismatch("a rectangular batch".to_string(), err.to_string()))
}

impl Agent for DqnAgent {
    type State = Array1<f32>;
    type Choice = Array1<f32>;

    fn act(&mut self, state: &Array1<f32>, explore: bool) -> Result<Array1<f32>> {
        if explore && self.rng.gen::<f64>() < self.epsilon {
            Ok(self.space.sample_random(&mut self.rng).to_array())
        } else {
            self.q_network.forward(state.view())
        }
    }

    fn trajectory(&self, choice: &Array1<f32>) -> Result<Action> {
        Action::from_output(choice.view())
    }

    fn observe(&mut self, transition: Transition<Array1<f32>, Array1<f32>>) -> Result<Option<f64>> {
        self.buffer.add(Experience {
            state: transition.state,
            action: transition.choice,
            reward: transition.reward as f32,
            next_state: transition.next_state,
            done: transition.done,
        });
        if self.buffer.len() <= self.batch_size {
            return Ok(None);
        }
        let batch: Vec<Experience> = self
            .buffer
            .sample(self.batch_size, &mut self.rng)
            .into_iter()
            .cloned()
            .collect();
        let loss = self.train_on_batch(&batch)?;
        Ok(Some(loss as f64))
    }

    fn end_episode(&mut self) {
        self.episodes_completed += 1;
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_end);
        if self.episodes_completed % self.sync_interval == 0 {
            self.sync_target_network();
            debug!(episodes = self.episodes_completed, "target network synchronised");
        }
    }

    fn exploration_rate(&self) -> f64 {
        self.epsilon
    }
}
