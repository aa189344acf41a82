//! # Training Loop
//!
//! [`Trainer`] owns one environment and one agent for a whole run. Each
//! training episode resets the environment and loops `act → step → observe`
//! until every target is destroyed or the step budget runs out. On the
//! evaluation cadence a greedy rollout measures shots-to-clear; evaluation
//! never calls `observe`, so the agent's table, buffer and weights are left
//! exactly as training left them.
//!
//! ```rust
//! use birdshot::action::DiscreteGrid;
//! use birdshot::config::TrainerConfig;
//! use birdshot::trainer::{RunBudget, Trainer};
//!
//! let grid = DiscreteGrid::new(-1.0..0.0, 0.0..3.0, 0.5, 2).unwrap();
//! let config = TrainerConfig::default().with_learning_rate(0.2).with_seed(7);
//! let mut trainer = Trainer::tabular(vec![(1.0, 1.0), (3.0, 0.0)], grid, &config).unwrap();
//!
//! let report = trainer.run(&RunBudget::new(200).with_eval_every(50)).unwrap();
//! assert_eq!(report.episodes.len(), 200);
//! assert_eq!(report.optimal_shots, Some(1));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::action::{Action, DiscreteGrid};
use crate::agent::{Agent, DqnAgent, TabularAgent, Transition};
use crate::config::{RewardMode, TrainerConfig};
use crate::encoding::{PaddedEncoder, StateEncoder, TableEncoder};
use crate::environment::TargetingEnv;
use crate::error::{BirdshotError, Result};
use crate::metrics::MetricsTracker;
use crate::optimal::{self, MAX_EXACT_TARGETS};
use crate::targets::Target;

/// Episode and step limits for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunBudget {
    pub episodes: usize,
    /// Training episodes are truncated after this many shots
    pub max_steps_per_episode: usize,
    /// Evaluate every this many episodes; `None` only evaluates at the end
    pub eval_every: Option<usize>,
    /// An evaluation that has not cleared the targets after this many shots fails
    pub eval_max_shots: usize,
}

impl RunBudget {
    pub fn new(episodes: usize) -> Self {
        RunBudget {
            episodes,
            max_steps_per_episode: 1_000,
            eval_every: None,
            eval_max_shots: 100,
        }
    }

    pub fn with_max_steps(mut self, max_steps_per_episode: usize) -> Self {
        self.max_steps_per_episode = max_steps_per_episode;
        self
    }

    pub fn with_eval_every(mut self, eval_every: usize) -> Self {
        self.eval_every = Some(eval_every);
        self
    }

    pub fn with_eval_max_shots(mut self, eval_max_shots: usize) -> Self {
        self.eval_max_shots = eval_max_shots;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps_per_episode == 0 {
            return Err(BirdshotError::invalid_parameter(
                "max_steps_per_episode",
                "must be at least 1",
            ));
        }
        if self.eval_max_shots == 0 {
            return Err(BirdshotError::invalid_parameter("eval_max_shots", "must be at least 1"));
        }
        if self.eval_every == Some(0) {
            return Err(BirdshotError::invalid_parameter("eval_every", "must be at least 1"));
        }
        Ok(())
    }
}

/// Result of one greedy rollout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Shots fired
    pub shots: usize,
    /// Whether every target was destroyed within the shot cap
    pub cleared: bool,
    pub total_reward: f64,
}

impl Evaluation {
    /// Shots-to-clear, if the rollout cleared the targets.
    pub fn shots_to_clear(&self) -> Option<usize> {
        self.cleared.then_some(self.shots)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub total_reward: f64,
    pub steps: usize,
    /// The step budget ran out before the targets were cleared
    pub truncated: bool,
    /// Exploration rate the episode ran with
    pub epsilon: f64,
    /// Mean training loss over the episode's updates
    pub mean_loss: Option<f64>,
    pub evaluation: Option<Evaluation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub reward_mode: RewardMode,
    pub episodes: Vec<EpisodeReport>,
    pub final_evaluation: Evaluation,
    /// Exact minimum shots, when the target set is small enough to solve and every target is reachable
    pub optimal_shots: Option<usize>,
}

/// One greedy shot of a rollout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub action: Action,
    pub hits: Vec<Target>,
}

/// Drives one agent against one environment.
pub struct Trainer<E: StateEncoder, A: Agent<State = E::State>> {
    env: TargetingEnv<E>,
    agent: A,
    metrics: MetricsTracker,
}

impl Trainer<TableEncoder, TabularAgent> {
    /// Tabular Q-learning over `grid`.
    pub fn tabular<I, T>(targets: I, grid: DiscreteGrid, config: &TrainerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let env = TargetingEnv::from_config(targets, TableEncoder, config)?;
        let agent = TabularAgent::new(grid, config)?;
        Ok(Trainer::new(env, agent))
    }
}

impl Trainer<PaddedEncoder, DqnAgent> {
    /// Value-function approximation with continuous actions.
    pub fn approximate<I, T>(targets: I, config: &TrainerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let encoder = PaddedEncoder::new(config.max_targets, true)?;
        let env = TargetingEnv::from_config(targets, encoder, config)?;
        let agent = DqnAgent::new(encoder.state_size(), config)?;
        Ok(Trainer::new(env, agent))
    }
}

impl<E: StateEncoder, A: Agent<State = E::State>> Trainer<E, A> {
    pub fn new(env: TargetingEnv<E>, agent: A) -> Self {
        Trainer {
            env,
            agent,
            metrics: MetricsTracker::default(),
        }
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn env(&self) -> &TargetingEnv<E> {
        &self.env
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn reward_mode(&self) -> RewardMode {
        self.env.reward_mode()
    }

    /// Train for `budget.episodes` episodes, evaluating on the configured cadence.
    pub fn run(&mut self, budget: &RunBudget) -> Result<TrainingReport> {
        budget.validate()?;
        info!(
            episodes = budget.episodes,
            targets = self.env.initial().len(),
            reward_mode = ?self.env.reward_mode(),
            "starting training run"
        );

        let mut episodes = Vec::with_capacity(budget.episodes);
        for episode in 0..budget.episodes {
            let mut report = self.train_episode(episode, budget.max_steps_per_episode)?;
            if budget.eval_every.map_or(false, |every| (episode + 1) % every == 0) {
                let evaluation = self.evaluate(budget.eval_max_shots)?;
                info!(
                    episode,
                    shots = evaluation.shots,
                    cleared = evaluation.cleared,
                    epsilon = report.epsilon,
                    "evaluation"
                );
                report.evaluation = Some(evaluation);
            }
            episodes.push(report);
        }

        let final_evaluation = self.evaluate(budget.eval_max_shots)?;
        let optimal_shots = if self.env.initial().len() <= MAX_EXACT_TARGETS {
            optimal::min_shots(self.env.initial(), self.env.hit_tolerance()).ok().flatten()
        } else {
            None
        };
        info!(
            shots = final_evaluation.shots,
            cleared = final_evaluation.cleared,
            optimal = ?optimal_shots,
            "training run finished"
        );

        Ok(TrainingReport {
            reward_mode: self.env.reward_mode(),
            episodes,
            final_evaluation,
            optimal_shots,
        })
    }

    /// One exploring episode with learning.
    pub fn train_episode(&mut self, episode: usize, max_steps: usize) -> Result<EpisodeReport> {
        let epsilon = self.agent.exploration_rate();
        let mut state = self.env.reset();
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut done = false;
        let mut loss_sum = 0.0;
        let mut loss_count = 0usize;

        while !done && steps < max_steps {
            let choice = self.agent.act(&state, true)?;
            let action = self.agent.trajectory(&choice)?;
            let step = self.env.step(&action);
            if let Some(loss) = self.agent.observe(Transition {
                state,
                choice,
                reward: step.reward,
                next_state: step.next_state.clone(),
                done: step.done,
            })? {
                loss_sum += loss;
                loss_count += 1;
            }
            state = step.next_state;
            total_reward += step.reward;
            done = step.done;
            steps += 1;
        }
        self.agent.end_episode();

        let mean_loss = (loss_count > 0).then(|| loss_sum / loss_count as f64);
        self.metrics.record_episode(total_reward, steps, epsilon, mean_loss);
        debug!(episode, total_reward, steps, epsilon, ?mean_loss, "episode finished");

        Ok(EpisodeReport {
            episode,
            total_reward,
            steps,
            truncated: !done,
            epsilon,
            mean_loss,
            evaluation: None,
        })
    }

    /// Greedy rollout from a fresh reset. Learner state is not modified.
    pub fn evaluate(&mut self, max_shots: usize) -> Result<Evaluation> {
        let trace = self.greedy_trace(max_shots)?;
        let evaluation = Evaluation {
            shots: trace.shots.len(),
            cleared: trace.cleared,
            total_reward: trace.total_reward,
        };
        self.metrics.record_evaluation(evaluation.shots_to_clear());
        if !evaluation.cleared {
            warn!(max_shots, remaining = self.env.remaining().len(), "greedy policy did not clear the targets");
        }
        Ok(evaluation)
    }

    /// Greedy shot-by-shot trace, stopping after `max_shots`.
    pub fn rollout(&mut self, max_shots: usize) -> Result<Vec<Shot>> {
        Ok(self.greedy_trace(max_shots)?.shots)
    }

    fn greedy_trace(&mut self, max_shots: usize) -> Result<GreedyTrace> {
        let mut state = self.env.reset();
        let mut trace = GreedyTrace {
            shots: Vec::new(),
            cleared: false,
            total_reward: 0.0,
        };
        // An empty set still takes the one shot that observes termination.
        while trace.shots.len() < max_shots {
            let choice = self.agent.act(&state, false)?;
            let action = self.agent.trajectory(&choice)?;
            let step = self.env.step(&action);
            trace.total_reward += step.reward;
            trace.shots.push(Shot { action, hits: step.hits });
            state = step.next_state;
            if step.done {
                trace.cleared = true;
                break;
            }
        }
        Ok(trace)
    }
}

struct GreedyTrace {
    shots: Vec<Shot>,
    cleared: bool,
    total_reward: f64,
}
