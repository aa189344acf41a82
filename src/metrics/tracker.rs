use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Stores training metrics over time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Rewards per episode
    pub episode_rewards: VecDeque<f64>,

    /// Shots fired per training episode
    pub episode_lengths: VecDeque<usize>,

    /// Mean training loss per episode, for episodes that trained
    pub losses: VecDeque<f64>,

    /// Epsilon values (for exploration)
    pub epsilons: VecDeque<f64>,

    /// Greedy shots-to-clear, one entry per evaluation that cleared the targets
    pub shots_to_clear: VecDeque<usize>,

    /// Evaluations that ran out of shots
    pub failed_evaluations: usize,
}

/// Tracks metrics during training, keeping at most `history_size` entries per series.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,
    episode_count: usize,
    total_steps: usize,
}

fn push_bounded<T>(series: &mut VecDeque<T>, value: T, history_size: usize) {
    if series.len() >= history_size {
        series.pop_front();
    }
    series.push_back(value);
}

fn recent_mean<I>(values: I, window: usize) -> Option<f64>
where
    I: DoubleEndedIterator<Item = f64> + ExactSizeIterator,
{
    let n = window.min(values.len());
    if n == 0 {
        return None;
    }
    let sum: f64 = values.rev().take(n).sum();
    Some(sum / n as f64)
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::default(),
            history_size: history_size.max(1),
            episode_count: 0,
            total_steps: 0,
        }
    }

    /// Record a finished training episode
    pub fn record_episode(&mut self, reward: f64, steps: usize, epsilon: f64, loss: Option<f64>) {
        let history_size = self.history_size;
        push_bounded(&mut self.metrics.episode_rewards, reward, history_size);
        push_bounded(&mut self.metrics.episode_lengths, steps, history_size);
        push_bounded(&mut self.metrics.epsilons, epsilon, history_size);
        if let Some(loss) = loss {
            push_bounded(&mut self.metrics.losses, loss, history_size);
        }
        self.episode_count += 1;
        self.total_steps += steps;
    }

    /// Record a greedy evaluation; `None` when it did not clear the targets.
    pub fn record_evaluation(&mut self, shots: Option<usize>) {
        match shots {
            Some(shots) => push_bounded(&mut self.metrics.shots_to_clear, shots, self.history_size),
            None => self.metrics.failed_evaluations += 1,
        }
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get recent average episode reward
    pub fn avg_episode_reward(&self, window: usize) -> Option<f64> {
        recent_mean(self.metrics.episode_rewards.iter().copied(), window)
    }

    /// Get recent average loss
    pub fn avg_loss(&self, window: usize) -> Option<f64> {
        recent_mean(self.metrics.losses.iter().copied(), window)
    }

    /// Recent average of greedy shots-to-clear
    pub fn avg_shots(&self, window: usize) -> Option<f64> {
        recent_mean(self.metrics.shots_to_clear.iter().map(|&s| s as f64), window)
    }

    /// Save metrics to file as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics from file
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> crate::error::Result<()> {
        let data = std::fs::read_to_string(path)?;
        self.metrics = serde_json::from_str(&data)?;
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
