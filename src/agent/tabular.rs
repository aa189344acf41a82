use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::trace;

use super::seeded_rng;
use super::traits::{Agent, Transition};
use crate::action::{Action, DiscreteGrid};
use crate::config::TrainerConfig;
use crate::encoding::TableKey;
use crate::error::{BirdshotError, Result};

/// Action values per state, one row of `width` values per visited state.
///
/// A missing row reads as all zeros; rows are only materialised by updates.
#[derive(Clone, Debug, PartialEq)]
pub struct QTable {
    rows: HashMap<TableKey, Vec<f64>>,
    width: usize,
}

impl QTable {
    pub fn new(width: usize) -> Self {
        QTable {
            rows: HashMap::new(),
            width,
        }
    }

    pub fn value(&self, state: &TableKey, action: usize) -> f64 {
        self.rows
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row(&self, state: &TableKey) -> Option<&[f64]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Row for `state`, created as zeros if absent.
    pub fn row_mut(&mut self, state: &TableKey) -> &mut [f64] {
        let width = self.width;
        self.rows
            .entry(state.clone())
            .or_insert_with(|| vec![0.0; width])
    }

    pub fn contains(&self, state: &TableKey) -> bool {
        self.rows.contains_key(state)
    }

    /// Largest value in the row, 0 for an unseen state.
    pub fn max_value(&self, state: &TableKey) -> f64 {
        self.row(state)
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    /// Index of the best action, ties going to the earliest index. `None` for an unseen state.
    pub fn best_action(&self, state: &TableKey) -> Option<usize> {
        let row = self.row(state)?;
        let mut best: Option<(usize, f64)> = None;
        for (index, &value) in row.iter().enumerate() {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((index, value)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Number of materialised states
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Epsilon-greedy Q-learning over a discrete action grid.
///
/// # Example
///
/// ```rust
/// use birdshot::action::DiscreteGrid;
/// use birdshot::agent::{Agent, TabularAgent, Transition};
/// use birdshot::config::TrainerConfig;
/// use birdshot::encoding::{StateEncoder, TableEncoder};
/// use birdshot::targets::Target;
///
/// let grid = DiscreteGrid::new(-1.0..0.0, 0.0..1.0, 0.5, 2).unwrap();
/// let config = TrainerConfig::default().with_learning_rate(0.5).with_seed(3);
/// let mut agent = TabularAgent::new(grid, &config).unwrap();
///
/// let start = TableEncoder.encode(&[Target::new(1.0, -0.5)]);
/// let end = TableEncoder.encode(&[]);
/// agent.observe(Transition { state: start.clone(), choice: 2, reward: 1.0, next_state: end, done: true }).unwrap();
/// assert_eq!(agent.q_value(&start, 2), 0.5);
/// assert_eq!(agent.greedy(&start), Some(2));
/// ```
pub struct TabularAgent {
    table: QTable,
    grid: DiscreteGrid,
    epsilon: f64,
    learning_rate: f64,
    gamma: f64,
    rng: StdRng,
}

impl TabularAgent {
    pub fn new(grid: DiscreteGrid, config: &TrainerConfig) -> Result<Self> {
        config.validate()?;
        if grid.is_empty() {
            return Err(BirdshotError::invalid_parameter("grid", "must hold at least one action"));
        }
        Ok(TabularAgent {
            table: QTable::new(grid.len()),
            grid,
            epsilon: config.epsilon,
            learning_rate: config.learning_rate,
            gamma: config.gamma,
            rng: seeded_rng(config.seed),
        })
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn grid(&self) -> &DiscreteGrid {
        &self.grid
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Exploration is an input of this learner, varied from outside if at all.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn q_value(&self, state: &TableKey, action: usize) -> f64 {
        self.table.value(state, action)
    }

    /// Greedy action for a visited state
    pub fn greedy(&self, state: &TableKey) -> Option<usize> {
        self.table.best_action(state)
    }

    /// Apply `Q[s][a] += lr * (r + γ·max Q[s'] − Q[s][a])`, with no bootstrap term
    /// when the transition is terminal. Returns the TD error.
    pub fn update(
        &mut self,
        state: &TableKey,
        action: usize,
        reward: f64,
        next_state: &TableKey,
        done: bool,
    ) -> Result<f64> {
        if action >= self.grid.len() {
            return Err(BirdshotError::invalid_parameter(
                "action".to_string(),
                format!("index {} outside a grid of {}", action, self.grid.len()),
            ));
        }
        self.table.row_mut(next_state);
        let bootstrap = if done {
            0.0
        } else {
            self.gamma * self.table.max_value(next_state)
        };

        let learning_rate = self.learning_rate;
        let cell = &mut self.table.row_mut(state)[action];
        let td_error = reward + bootstrap - *cell;
        *cell += learning_rate * td_error;
        trace!(action, reward, td_error, "q update");
        Ok(td_error)
    }
}

impl Agent for TabularAgent {
    type State = TableKey;
    type Choice = usize;

    fn act(&mut self, state: &TableKey, explore: bool) -> Result<usize> {
        if explore && self.rng.gen::<f64>() < self.epsilon {
            return Ok(self.grid.sample_random(&mut self.rng));
        }
        match self.table.best_action(state) {
            Some(action) => Ok(action),
            None => Ok(self.grid.sample_random(&mut self.rng)),
        }
    }

    fn trajectory(&self, choice: &usize) -> Result<Action> {
        self.grid.get(*choice).copied().ok_or_else(|| {
            BirdshotError::invalid_parameter(
                "choice".to_string(),
                format!("index {} outside a grid of {}", choice, self.grid.len()),
            )
        })
    }

    fn observe(&mut self, transition: Transition<TableKey, usize>) -> Result<Option<f64>> {
        let td_error = self.update(
            &transition.state,
            transition.choice,
            transition.reward,
            &transition.next_state,
            transition.done,
        )?;
        Ok(Some(td_error * td_error))
    }

    fn exploration_rate(&self) -> f64 {
        self.epsilon
    }
}
