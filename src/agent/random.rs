use rand::rngs::StdRng;

use super::seeded_rng;
use super::traits::{Agent, Transition};
use crate::action::{Action, DiscreteGrid};
use crate::encoding::TableKey;
use crate::error::{BirdshotError, Result};

/// Shoots uniformly at random from the grid and never learns.
pub struct RandomAgent {
    grid: DiscreteGrid,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(grid: DiscreteGrid, seed: Option<u64>) -> Self {
        RandomAgent {
            grid,
            rng: seeded_rng(seed),
        }
    }
}

impl Agent for RandomAgent {
    type State = TableKey;
    type Choice = usize;

    fn act(&mut self, _state: &TableKey, _explore: bool) -> Result<usize> {
        Ok(self.grid.sample_random(&mut self.rng))
    }

    fn trajectory(&self, choice: &usize) -> Result<Action> {
        self.grid.get(*choice).copied().ok_or_else(|| {
            BirdshotError::invalid_parameter(
                "choice".to_string(),
                format!("index {} outside a grid of {}", choice, self.grid.len()),
            )
        })
    }

    fn observe(&mut self, _transition: Transition<TableKey, usize>) -> Result<Option<f64>> {
        Ok(None)
    }

    fn exploration_rate(&self) -> f64 {
        1.0
    }
}
