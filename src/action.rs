//! # Action Spaces
//!
//! An action is the coefficient pair `(a, b)` of the trajectory `y = a·x² + b·x`.
//! The tabular learner draws from a finite [`DiscreteGrid`]; the approximate
//! learner works over the unconstrained [`ContinuousSpace`].

use std::ops::Range;

use ndarray::{array, Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{BirdshotError, Result};

/// Trajectory coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub a: f64,
    pub b: f64,
}

impl Action {
    pub fn new(a: f64, b: f64) -> Self {
        Action { a, b }
    }

    /// Height of the trajectory at `x`.
    pub fn height_at(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x
    }

    /// Read the first two components of a network output.
    pub fn from_output(output: ArrayView1<f32>) -> Result<Self> {
        if output.len() < 2 {
            return Err(BirdshotError::dimension_mismatch(
                "at least 2 action components".to_string(),
                format!("{}", output.len()),
            ));
        }
        Ok(Action::new(output[0] as f64, output[1] as f64))
    }

    pub fn to_array(&self) -> Array1<f32> {
        array![self.a as f32, self.b as f32]
    }
}

/// A finite, deterministically ordered grid of actions.
///
/// `a` varies slowest, so the grid over `a ∈ [-1, 0)`, `b ∈ [0, 1)` with step
/// 0.5 enumerates `(-1, 0), (-1, 0.5), (-0.5, 0), (-0.5, 0.5)`. Upper bounds
/// are exclusive and every coefficient is rounded to `decimals` places, which
/// keeps repeated additions of the step from drifting.
#[derive(Clone, Debug)]
pub struct DiscreteGrid {
    actions: Vec<Action>,
}

impl DiscreteGrid {
    pub fn new(a_range: Range<f64>, b_range: Range<f64>, step: f64, decimals: u32) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(BirdshotError::invalid_parameter(
                "step".to_string(),
                format!("must be positive, got {}", step),
            ));
        }
        if step * 10f64.powi(decimals as i32) < 1.0 - 1e-9 {
            return Err(BirdshotError::invalid_parameter(
                "step".to_string(),
                format!("{} is finer than {} decimal places", step, decimals),
            ));
        }
        let a_values = axis_values(&a_range, step, decimals, "a_range")?;
        let b_values = axis_values(&b_range, step, decimals, "b_range")?;

        let actions = a_values
            .iter()
            .flat_map(|&a| b_values.iter().map(move |&b| Action::new(a, b)))
            .collect();
        Ok(DiscreteGrid { actions })
    }

    /// The default training grid: `a ∈ [-10, 0)`, `b ∈ [0, 10)`, step 0.1, 10 000 actions.
    pub fn standard() -> Self {
        DiscreteGrid::new(-10.0..0.0, 0.0..10.0, 0.1, 2)
            .expect("standard grid bounds are valid")
    }

    /// Build a grid from an explicit list, kept in the given order.
    pub fn from_actions(actions: Vec<Action>) -> Result<Self> {
        if actions.is_empty() {
            return Err(BirdshotError::invalid_parameter(
                "actions",
                "grid must hold at least one action",
            ));
        }
        Ok(DiscreteGrid { actions })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Index of an action drawn uniformly from the grid.
    pub fn sample_random<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.actions.len())
    }
}

fn axis_values(range: &Range<f64>, step: f64, decimals: u32, name: &str) -> Result<Vec<f64>> {
    if !(range.start.is_finite() && range.end.is_finite() && range.start < range.end) {
        return Err(BirdshotError::invalid_parameter(
            name.to_string(),
            format!("empty or non-finite range {:?}", range),
        ));
    }
    let scale = 10f64.powi(decimals as i32);
    // The small slack keeps (end - start) / step from rounding up past an exact multiple.
    let count = ((range.end - range.start) / step - 1e-9).ceil() as usize;
    Ok((0..count)
        .map(|i| ((range.start + i as f64 * step) * scale).round() / scale)
        .filter(|v| *v < range.end)
        .collect())
}

/// Real-valued actions with Gaussian exploration.
#[derive(Clone, Copy, Debug)]
pub struct ContinuousSpace {
    noise: Normal<f64>,
}

impl ContinuousSpace {
    /// Action components have 2 dimensions: `a` and `b`.
    pub const DIM: usize = 2;

    pub fn new(std_dev: f64) -> Result<Self> {
        let noise = Normal::new(0.0, std_dev).map_err(|err| {
            BirdshotError::invalid_parameter("action_std".to_string(), err.to_string())
        })?;
        Ok(ContinuousSpace { noise })
    }

    pub fn sample_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::new(self.noise.sample(rng), self.noise.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_small_grid_order() {
        let grid = DiscreteGrid::new(-1.0..0.0, 0.0..1.0, 0.5, 2).unwrap();
        assert_eq!(
            grid.actions(),
            &[
                Action::new(-1.0, 0.0),
                Action::new(-1.0, 0.5),
                Action::new(-0.5, 0.0),
                Action::new(-0.5, 0.5),
            ]
        );
    }

    #[test]
    fn test_standard_grid_size_and_bounds() {
        let grid = DiscreteGrid::standard();
        assert_eq!(grid.len(), 100 * 100);
        assert_eq!(grid.get(0), Some(&Action::new(-10.0, 0.0)));
        let last = grid.actions().last().unwrap();
        assert!((last.a - -0.1).abs() < 1e-12);
        assert!((last.b - 9.9).abs() < 1e-12);
        assert!(grid.iter().all(|action| action.a < 0.0 && action.b < 10.0));
    }

    #[test]
    fn test_rejects_bad_step() {
        assert!(DiscreteGrid::new(-1.0..0.0, 0.0..1.0, 0.0, 2).is_err());
        assert!(DiscreteGrid::new(0.0..0.0, 0.0..1.0, 0.5, 2).is_err());
        // rounding to 2 decimals would collapse neighbouring 0.001 steps
        assert!(DiscreteGrid::new(-1.0..0.0, 0.0..1.0, 0.001, 2).is_err());
    }

    #[test]
    fn test_finest_step_keeps_actions_distinct() {
        let grid = DiscreteGrid::new(-0.1..0.0, 0.0..0.1, 0.01, 2).unwrap();
        assert_eq!(grid.len(), 100);
        let mut keys: Vec<(u64, u64)> = grid.iter().map(|a| (a.a.to_bits(), a.b.to_bits())).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 100);
    }

    #[test]
    fn test_random_sample_in_range() {
        let grid = DiscreteGrid::new(-1.0..0.0, 0.0..1.0, 0.5, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(grid.sample_random(&mut rng) < grid.len());
        }
    }

    #[test]
    fn test_action_from_short_output() {
        let output = array![1.0f32];
        assert!(Action::from_output(output.view()).is_err());
    }
}
