//! # State Encoding
//!
//! Maps the remaining targets of an environment into the representation a
//! learner consumes:
//!
//! - [`TableEncoder`] produces a [`TableKey`], an exact hashable key for the
//!   tabular learner.
//! - [`PaddedEncoder`] produces a fixed-length `Array1<f32>` for the
//!   approximate learner, whatever the number of targets left.

use ndarray::Array1;

use crate::error::{BirdshotError, Result};
use crate::targets::Target;

/// Encodes the remaining targets (always in canonical order) into a learner state.
pub trait StateEncoder {
    type State: Clone;

    fn encode(&self, remaining: &[Target]) -> Self::State;

    /// Largest number of targets this encoder can represent, if bounded.
    fn capacity(&self) -> Option<usize> {
        None
    }
}

/// Exact key over the remaining coordinates.
///
/// Coordinates are stored as their `f64` bit patterns so the key is `Eq + Hash`
/// without any rounding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TableKey(Vec<(u64, u64)>);

impl TableKey {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.0
            .iter()
            .map(|&(x, y)| Target::new(f64::from_bits(x), f64::from_bits(y)))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TableEncoder;

impl StateEncoder for TableEncoder {
    type State = TableKey;

    fn encode(&self, remaining: &[Target]) -> TableKey {
        TableKey(
            remaining
                .iter()
                .map(|target| (target.x.to_bits(), target.y.to_bits()))
                .collect(),
        )
    }
}

/// Flattened coordinates zero-padded to `2 * max_targets` values.
///
/// Zero padding alone cannot tell "no target" from a target at the origin.
/// With `append_count` set, one more feature carries `remaining / max_targets`
/// so states that differ only in such a target still encode differently.
#[derive(Clone, Copy, Debug)]
pub struct PaddedEncoder {
    max_targets: usize,
    append_count: bool,
}

impl PaddedEncoder {
    pub fn new(max_targets: usize, append_count: bool) -> Result<Self> {
        if max_targets == 0 {
            return Err(BirdshotError::invalid_parameter(
                "max_targets",
                "must be at least 1",
            ));
        }
        Ok(PaddedEncoder { max_targets, append_count })
    }

    pub fn max_targets(&self) -> usize {
        self.max_targets
    }

    /// Length of every encoded vector.
    pub fn state_size(&self) -> usize {
        2 * self.max_targets + usize::from(self.append_count)
    }
}

impl StateEncoder for PaddedEncoder {
    type State = Array1<f32>;

    fn encode(&self, remaining: &[Target]) -> Array1<f32> {
        let mut state = Array1::zeros(self.state_size());
        for (i, target) in remaining.iter().take(self.max_targets).enumerate() {
            state[2 * i] = target.x as f32;
            state[2 * i + 1] = target.y as f32;
        }
        if self.append_count {
            state[2 * self.max_targets] = remaining.len() as f32 / self.max_targets as f32;
        }
        state
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.max_targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_table_key_roundtrips_targets() {
        let targets = [Target::new(0.5, 1.25), Target::new(2.0, -3.0)];
        let key = TableEncoder.encode(&targets);
        assert_eq!(key.len(), 2);
        assert_eq!(key.targets().collect::<Vec<_>>(), targets.to_vec());
    }

    #[test]
    fn test_padded_length_is_constant() {
        let encoder = PaddedEncoder::new(4, false).unwrap();
        for n in 0..=4 {
            let targets: Vec<Target> = (0..n).map(|i| Target::new(i as f64 + 1.0, 2.0)).collect();
            assert_eq!(encoder.encode(&targets).len(), 8);
        }
    }

    #[test]
    fn test_padded_layout() {
        let encoder = PaddedEncoder::new(3, false).unwrap();
        let state = encoder.encode(&[Target::new(1.0, 2.0), Target::new(3.0, 4.0)]);
        assert_eq!(state, array![1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_count_feature_separates_origin_target() {
        let encoder = PaddedEncoder::new(2, true).unwrap();
        let with_origin = encoder.encode(&[Target::new(0.0, 0.0)]);
        let empty = encoder.encode(&[]);
        assert_eq!(with_origin.len(), 5);
        assert_ne!(with_origin, empty);
        assert_eq!(with_origin[4], 0.5);
    }
}
