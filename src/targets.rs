//! # Targets
//!
//! Point targets ("pigs") and the set of targets remaining in an episode.
//!
//! The initial set is sorted once by `x` then `y` and every remaining subset
//! keeps that order, so two sets holding the same points always compare and
//! encode identically regardless of the order the coordinates were supplied in.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{BirdshotError, Result};

/// An immutable point in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: f64,
    pub y: f64,
}

impl Target {
    pub fn new(x: f64, y: f64) -> Self {
        Target { x, y }
    }

    /// Canonical ordering: by `x`, then by `y`.
    pub fn canonical_cmp(&self, other: &Target) -> Ordering {
        self.x.total_cmp(&other.x).then(self.y.total_cmp(&other.y))
    }

    /// Whether the trajectory `y = a·x² + b·x` passes within `tolerance` of this target.
    pub fn is_hit_by(&self, action: &Action, tolerance: f64) -> bool {
        (action.height_at(self.x) - self.y).abs() < tolerance
    }
}

impl From<(f64, f64)> for Target {
    fn from((x, y): (f64, f64)) -> Self {
        Target::new(x, y)
    }
}

/// The fixed initial targets of a run and the subset still standing.
#[derive(Clone, Debug)]
pub struct TargetSet {
    initial: Vec<Target>,
    remaining: Vec<Target>,
}

impl TargetSet {
    pub fn new<I, T>(targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let mut initial: Vec<Target> = targets.into_iter().map(Into::into).collect();
        initial.sort_by(Target::canonical_cmp);
        let remaining = initial.clone();
        TargetSet { initial, remaining }
    }

    pub fn initial(&self) -> &[Target] {
        &self.initial
    }

    /// Remaining targets, in canonical order.
    pub fn remaining(&self) -> &[Target] {
        &self.remaining
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Restore every target.
    pub fn restore(&mut self) {
        self.remaining.clone_from(&self.initial);
    }

    /// Remove and return every remaining target the trajectory hits.
    pub fn strike(&mut self, action: &Action, tolerance: f64) -> Vec<Target> {
        let (hit, kept): (Vec<Target>, Vec<Target>) = self
            .remaining
            .iter()
            .partition(|target| target.is_hit_by(action, tolerance));
        self.remaining = kept;
        hit
    }
}

/// Parse a coordinate list: one whitespace-separated "x y" pair per line.
///
/// Blank lines are skipped. Any other line must hold exactly two numbers.
pub fn parse_targets(input: &str) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != 2 {
            return Err(BirdshotError::MalformedInput {
                line: line_no,
                reason: format!("expected 2 values, found {}", tokens.len()),
            });
        }
        let x = parse_coordinate(tokens[0], line_no)?;
        let y = parse_coordinate(tokens[1], line_no)?;
        targets.push(Target::new(x, y));
    }
    Ok(targets)
}

/// Read a coordinate file. See [`parse_targets`] for the format.
pub fn read_targets<P: AsRef<Path>>(path: P) -> Result<Vec<Target>> {
    let data = std::fs::read_to_string(path)?;
    parse_targets(&data)
}

fn parse_coordinate(token: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|err| BirdshotError::MalformedInput {
        line,
        reason: format!("'{}' is not a number: {}", token, err),
    })
}
