//! # Exact Optimum
//!
//! The fewest shots that can clear a target set when trajectories are not
//! restricted to a grid. This is the yardstick for a learner's greedy
//! shots-to-clear.
//!
//! Every useful downward trajectory (`a < 0`) either passes through at least two
//! targets, in which case it is fixed by any two of them, or is spent on a
//! single target. A dynamic program over the subsets of destroyed targets then
//! always extends a subset from its lowest surviving target, which keeps the
//! search at `O(2ⁿ · n)` after an `O(n³)` precomputation.

use crate::action::Action;
use crate::error::{BirdshotError, Result};
use crate::targets::Target;

/// Largest target count [`min_shots`] accepts.
pub const MAX_EXACT_TARGETS: usize = 20;

const COLLINEAR_EPS: f64 = 1e-8;

/// The trajectory `y = a·x² + b·x` through `p` and `q`, if it exists and opens downward.
pub fn parabola_through(p: &Target, q: &Target) -> Option<Action> {
    let denom = q.x * q.x * p.x - p.x * p.x * q.x;
    if (p.x - q.x).abs() < COLLINEAR_EPS || denom.abs() < COLLINEAR_EPS || p.x.abs() < COLLINEAR_EPS {
        return None;
    }
    let a = (q.y * p.x - p.y * q.x) / denom;
    if a > -COLLINEAR_EPS {
        return None;
    }
    let b = (p.y - a * p.x * p.x) / p.x;
    Some(Action::new(a, b))
}

/// Minimum number of shots needed to destroy every target.
///
/// `None` when some target can never be hit: every trajectory passes through
/// the origin, so a target on the y axis is either hit by any shot (within
/// `tolerance` of the origin) or by none.
pub fn min_shots(targets: &[Target], tolerance: f64) -> Result<Option<usize>> {
    if targets.len() > MAX_EXACT_TARGETS {
        return Err(BirdshotError::TooManyTargets {
            count: targets.len(),
            max: MAX_EXACT_TARGETS,
        });
    }
    let (on_axis, targets): (Vec<Target>, Vec<Target>) =
        targets.iter().partition(|target| target.x.abs() < COLLINEAR_EPS);
    if on_axis.iter().any(|target| target.y.abs() >= tolerance) {
        return Ok(None);
    }
    let shots = cover_count(&targets, tolerance);
    if on_axis.is_empty() {
        Ok(Some(shots))
    } else {
        Ok(Some(shots.max(1)))
    }
}

/// Bitmask DP over targets that all have `x != 0`.
fn cover_count(targets: &[Target], tolerance: f64) -> usize {
    let n = targets.len();
    if n == 0 {
        return 0;
    }
    let mask_of = |action: &Action, seed: usize| {
        targets
            .iter()
            .enumerate()
            .filter(|(_, target)| target.is_hit_by(action, tolerance))
            .fold(1u32 << seed, |mask, (k, _)| mask | (1 << k))
    };

    // single[i]: a shot through i alone, plus whatever else it happens to hit
    let single: Vec<u32> = targets
        .iter()
        .enumerate()
        .map(|(i, target)| {
            let action = Action::new(-1.0, (target.y + target.x * target.x) / target.x);
            mask_of(&action, i)
        })
        .collect();
    // cover[i][j]: targets destroyed by the trajectory through i and j
    let mut cover = vec![vec![0u32; n]; n];
    for i in 0..n {
        for j in 0..n {
            if let Some(action) = parabola_through(&targets[i], &targets[j]) {
                cover[i][j] = mask_of(&action, i);
            }
        }
    }

    let full = (1u32 << n) - 1;
    let mut best = vec![usize::MAX; 1 << n];
    best[0] = 0;
    for cleared in 0..full {
        let shots = best[cleared as usize];
        if shots == usize::MAX {
            continue;
        }
        let lowest = (!cleared).trailing_zeros() as usize;
        let mut relax = |mask: u32| {
            let next = (cleared | mask) as usize;
            best[next] = best[next].min(shots + 1);
        };
        relax(single[lowest]);
        for &mask in cover[lowest].iter().filter(|&&mask| mask != 0) {
            relax(mask);
        }
    }
    best[full as usize]
}
