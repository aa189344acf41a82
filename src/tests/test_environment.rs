use crate::action::Action;
use crate::config::RewardMode;
use crate::encoding::{PaddedEncoder, StateEncoder, TableEncoder};
use crate::environment::TargetingEnv;
use crate::error::BirdshotError;
use crate::targets::Target;

fn table_env(points: Vec<(f64, f64)>, mode: RewardMode) -> TargetingEnv<TableEncoder> {
    TargetingEnv::new(points, TableEncoder, 0.01, mode).unwrap()
}

#[test]
fn test_single_shot_clears_parabola() {
    let mut env = table_env(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)], RewardMode::Hits);
    env.reset();
    let step = env.step(&Action::new(1.0, 0.0));
    assert_eq!(step.reward, 3.0);
    assert!(step.done);
    assert_eq!(step.hits.len(), 3);
    assert!(step.next_state.is_empty());
}

#[test]
fn test_hits_minus_one_reward() {
    let mut env = table_env(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)], RewardMode::HitsMinusOne);
    env.reset();
    let step = env.step(&Action::new(1.0, 0.0));
    assert_eq!(step.reward, 2.0);
    assert!(step.done);
}

#[test]
fn test_miss_keeps_targets() {
    for (mode, expected) in [(RewardMode::Hits, 0.0), (RewardMode::HitsMinusOne, -1.0)] {
        let mut env = table_env(vec![(1.0, 1.0), (2.0, 1.0)], mode);
        let start = env.reset();
        let step = env.step(&Action::new(-1.0, 0.0));
        assert_eq!(step.reward, expected);
        assert!(!step.done);
        assert!(step.hits.is_empty());
        assert_eq!(step.next_state, start);
    }
}

#[test]
fn test_partial_hit_removes_only_hit_targets() {
    let mut env = table_env(vec![(1.0, 1.0), (2.0, 1.0), (1.0, 0.5)], RewardMode::Hits);
    env.reset();
    // y = -0.5x² + 1.5x passes through (1, 1) and (2, 1)
    let step = env.step(&Action::new(-0.5, 1.5));
    assert_eq!(step.reward, 2.0);
    assert!(!step.done);
    assert_eq!(env.remaining(), &[Target::new(1.0, 0.5)]);
}

#[test]
fn test_tolerance_band_not_exact_equality() {
    let mut env = table_env(vec![(3.0, 1.5)], RewardMode::Hits);
    env.reset();
    // 0.1 * 9 + 0.2 * 3 is not exactly 1.5 in floating point
    let step = env.step(&Action::new(0.1, 0.2));
    assert!(step.done);

    let mut strict = TargetingEnv::new(vec![(3.0, 1.5)], TableEncoder, 1e-3, RewardMode::Hits).unwrap();
    strict.reset();
    assert!(!strict.step(&Action::new(0.1, 0.21)).done);
}

#[test]
fn test_empty_target_set_is_terminal() {
    for (mode, expected) in [(RewardMode::Hits, 0.0), (RewardMode::HitsMinusOne, -1.0)] {
        let mut env = table_env(vec![], mode);
        let state = env.reset();
        assert!(state.is_empty());
        let step = env.step(&Action::new(-3.0, 7.0));
        assert_eq!(step.reward, expected);
        assert!(step.done);
    }
}

#[test]
fn test_reset_restores_all_targets() {
    let points = vec![(1.0, 1.0), (2.0, 1.0), (3.0, 0.0), (1.0, 0.5)];
    let mut env = table_env(points.clone(), RewardMode::Hits);
    let initial = env.reset();
    env.step(&Action::new(-0.5, 1.5));
    env.step(&Action::new(-1.0, 1.5));
    assert!(env.remaining().is_empty());

    assert_eq!(env.reset(), initial);
    assert_eq!(env.remaining().len(), points.len());
}

#[test]
fn test_state_key_is_order_independent() {
    let mut forward = table_env(vec![(1.0, 1.0), (2.0, 1.0), (1.0, 0.5)], RewardMode::Hits);
    let mut backward = table_env(vec![(1.0, 0.5), (2.0, 1.0), (1.0, 1.0)], RewardMode::Hits);
    assert_eq!(forward.reset(), backward.reset());

    let action = Action::new(-1.0, 1.5);
    assert_eq!(forward.step(&action).next_state, backward.step(&action).next_state);
}

#[test]
fn test_padded_env_encodes_fixed_length() {
    let encoder = PaddedEncoder::new(5, true).unwrap();
    let mut env = TargetingEnv::new(vec![(1.0, 1.0), (2.0, 1.0)], encoder, 0.01, RewardMode::Hits).unwrap();
    let state = env.reset();
    assert_eq!(state.len(), 11);
    let step = env.step(&Action::new(-0.5, 1.5));
    assert_eq!(step.next_state.len(), 11);
    assert_eq!(step.next_state, encoder.encode(&[]));
}

#[test]
fn test_padded_env_rejects_too_many_targets() {
    let encoder = PaddedEncoder::new(1, false).unwrap();
    let result = TargetingEnv::new(vec![(1.0, 1.0), (2.0, 1.0)], encoder, 0.01, RewardMode::Hits);
    assert!(matches!(result, Err(BirdshotError::TooManyTargets { count: 2, max: 1 })));
}

#[test]
fn test_rejects_bad_tolerance() {
    for tolerance in [0.0, -0.1, f64::NAN, f64::INFINITY] {
        assert!(TargetingEnv::new(vec![(1.0, 1.0)], TableEncoder, tolerance, RewardMode::Hits).is_err());
    }
}
