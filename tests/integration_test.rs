use std::fs;

use birdshot::action::DiscreteGrid;
use birdshot::config::{RewardMode, TrainerConfig};
use birdshot::error::BirdshotError;
use birdshot::metrics::MetricsTracker;
use birdshot::optimal::min_shots;
use birdshot::targets::{read_targets, Target};
use birdshot::trainer::{RunBudget, Trainer};
use tempfile::tempdir;

const PIGS: &str = "1 1\n2 1\n\n3 0\n1 0.5\n";

#[test]
fn test_read_targets_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pigs.txt");
    fs::write(&path, PIGS).unwrap();

    let targets = read_targets(&path).unwrap();
    assert_eq!(targets.len(), 4);
    assert!(targets.contains(&Target::new(1.0, 0.5)));
    assert_eq!(min_shots(&targets, 0.01).unwrap(), Some(2));
}

#[test]
fn test_read_targets_reports_bad_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pigs.txt");
    fs::write(&path, "1 1\n2 x\n").unwrap();
    assert!(matches!(read_targets(&path), Err(BirdshotError::MalformedInput { line: 2, .. })));

    assert!(matches!(read_targets(dir.path().join("missing.txt")), Err(BirdshotError::Io(_))));
}

#[test]
fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "learning_rate": 0.1, "epsilon": 0.1, "reward_mode": "hits_minus_one", "seed": 99 }"#,
    )
    .unwrap();

    let config = TrainerConfig::from_json_file(&path).unwrap();
    assert_eq!(config.learning_rate, 0.1);
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.reward_mode, RewardMode::HitsMinusOne);
}

#[test]
fn test_end_to_end_tabular_training() {
    let dir = tempdir().unwrap();
    let pigs_path = dir.path().join("pigs.txt");
    fs::write(&pigs_path, PIGS).unwrap();
    let targets = read_targets(&pigs_path).unwrap();

    let config = TrainerConfig::default().with_learning_rate(0.1).with_seed(5);
    let grid = DiscreteGrid::new(-1.0..0.0, 0.0..3.0, 0.5, 2).unwrap();
    let mut trainer = Trainer::tabular(targets, grid, &config).unwrap();
    let report = trainer.run(&RunBudget::new(1_000).with_eval_every(200)).unwrap();

    assert!(report.final_evaluation.cleared);
    let optimal = report.optimal_shots.unwrap();
    assert!(report.final_evaluation.shots >= optimal);

    // the report and metrics serialise for offline inspection
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("final_evaluation"));

    let metrics_path = dir.path().join("metrics.json");
    trainer.metrics().save(&metrics_path).unwrap();
    let mut restored = MetricsTracker::new(1_000);
    restored.load(&metrics_path).unwrap();
    assert_eq!(restored.metrics().episode_rewards.len(), 1_000);
    assert_eq!(restored.metrics().shots_to_clear, trainer.metrics().metrics().shots_to_clear);
}

#[test]
fn test_approximate_training_smoke() {
    let config = TrainerConfig::default()
        .with_hidden_layers(&[16, 16])
        .with_batch_size(8)
        .with_buffer_capacity(256)
        .with_max_targets(8)
        .with_sync_interval(2)
        .with_seed(1);
    let mut trainer = Trainer::approximate(vec![(1.0, 1.0), (2.0, 1.0), (3.0, 0.0)], &config).unwrap();
    let report = trainer
        .run(&RunBudget::new(20).with_max_steps(25).with_eval_max_shots(25))
        .unwrap();

    assert_eq!(report.episodes.len(), 20);
    assert_eq!(report.optimal_shots, Some(1));
    assert!(report.final_evaluation.shots <= 25);
    assert!(trainer.agent().train_steps > 0);
}

#[test]
fn test_approximate_rejects_oversized_target_set() {
    let config = TrainerConfig::default().with_max_targets(2);
    let result = Trainer::approximate(vec![(1.0, 1.0), (2.0, 1.0), (3.0, 0.0)], &config);
    assert!(matches!(result, Err(BirdshotError::TooManyTargets { count: 3, max: 2 })));
}
