use crate::config::{RewardMode, TrainerConfig};
use crate::error::BirdshotError;

fn rejected(config: TrainerConfig, field: &str) {
    match config.validate() {
        Err(BirdshotError::InvalidParameter { name, .. }) => assert_eq!(name, field),
        other => panic!("expected {} to be rejected, got {:?}", field, other),
    }
}

#[test]
fn test_default_config_is_valid() {
    let config = TrainerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.reward_mode, RewardMode::HitsMinusOne);
    assert_eq!(config.hidden_layers, vec![64, 64]);
    assert_eq!(config.seed, None);
}

#[test]
fn test_out_of_range_values_rejected() {
    rejected(TrainerConfig::default().with_gamma(1.0), "gamma");
    rejected(TrainerConfig::default().with_gamma(-0.1), "gamma");
    rejected(TrainerConfig::default().with_learning_rate(0.0), "learning_rate");
    rejected(TrainerConfig::default().with_learning_rate(1.5), "learning_rate");
    rejected(TrainerConfig::default().with_epsilon(1.1), "epsilon");
    rejected(TrainerConfig::default().with_epsilon_schedule(0.0, 0.0, 0.9), "epsilon_start");
    rejected(TrainerConfig::default().with_epsilon_schedule(0.5, 0.6, 0.9), "epsilon_end");
    rejected(TrainerConfig::default().with_epsilon_schedule(1.0, 0.1, 0.0), "epsilon_decay");
    rejected(TrainerConfig::default().with_batch_size(0), "batch_size");
    rejected(TrainerConfig::default().with_sync_interval(0), "sync_interval");
    rejected(TrainerConfig::default().with_hit_tolerance(0.0), "hit_tolerance");
    rejected(TrainerConfig::default().with_hit_tolerance(f64::NAN), "hit_tolerance");
    rejected(TrainerConfig::default().with_batch_size(64).with_buffer_capacity(32), "buffer_capacity");
    rejected(TrainerConfig::default().with_batch_size(4).with_buffer_capacity(4), "buffer_capacity");
    rejected(TrainerConfig::default().with_hidden_layers(&[8, 0]), "hidden_layers");
    rejected(TrainerConfig::default().with_max_targets(0), "max_targets");
}

#[test]
fn test_boundary_values_accepted() {
    let config = TrainerConfig::default()
        .with_gamma(0.0)
        .with_learning_rate(1.0)
        .with_epsilon(0.0)
        .with_epsilon_schedule(1.0, 1.0, 1.0)
        .with_hidden_layers(&[]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_round_trip_and_defaults() {
    let config = TrainerConfig::from_json_str(r#"{ "batch_size": 8, "seed": 3, "hidden_layers": [4] }"#).unwrap();
    assert_eq!(config.batch_size, 8);
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.hidden_layers, vec![4]);
    assert_eq!(config.gamma, 0.9);

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(TrainerConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_json_validation_and_parse_errors() {
    assert!(matches!(
        TrainerConfig::from_json_str(r#"{ "gamma": 2.0 }"#),
        Err(BirdshotError::InvalidParameter { .. })
    ));
    assert!(matches!(
        TrainerConfig::from_json_str("{ not json"),
        Err(BirdshotError::Serialization(_))
    ));
    assert!(matches!(
        TrainerConfig::from_json_str(r#"{ "reward_mode": "bonus" }"#),
        Err(BirdshotError::Serialization(_))
    ));
}

#[test]
fn test_reward_modes() {
    assert_eq!(RewardMode::Hits.reward(0), 0.0);
    assert_eq!(RewardMode::Hits.reward(3), 3.0);
    assert_eq!(RewardMode::HitsMinusOne.reward(0), -1.0);
    assert_eq!(RewardMode::HitsMinusOne.reward(3), 2.0);
}
