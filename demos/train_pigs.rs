//! Train a tabular agent on a coordinate file and print its greedy shots.
//!
//! ```text
//! cargo run --example train_pigs -- demos/pigs.txt 20000
//! RUST_LOG=birdshot=debug cargo run --example train_pigs
//! ```

use birdshot::action::DiscreteGrid;
use birdshot::config::TrainerConfig;
use birdshot::error::Result;
use birdshot::targets::read_targets;
use birdshot::trainer::{RunBudget, Trainer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "birdshot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "demos/pigs.txt".to_string());
    let episodes = args.next().and_then(|n| n.parse().ok()).unwrap_or(20_000);

    let pigs = read_targets(&path)?;
    println!("Loaded {} pigs from {}", pigs.len(), path);

    let config = TrainerConfig::default().with_learning_rate(0.1).with_seed(42);
    let mut trainer = Trainer::tabular(pigs, DiscreteGrid::standard(), &config)?;
    let report = trainer.run(&RunBudget::new(episodes).with_eval_every((episodes / 10).max(1)))?;

    println!("\nGreedy rollout:");
    for (i, shot) in trainer.rollout(100)?.iter().enumerate() {
        let hits: Vec<String> = shot.hits.iter().map(|t| format!("({}, {})", t.x, t.y)).collect();
        println!(
            "  shot {:>2}: y = {:.2}x² + {:.2}x  hits [{}]",
            i + 1,
            shot.action.a,
            shot.action.b,
            hits.join(", ")
        );
    }

    match report.final_evaluation.shots_to_clear() {
        Some(shots) => println!("\nCleared in {} shots", shots),
        None => println!("\nNot cleared within {} shots", report.final_evaluation.shots),
    }
    if let Some(optimal) = report.optimal_shots {
        println!("Optimal: {} shots", optimal);
    }
    if let Some(avg) = trainer.metrics().avg_episode_reward(100) {
        println!("Mean reward over the last 100 episodes: {:.2}", avg);
    }
    Ok(())
}
