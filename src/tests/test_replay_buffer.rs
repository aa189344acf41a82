use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::replay_buffer::{Experience, ReplayBuffer};

fn experience(id: f32) -> Experience {
    Experience {
        state: array![id, 0.0],
        action: array![-1.0, 1.0],
        reward: id,
        next_state: array![id, 1.0],
        done: false,
    }
}

#[test]
fn test_replay_buffer_creation() {
    let buffer = ReplayBuffer::new(100);
    assert_eq!(buffer.len(), 0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 100);
}

#[test]
fn test_replay_buffer_add() {
    let mut buffer = ReplayBuffer::new(10);
    buffer.add(experience(1.0));
    assert_eq!(buffer.len(), 1);
    assert!(!buffer.is_empty());
}

#[test]
fn test_replay_buffer_evicts_oldest() {
    let mut buffer = ReplayBuffer::new(3);
    for i in 0..5 {
        buffer.add(experience(i as f32));
    }
    assert_eq!(buffer.len(), 3);

    let mut rng = StdRng::seed_from_u64(0);
    let mut rewards: Vec<f32> = buffer.sample(3, &mut rng).iter().map(|e| e.reward).collect();
    rewards.sort_by(f32::total_cmp);
    assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_replay_buffer_sample_is_distinct() {
    let mut buffer = ReplayBuffer::new(50);
    for i in 0..50 {
        buffer.add(experience(i as f32));
    }
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..20 {
        let mut rewards: Vec<f32> = buffer.sample(10, &mut rng).iter().map(|e| e.reward).collect();
        assert_eq!(rewards.len(), 10);
        rewards.sort_by(f32::total_cmp);
        rewards.dedup();
        assert_eq!(rewards.len(), 10);
    }
}

#[test]
fn test_replay_buffer_sample_larger_than_contents() {
    let mut buffer = ReplayBuffer::new(10);
    buffer.add(experience(1.0));
    buffer.add(experience(2.0));
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(buffer.sample(5, &mut rng).len(), 2);
    assert!(ReplayBuffer::new(4).sample(2, &mut rng).is_empty());
}

#[test]
fn test_replay_buffer_sampling_is_uniform_enough() {
    let mut buffer = ReplayBuffer::new(4);
    for i in 0..4 {
        buffer.add(experience(i as f32));
    }
    let mut rng = StdRng::seed_from_u64(21);
    let mut counts = [0usize; 4];
    for _ in 0..4000 {
        for e in buffer.sample(1, &mut rng) {
            counts[e.reward as usize] += 1;
        }
    }
    assert!(counts.iter().all(|&c| c > 800 && c < 1200), "{:?}", counts);
}
