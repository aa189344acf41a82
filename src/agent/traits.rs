use crate::action::Action;
use crate::error::Result;

/// A single `(state, choice, reward, next_state, done)` step handed to a learner.
#[derive(Clone, Debug)]
pub struct Transition<S, C> {
    pub state: S,
    pub choice: C,
    pub reward: f64,
    pub next_state: S,
    pub done: bool,
}

/// Trait for learners driven by the [`Trainer`](crate::trainer::Trainer)
pub trait Agent {
    /// Encoded state the agent consumes
    type State: Clone;

    /// What the agent picks: a grid index, a raw network output, ...
    type Choice: Clone;

    /// Select an action. With `explore` false the policy is greedy.
    fn act(&mut self, state: &Self::State, explore: bool) -> Result<Self::Choice>;

    /// Trajectory coefficients for a choice.
    fn trajectory(&self, choice: &Self::Choice) -> Result<Action>;

    /// Learn from one transition. Returns a training loss when an update ran.
    fn observe(&mut self, transition: Transition<Self::State, Self::Choice>) -> Result<Option<f64>>;

    /// Called once after every completed training episode.
    fn end_episode(&mut self) {}

    /// Current exploration rate
    fn exploration_rate(&self) -> f64;
}
