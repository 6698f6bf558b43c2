//! Evaluation abstraction for MCTS.
//!
//! The `Evaluator` trait allows swapping the simulation phase strategy:
//! - `ModelEvaluator` asks the world model for its own outcome estimate
//! - `CoinFlipEvaluator` is a domain-free Bernoulli stand-in
//! - `RolloutEvaluator` plays random legal actions forward before evaluating

use pitwall_core::{Outcome, WorldModel, WorldModelError};
use rand::Rng;

/// Trait for producing one outcome sample for a state.
///
/// Randomness is borrowed from the planner so a seeded search stays
/// reproducible end to end.
pub trait Evaluator<M: WorldModel> {
    /// Evaluate a position, returning one outcome sample.
    fn evaluate<R: Rng + ?Sized>(
        &self,
        model: &M,
        state: &M::State,
        rng: &mut R,
    ) -> Result<Outcome, WorldModelError>;
}

/// Evaluator that delegates to `WorldModel::evaluate`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModelEvaluator;

impl<M: WorldModel> Evaluator<M> for ModelEvaluator {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        model: &M,
        state: &M::State,
        rng: &mut R,
    ) -> Result<Outcome, WorldModelError> {
        model.evaluate(state, rng)
    }
}

/// Evaluator that ignores the state and flips a biased coin.
///
/// Carries no domain knowledge; useful as a baseline and for exercising
/// the tree bookkeeping in isolation.
#[derive(Clone, Copy, Debug)]
pub struct CoinFlipEvaluator {
    win_probability: f64,
}

impl CoinFlipEvaluator {
    /// Create a coin flip with the given win probability, clamped to [0, 1].
    pub fn new(win_probability: f64) -> Self {
        let p = if win_probability.is_nan() {
            0.5
        } else {
            win_probability.clamp(0.0, 1.0)
        };
        Self { win_probability: p }
    }

    pub fn win_probability(&self) -> f64 {
        self.win_probability
    }
}

impl Default for CoinFlipEvaluator {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl<M: WorldModel> Evaluator<M> for CoinFlipEvaluator {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        _model: &M,
        _state: &M::State,
        rng: &mut R,
    ) -> Result<Outcome, WorldModelError> {
        Ok(Outcome::from(rng.gen_bool(self.win_probability)))
    }
}

/// Evaluator using random rollouts.
///
/// Plays uniformly random legal actions until a terminal state or the
/// depth limit, then scores the reached state with `WorldModel::evaluate`.
#[derive(Clone, Copy, Debug)]
pub struct RolloutEvaluator {
    /// Maximum transitions in a random playout.
    max_rollout_depth: usize,
}

impl RolloutEvaluator {
    /// Create a new rollout evaluator.
    ///
    /// # Arguments
    /// * `max_rollout_depth` - Maximum transitions in a random playout
    pub fn new(max_rollout_depth: usize) -> Self {
        Self { max_rollout_depth }
    }

    /// Perform a random rollout from the given state, returning the final state.
    pub fn rollout<M: WorldModel, R: Rng + ?Sized>(
        &self,
        model: &M,
        initial_state: &M::State,
        rng: &mut R,
    ) -> Result<M::State, WorldModelError> {
        let mut state = initial_state.clone();

        for _ in 0..self.max_rollout_depth {
            let legal_actions = model.legal_actions(&state)?;
            if legal_actions.is_empty() {
                break;
            }

            // Random move
            let idx = rng.gen_range(0..legal_actions.len());
            state = model.transition(&state, legal_actions[idx], rng)?;
        }

        Ok(state)
    }
}

impl<M: WorldModel> Evaluator<M> for RolloutEvaluator {
    fn evaluate<R: Rng + ?Sized>(
        &self,
        model: &M,
        state: &M::State,
        rng: &mut R,
    ) -> Result<Outcome, WorldModelError> {
        let final_state = self.rollout(model, state, rng)?;
        model.evaluate(&final_state, rng)
    }
}
