//! Q-learning hyperparameters.

use crate::{LearnError, Result};
use serde::{Deserialize, Serialize};

/// Q-learning hyperparameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate α in (0, 1].
    pub learning_rate: f64,

    /// Discount factor γ in [0, 1].
    pub discount_factor: f64,

    /// Initial exploration rate ε in [0, 1].
    pub epsilon: f64,

    /// Multiplicative ε decay applied after every training episode.
    /// 1.0 keeps ε constant.
    pub epsilon_decay: f64,

    /// Floor for the decayed ε.
    pub min_epsilon: f64,

    /// Value of state-action pairs never updated.
    pub q_init: f64,

    /// Safety bound on episode length.
    pub max_steps_per_episode: usize,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            q_init: 0.0,
            max_steps_per_episode: 10_000,
        }
    }
}

impl QLearningConfig {
    /// Check every parameter range.
    ///
    /// # Errors
    /// Returns `LearnError::InvalidConfig` naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(invalid("learning_rate", self.learning_rate));
        }
        if !in_unit(self.discount_factor) {
            return Err(invalid("discount_factor", self.discount_factor));
        }
        if !in_unit(self.epsilon) {
            return Err(invalid("epsilon", self.epsilon));
        }
        if !in_unit(self.epsilon_decay) {
            return Err(invalid("epsilon_decay", self.epsilon_decay));
        }
        if !in_unit(self.min_epsilon) {
            return Err(invalid("min_epsilon", self.min_epsilon));
        }
        if self.min_epsilon > self.epsilon {
            return Err(LearnError::InvalidConfig(format!(
                "min_epsilon {} exceeds epsilon {}",
                self.min_epsilon, self.epsilon
            )));
        }
        if !self.q_init.is_finite() {
            return Err(invalid("q_init", self.q_init));
        }
        if self.max_steps_per_episode == 0 {
            return Err(LearnError::InvalidConfig(
                "max_steps_per_episode must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &str, value: f64) -> LearnError {
    LearnError::InvalidConfig(format!("{} out of range: {}", name, value))
}
