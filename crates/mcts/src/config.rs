//! MCTS configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search algorithm.

use pitwall_core::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exploration constant of the standard UCB1 form `mean + 2 * sqrt(ln N / n)`.
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = 2.0;

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Number of select-expand-simulate-backpropagate cycles per search.
    pub num_simulations: usize,

    /// UCB1 exploration constant `C`.
    /// 0 = pure exploitation of the mean outcome.
    pub exploration_constant: f64,

    /// Optional wall-clock bound in milliseconds.
    /// Checked between cycles; at least one cycle always runs.
    pub time_limit_ms: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            time_limit_ms: None,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified number of simulations.
    pub fn with_simulations(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            ..Default::default()
        }
    }

    /// Replace the exploration constant.
    pub fn exploration(mut self, exploration_constant: f64) -> Self {
        self.exploration_constant = exploration_constant;
        self
    }

    /// Bound each search by wall-clock time as well as by budget.
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis() as u64);
        self
    }

    /// The configured time limit, if any.
    pub fn time_limit_duration(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Check the budget and exploration constant.
    ///
    /// # Errors
    /// - `PlanError::InvalidBudget` if `num_simulations` is zero
    /// - `PlanError::InvalidExplorationConstant` if `C` is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            return Err(PlanError::InvalidBudget);
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(PlanError::InvalidExplorationConstant(
                self.exploration_constant,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 1000);
        assert!((config.exploration_constant - 2.0).abs() < 1e-12);
        assert_eq!(config.time_limit_ms, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_simulations() {
        let config = MctsConfig::with_simulations(100);
        assert_eq!(config.num_simulations, 100);
        // Other values should be default
        assert!((config.exploration_constant - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_builder_methods() {
        let config = MctsConfig::with_simulations(10)
            .exploration(0.5)
            .time_limit(Duration::from_millis(250));
        assert!((config.exploration_constant - 0.5).abs() < 1e-12);
        assert_eq!(config.time_limit_ms, Some(250));
        assert_eq!(
            config.time_limit_duration(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_validate_rejects_zero_budget() {
        let config = MctsConfig::with_simulations(0);
        assert_eq!(config.validate(), Err(PlanError::InvalidBudget));
    }

    #[test]
    fn test_validate_rejects_bad_exploration() {
        assert!(matches!(
            MctsConfig::default().exploration(-1.0).validate(),
            Err(PlanError::InvalidExplorationConstant(_))
        ));
        assert!(matches!(
            MctsConfig::default().exploration(f64::NAN).validate(),
            Err(PlanError::InvalidExplorationConstant(_))
        ));
        assert!(MctsConfig::default().exploration(0.0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MctsConfig = serde_json::from_str(r#"{"num_simulations": 64}"#).unwrap();
        assert_eq!(config.num_simulations, 64);
        assert!((config.exploration_constant - 2.0).abs() < 1e-12);
        assert_eq!(config.time_limit_ms, None);
    }
}
