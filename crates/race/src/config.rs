//! Race configuration parameters.

use crate::Compound;
use pitwall_core::WorldModelError;
use serde::{Deserialize, Serialize};

/// Race configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Number of laps in the race (the planning horizon).
    pub total_laps: u32,

    /// Maximum number of pit stops allowed.
    pub max_pit_stops: u32,

    /// Lap reward lost on a lap with a pit stop.
    pub pit_loss: f64,

    /// Standard deviation of Gaussian noise added to every lap reward.
    /// 0 makes transitions deterministic.
    pub noise_std_dev: f64,

    /// Compound fitted at the start.
    pub starting_tyre: Compound,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_laps: 50,
            max_pit_stops: 2,
            pit_loss: 20.0,
            noise_std_dev: 0.0,
            starting_tyre: Compound::Soft,
        }
    }
}

impl RaceConfig {
    /// Create a new config with the specified race length.
    pub fn with_laps(total_laps: u32) -> Self {
        Self {
            total_laps,
            ..Default::default()
        }
    }

    /// Check the config for values the model cannot run with.
    ///
    /// # Errors
    /// Returns `WorldModelError::InvalidConfig` describing the first problem.
    pub fn validate(&self) -> Result<(), WorldModelError> {
        if self.total_laps == 0 {
            return Err(WorldModelError::InvalidConfig(
                "race must have at least one lap".to_string(),
            ));
        }
        if !self.pit_loss.is_finite() || self.pit_loss < 0.0 {
            return Err(WorldModelError::InvalidConfig(format!(
                "pit loss {} must be finite and non-negative",
                self.pit_loss
            )));
        }
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(WorldModelError::InvalidConfig(format!(
                "noise standard deviation {} must be finite and non-negative",
                self.noise_std_dev
            )));
        }
        Ok(())
    }
}
