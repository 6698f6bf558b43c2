//! Implementation of the world model traits for the race.

use crate::{Compound, RaceAction, RaceConfig, RaceState, TyreKey};
use pitwall_core::{Environment, Outcome, WorldModel, WorldModelError};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Tyre-strategy world model.
#[derive(Clone, Debug)]
pub struct RaceModel {
    config: RaceConfig,
    noise: Option<Normal<f64>>,
}

impl RaceModel {
    /// Create a model from a validated config.
    ///
    /// # Errors
    /// Returns `WorldModelError::InvalidConfig` if the config does not validate.
    pub fn new(config: RaceConfig) -> Result<Self, WorldModelError> {
        config.validate()?;
        let noise = if config.noise_std_dev > 0.0 {
            let normal = Normal::new(0.0, config.noise_std_dev)
                .map_err(|e| WorldModelError::InvalidConfig(e.to_string()))?;
            Some(normal)
        } else {
            None
        };
        Ok(Self { config, noise })
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// State at the green flag.
    pub fn start(&self) -> RaceState {
        RaceState::new(self.config.total_laps, self.config.starting_tyre)
    }

    /// Best achievable reward for the whole race: every lap on a new soft.
    pub fn ideal_reward(&self) -> f64 {
        let best_pace = Compound::ALL
            .iter()
            .map(|c| c.base_pace())
            .fold(0.0, f64::max);
        f64::from(self.config.total_laps) * best_pace
    }

    /// Deterministic estimate of the reward still to come.
    ///
    /// Takes the better of staying out to the flag and the best single
    /// further stop (any lap, any compound), if one is still allowed.
    pub fn projected_remaining(&self, state: &RaceState) -> f64 {
        let remaining = state.remaining_laps();
        let tyre = state.tyre();
        let age = state.tyre_age();
        let mut best = tyre.stint_reward(age, remaining);

        if state.pit_stops() >= self.config.max_pit_stops {
            return best;
        }

        for pit_after in 0..remaining {
            let first_stint = tyre.stint_reward(age, pit_after);
            for compound in Compound::ALL {
                let value = first_stint - self.config.pit_loss
                    + compound.stint_reward(0, remaining - pit_after);
                best = best.max(value);
            }
        }
        best
    }

    fn lap_noise<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.noise {
            Some(normal) => normal.sample(rng),
            None => 0.0,
        }
    }
}

impl WorldModel for RaceModel {
    type State = RaceState;
    type Action = RaceAction;

    fn legal_actions(&self, state: &RaceState) -> Result<Vec<RaceAction>, WorldModelError> {
        if state.is_finished() {
            return Ok(Vec::new());
        }
        if state.pit_stops() >= self.config.max_pit_stops {
            return Ok(vec![RaceAction::StayOut]);
        }
        Ok(RaceAction::ALL.to_vec())
    }

    fn transition<R: Rng + ?Sized>(
        &self,
        state: &RaceState,
        action: RaceAction,
        rng: &mut R,
    ) -> Result<RaceState, WorldModelError> {
        if state.is_finished() {
            return Err(WorldModelError::TerminalState(state.to_string()));
        }

        let (tyre, age, stops, penalty) = match action {
            RaceAction::StayOut => (state.tyre(), state.tyre_age(), state.pit_stops(), 0.0),
            RaceAction::Pit(compound) => {
                if state.pit_stops() >= self.config.max_pit_stops {
                    return Err(WorldModelError::IllegalAction {
                        action: action.to_string(),
                        state: state.to_string(),
                    });
                }
                (compound, 0, state.pit_stops() + 1, self.config.pit_loss)
            }
        };

        let reward = tyre.lap_reward(age) - penalty + self.lap_noise(rng);
        Ok(state.advance(tyre, age, stops, reward))
    }

    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &RaceState,
        _rng: &mut R,
    ) -> Result<Outcome, WorldModelError> {
        let projected = state.total_reward() + self.projected_remaining(state);
        let normalised = (projected / self.ideal_reward()).clamp(0.0, 1.0);
        Ok(Outcome::Reward(normalised))
    }
}

impl Environment for RaceModel {
    type Key = TyreKey;

    fn initial_state(&self) -> RaceState {
        self.start()
    }

    fn observe(&self, state: &RaceState) -> TyreKey {
        state.key()
    }

    fn reward(&self, state: &RaceState, _action: RaceAction, next: &RaceState) -> f64 {
        next.total_reward() - state.total_reward()
    }
}
