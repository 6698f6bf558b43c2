use crate::{Compound, TyreKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Race situation at the start of a lap.
///
/// States are immutable values; transitions always build a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    /// Laps completed so far.
    lap: u32,
    total_laps: u32,
    tyre: Compound,
    /// Laps run on the current set.
    tyre_age: u32,
    pit_stops: u32,
    /// Reward accumulated over completed laps.
    total_reward: f64,
}

impl RaceState {
    /// Create a state at the start of the race on a new set.
    pub fn new(total_laps: u32, tyre: Compound) -> Self {
        Self {
            lap: 0,
            total_laps,
            tyre,
            tyre_age: 0,
            pit_stops: 0,
            total_reward: 0.0,
        }
    }

    /// Same state with `lap` laps completed (clamped to the race length).
    pub fn at_lap(mut self, lap: u32) -> Self {
        self.lap = lap.min(self.total_laps);
        self
    }

    pub fn with_tyre_age(mut self, tyre_age: u32) -> Self {
        self.tyre_age = tyre_age;
        self
    }

    pub fn with_pit_stops(mut self, pit_stops: u32) -> Self {
        self.pit_stops = pit_stops;
        self
    }

    pub fn with_total_reward(mut self, total_reward: f64) -> Self {
        self.total_reward = total_reward;
        self
    }

    pub fn lap(&self) -> u32 {
        self.lap
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }

    pub fn tyre(&self) -> Compound {
        self.tyre
    }

    pub fn tyre_age(&self) -> u32 {
        self.tyre_age
    }

    pub fn pit_stops(&self) -> u32 {
        self.pit_stops
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Laps still to run.
    pub fn remaining_laps(&self) -> u32 {
        self.total_laps.saturating_sub(self.lap)
    }

    /// Returns true once every lap has been run
    pub fn is_finished(&self) -> bool {
        self.lap >= self.total_laps
    }

    /// Discrete tyre observation for this state.
    ///
    /// The lap a set is fitted on does not count towards its age, so a set
    /// taken at a stop stays new for one lap longer than the starting set.
    pub fn key(&self) -> TyreKey {
        let age = if self.pit_stops > 0 {
            self.tyre_age.saturating_sub(1)
        } else {
            self.tyre_age
        };
        TyreKey::new(self.tyre, age)
    }

    /// State after running one more lap.
    pub(crate) fn advance(
        &self,
        tyre: Compound,
        tyre_age: u32,
        pit_stops: u32,
        reward: f64,
    ) -> Self {
        Self {
            lap: self.lap + 1,
            total_laps: self.total_laps,
            tyre,
            tyre_age: tyre_age.saturating_add(1),
            pit_stops,
            total_reward: self.total_reward + reward,
        }
    }
}

impl fmt::Display for RaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lap {}/{} {} age {} stops {}",
            self.lap,
            self.total_laps,
            self.key(),
            self.tyre_age,
            self.pit_stops
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = RaceState::new(20, Compound::Soft);
        assert_eq!(state.lap(), 0);
        assert_eq!(state.remaining_laps(), 20);
        assert!(!state.is_finished());
        assert_eq!(state.key(), TyreKey::new(Compound::Soft, 0));
    }

    #[test]
    fn test_at_lap_clamps() {
        let state = RaceState::new(10, Compound::Hard).at_lap(25);
        assert_eq!(state.lap(), 10);
        assert!(state.is_finished());
        assert_eq!(state.remaining_laps(), 0);
    }

    #[test]
    fn test_advance() {
        let state = RaceState::new(10, Compound::Soft).with_tyre_age(3);
        let next = state.advance(Compound::Medium, 0, 1, 8.0);
        assert_eq!(next.lap(), 1);
        assert_eq!(next.tyre(), Compound::Medium);
        assert_eq!(next.tyre_age(), 1);
        assert_eq!(next.pit_stops(), 1);
        assert_eq!(next.total_reward(), 8.0);
    }

    #[test]
    fn test_advance_saturates_tyre_age() {
        let state = RaceState::new(10, Compound::Hard).with_tyre_age(u32::MAX);
        let next = state.advance(Compound::Hard, u32::MAX, 0, 0.0);
        assert_eq!(next.tyre_age(), u32::MAX);
        assert!(!next.key().fresh);
    }

    #[test]
    fn test_key_after_stop_ignores_pit_lap() {
        let start = RaceState::new(10, Compound::Soft);
        assert!(start.clone().with_tyre_age(1).key().fresh);
        assert!(!start.clone().with_tyre_age(2).key().fresh);

        let pitted = start.with_pit_stops(1);
        assert!(pitted.clone().with_tyre_age(1).key().fresh);
        assert!(pitted.clone().with_tyre_age(2).key().fresh);
        assert!(!pitted.with_tyre_age(3).key().fresh);
    }

    #[test]
    fn test_display() {
        let state = RaceState::new(20, Compound::Medium)
            .at_lap(3)
            .with_tyre_age(5)
            .with_pit_stops(1);
        assert_eq!(state.to_string(), "lap 3/20 OM age 5 stops 1");
    }
}
