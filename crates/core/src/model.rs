use crate::{Outcome, WorldModelError};
use rand::Rng;
use std::fmt::Debug;
use std::hash::Hash;

/// A decision domain for tree-search planning.
///
/// The planner treats states as opaque values: it only clones them and hands
/// them back to the model. Randomness is always borrowed from the caller so
/// that a seeded generator makes a whole planning call reproducible.
pub trait WorldModel {
    /// A snapshot of the domain (e.g., race lap and tyre condition).
    type State: Clone;

    /// A decision taken in a state. Action sets are small and closed.
    type Action: Copy + Eq + Hash + Debug;

    /// Returns all legal actions from the given state.
    ///
    /// Must be deterministic. An empty list marks a terminal state.
    fn legal_actions(&self, state: &Self::State) -> Result<Vec<Self::Action>, WorldModelError>;

    /// Applies an action, returning a new state (immutable operation).
    ///
    /// May be stochastic; repeated calls need not agree.
    fn transition<R: Rng + ?Sized>(
        &self,
        state: &Self::State,
        action: Self::Action,
        rng: &mut R,
    ) -> Result<Self::State, WorldModelError>;

    /// Produces one outcome sample for a (possibly non-terminal) state,
    /// representing the belief about eventual success from that point.
    fn evaluate<R: Rng + ?Sized>(
        &self,
        state: &Self::State,
        rng: &mut R,
    ) -> Result<Outcome, WorldModelError>;

    /// Returns true if the state has no legal actions.
    fn is_terminal(&self, state: &Self::State) -> Result<bool, WorldModelError> {
        Ok(self.legal_actions(state)?.is_empty())
    }
}

/// Episodic view of a world model for model-free learners.
///
/// Learners never see the transition function; they only observe a discrete
/// key for each state and the reward of each step they take.
pub trait Environment: WorldModel {
    /// Discrete, hashable observation used as a table key.
    type Key: Clone + Eq + Hash + Debug;

    /// The state every episode starts from.
    fn initial_state(&self) -> Self::State;

    /// Maps a state to its tabular key.
    fn observe(&self, state: &Self::State) -> Self::Key;

    /// Immediate reward for the step `state --action--> next`.
    fn reward(&self, state: &Self::State, action: Self::Action, next: &Self::State) -> f64;
}
