//! Pitwall Race - tyre-strategy world model
//!
//! A single car runs a fixed number of laps. Each lap it may stay out or pit
//! for a fresh set of one of three compounds. Softer compounds are faster
//! but degrade quicker; every stop costs a fixed amount of lap reward.
//!
//! The model implements both `WorldModel` (for tree search) and
//! `Environment` (for tabular learners).

mod action;
mod config;
mod model;
mod state;
mod tyre;

pub use action::RaceAction;
pub use config::RaceConfig;
pub use model::RaceModel;
pub use state::RaceState;
pub use tyre::{Compound, ParseCompoundError, TyreKey};
