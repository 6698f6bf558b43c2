//! Pitwall Core - World model abstractions and common types
//!
//! This crate provides the traits that connect a decision domain (such as
//! tyre strategy over a race) to the planners built on top of it.
//!
//! # Types
//!
//! - [`WorldModel`] - Legal actions, transitions and outcome evaluation
//! - [`Environment`] - Episodic extension used by model-free learners
//! - [`Outcome`] - A single simulated outcome sample
//! - [`PlanError`] / [`WorldModelError`] - Error taxonomy

mod error;
mod model;
mod outcome;

pub use error::{PlanError, Result, WorldModelError};
pub use model::{Environment, WorldModel};
pub use outcome::Outcome;
