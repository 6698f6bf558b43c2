//! Tabular Q-learning for pitwall environments.
//!
//! A model-free alternative to tree search: the agent never calls the
//! transition function directly to plan, it only learns action values from
//! the transitions it experiences while acting ε-greedily.
//!
//! # Example
//!
//! ```
//! use pitwall_qlearn::{QLearningAgent, QLearningConfig};
//! use pitwall_race::{RaceConfig, RaceModel};
//!
//! let env = RaceModel::new(RaceConfig::with_laps(20)).unwrap();
//! let mut agent = QLearningAgent::new(QLearningConfig::default(), 42).unwrap();
//!
//! for _ in 0..50 {
//!     agent.train_episode(&env).unwrap();
//! }
//! let summary = agent.greedy_episode(&env).unwrap();
//! assert_eq!(summary.steps, 20);
//! ```

mod agent;
mod config;
mod error;
mod q_table;

pub use agent::{EpisodeSummary, QLearningAgent};
pub use config::QLearningConfig;
pub use error::{LearnError, Result};
pub use q_table::QTable;
