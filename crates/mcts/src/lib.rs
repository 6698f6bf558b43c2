//! Monte Carlo Tree Search for decision-time planning.
//!
//! This crate provides a generic UCB1 tree search that can be used with
//! any domain implementing the `pitwall_core::WorldModel` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `WorldModel` implementation
//! - **UCB1 Selection**: `mean + C * sqrt(ln N / n)`, unvisited children first
//! - **Arena Tree**: Nodes live in one vector; parents are plain indices
//! - **Evaluator Abstraction**: Model heuristic, coin flip, or random rollouts
//! - **Time Limits**: Optional wall-clock bound checked between cycles
//! - **Root Parallelism**: Independent trees merged at the root (rayon)
//!
//! # Example
//!
//! ```
//! use pitwall_mcts::{Mcts, MctsConfig, ModelEvaluator};
//! use pitwall_race::{RaceConfig, RaceModel};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let model = RaceModel::new(RaceConfig::with_laps(20)).unwrap();
//! let state = model.start();
//!
//! let config = MctsConfig::with_simulations(200);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut mcts = Mcts::new(config, ModelEvaluator, rng);
//!
//! let result = mcts.search(&model, &state).unwrap();
//! println!("Best action: {}", result.best_action);
//! assert_eq!(result.total_visits(), 200);
//! ```

pub mod config;
pub mod evaluator;
mod node;
pub mod parallel;
pub mod search;
pub mod tree;

pub use config::MctsConfig;
pub use evaluator::{CoinFlipEvaluator, Evaluator, ModelEvaluator, RolloutEvaluator};
pub use node::{Node, NodeId, NodeStats};
pub use parallel::search_parallel;
pub use search::{recommend, run, ChildStats, GrownTree, Mcts, SearchResult};
pub use tree::SearchTree;
