//! Planner construction from command-line options.

use anyhow::Result;
use clap::{Args, ValueEnum};
use pitwall_mcts::{
    search_parallel, CoinFlipEvaluator, Evaluator, Mcts, MctsConfig, ModelEvaluator,
    RolloutEvaluator, SearchResult,
};
use pitwall_race::{RaceAction, RaceModel, RaceState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Simulation-phase strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EvaluatorKind {
    /// Race model's own projection of the remaining laps.
    Model,
    /// Fair coin flip, ignoring the state.
    Coin,
    /// Random strategy to the flag, then the model's projection.
    Rollout,
}

/// Tree-search options shared by every planning command.
#[derive(Args, Clone, Debug)]
pub struct PlannerArgs {
    /// Number of MCTS simulations per decision.
    #[arg(short, long, default_value = "1000")]
    pub simulations: usize,

    /// UCB1 exploration constant.
    #[arg(short, long, default_value = "2.0")]
    pub exploration: f64,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Independent search trees to run in parallel (root parallelism).
    #[arg(short, long, default_value = "1")]
    pub workers: usize,

    /// Wall-clock limit per decision in milliseconds.
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Simulation-phase evaluator.
    #[arg(long, value_enum, default_value = "model")]
    pub evaluator: EvaluatorKind,

    /// Maximum laps simulated by the rollout evaluator.
    #[arg(long, default_value = "50")]
    pub rollout_depth: usize,
}

impl PlannerArgs {
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig {
            num_simulations: self.simulations,
            exploration_constant: self.exploration,
            time_limit_ms: self.time_limit_ms,
        }
    }
}

/// Plan one decision from `state` with the configured evaluator.
pub fn plan(
    model: &RaceModel,
    state: &RaceState,
    args: &PlannerArgs,
    seed: u64,
) -> Result<SearchResult<RaceAction>> {
    match args.evaluator {
        EvaluatorKind::Model => plan_with(model, state, args, ModelEvaluator, seed),
        EvaluatorKind::Coin => plan_with(model, state, args, CoinFlipEvaluator::default(), seed),
        EvaluatorKind::Rollout => plan_with(
            model,
            state,
            args,
            RolloutEvaluator::new(args.rollout_depth),
            seed,
        ),
    }
}

fn plan_with<E>(
    model: &RaceModel,
    state: &RaceState,
    args: &PlannerArgs,
    evaluator: E,
    seed: u64,
) -> Result<SearchResult<RaceAction>>
where
    E: Evaluator<RaceModel> + Clone + Send + Sync,
{
    let config = args.mcts_config();
    let result = if args.workers > 1 {
        search_parallel(model, state, &config, &evaluator, seed, args.workers)?
    } else {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Mcts::new(config, evaluator, rng).search(model, state)?
    };
    Ok(result)
}
