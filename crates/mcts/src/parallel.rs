//! Root-parallel search.
//!
//! The simulation budget is sharded across independent trees rooted at the
//! same state. Trees are never shared between threads; only their root-level
//! statistics are merged once every worker has finished.

use crate::{
    config::MctsConfig,
    evaluator::Evaluator,
    search::{recommend, ChildStats, Mcts, SearchResult},
};
use log::debug;
use pitwall_core::{PlanError, Result, WorldModel};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Split `budget` into at most `workers` non-zero shares.
///
/// Earlier shards take the remainder, so the shares always sum to `budget`.
pub fn shard_budget(budget: usize, workers: usize) -> Vec<usize> {
    let workers = workers.max(1).min(budget);
    if workers == 0 {
        return Vec::new();
    }
    let base = budget / workers;
    let extra = budget % workers;
    (0..workers)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Merge per-worker root statistics by action.
///
/// Visit counts and reward sums are added; the merged order is the order in
/// which actions first appear scanning workers by index.
pub fn merge_root_stats<A: Copy + PartialEq>(shards: &[Vec<ChildStats<A>>]) -> Vec<ChildStats<A>> {
    let mut merged: Vec<ChildStats<A>> = Vec::new();
    for stats in shards.iter().flatten() {
        match merged.iter_mut().find(|m| m.action == stats.action) {
            Some(existing) => {
                existing.visit_count += stats.visit_count;
                existing.reward_sum += stats.reward_sum;
            }
            None => merged.push(stats.clone()),
        }
    }
    merged
}

/// Run `workers` independent searches in parallel and merge their roots.
///
/// Worker `i` uses a `ChaCha8Rng` seeded with `seed + i`, so the merged result
/// is reproducible for a fixed seed and worker count regardless of thread
/// scheduling.
///
/// # Errors
/// Same as [`Mcts::search`]; the first failing worker's error is returned.
pub fn search_parallel<M, E>(
    model: &M,
    initial_state: &M::State,
    config: &MctsConfig,
    evaluator: &E,
    seed: u64,
    workers: usize,
) -> Result<SearchResult<M::Action>>
where
    M: WorldModel + Sync,
    M::State: Send + Sync,
    M::Action: Send,
    E: Evaluator<M> + Clone + Send + Sync,
{
    config.validate()?;
    let shards = shard_budget(config.num_simulations, workers);

    let results: Vec<SearchResult<M::Action>> = shards
        .par_iter()
        .enumerate()
        .map(|(i, &share)| {
            let worker_config = MctsConfig {
                num_simulations: share,
                ..config.clone()
            };
            let rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
            let mut mcts = Mcts::new(worker_config, evaluator.clone(), rng);
            mcts.search(model, initial_state)
        })
        .collect::<Result<_>>()?;

    let per_worker: Vec<Vec<ChildStats<M::Action>>> =
        results.iter().map(|r| r.children.clone()).collect();
    let children = merge_root_stats(&per_worker);
    let best_action = recommend(&children).ok_or(PlanError::NoActionsExplored)?;

    debug!(
        "parallel search finished: {} workers, {} merged root actions",
        results.len(),
        children.len()
    );

    Ok(SearchResult {
        children,
        best_action,
        simulations_run: results.iter().map(|r| r.simulations_run).sum(),
        stopped_early: results.iter().any(|r| r.stopped_early),
        tree_size: results.iter().map(|r| r.tree_size).sum(),
    })
}
