//! Monte Carlo Tree Search implementation.
//!
//! Implements UCB1 tree search: every cycle selects a node, expands one
//! untried action, simulates an outcome and backpropagates it to the root.

use crate::{
    config::MctsConfig,
    evaluator::{Evaluator, ModelEvaluator},
    node::NodeId,
    tree::SearchTree,
};
use log::{debug, trace, warn};
use pitwall_core::{Outcome, PlanError, Result, WorldModel, WorldModelError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Instant;

/// Root-level statistics for one explored action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChildStats<A> {
    pub action: A,
    pub visit_count: u32,
    pub reward_sum: f64,
}

impl<A> ChildStats<A> {
    /// Mean outcome; 0.0 for an unvisited child.
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward_sum / f64::from(self.visit_count)
        }
    }
}

/// Pick the action with the highest mean outcome.
///
/// Ties go to the first entry, so expansion order decides between equally
/// scored children. A NaN mean ranks below every real mean. Returns None
/// for an empty slice.
pub fn recommend<A: Copy>(children: &[ChildStats<A>]) -> Option<A> {
    let score = |child: &ChildStats<A>| {
        let mean = child.mean_reward();
        if mean.is_nan() {
            f64::NEG_INFINITY
        } else {
            mean
        }
    };

    let mut best: Option<(A, f64)> = None;
    for child in children {
        let value = score(child);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((child.action, value)),
        }
    }
    best.map(|(action, _)| action)
}

/// Result of an MCTS search.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResult<A> {
    /// Statistics of every root child, in expansion order.
    pub children: Vec<ChildStats<A>>,

    /// Root child with the highest mean outcome.
    pub best_action: A,

    /// Cycles actually performed (below the budget only after a time limit).
    pub simulations_run: usize,

    /// Whether the time limit ended the search before the budget did.
    pub stopped_early: bool,

    /// Number of nodes in the search tree.
    pub tree_size: usize,
}

impl<A: Copy + PartialEq> SearchResult<A> {
    /// Statistics for one root action, if it was explored.
    pub fn child(&self, action: A) -> Option<&ChildStats<A>> {
        self.children.iter().find(|c| c.action == action)
    }

    /// Sum of visit counts over the root's children.
    pub fn total_visits(&self) -> u64 {
        self.children.iter().map(|c| u64::from(c.visit_count)).sum()
    }
}

/// A fully grown search tree and how it was grown.
#[derive(Clone, Debug)]
pub struct GrownTree<S, A> {
    pub tree: SearchTree<S, A>,
    pub simulations_run: usize,
    pub stopped_early: bool,
}

impl<S, A: Copy> GrownTree<S, A> {
    /// Root child statistics in expansion order.
    pub fn root_children(&self) -> Vec<ChildStats<A>> {
        self.tree
            .children_of(NodeId::ROOT)
            .map(|(action, child)| ChildStats {
                action,
                visit_count: child.visit_count(),
                reward_sum: child.reward_sum(),
            })
            .collect()
    }

    /// Extract the recommendation, discarding the tree.
    ///
    /// # Errors
    /// `PlanError::NoActionsExplored` if the root never got a child.
    pub fn into_result(self) -> Result<SearchResult<A>> {
        let children = self.root_children();
        let best_action = recommend(&children).ok_or(PlanError::NoActionsExplored)?;
        Ok(SearchResult {
            children,
            best_action,
            simulations_run: self.simulations_run,
            stopped_early: self.stopped_early,
            tree_size: self.tree.len(),
        })
    }
}

/// Monte Carlo Tree Search with UCB1 selection.
///
/// Generic over:
/// - `M`: The world model being planned over
/// - `E`: The simulation strategy
/// - `R`: The random number generator
pub struct Mcts<M: WorldModel, E: Evaluator<M>, R: Rng> {
    config: MctsConfig,
    evaluator: E,
    rng: R,
    _model: PhantomData<fn(&M)>,
}

impl<M, E, R> Mcts<M, E, R>
where
    M: WorldModel,
    E: Evaluator<M>,
    R: Rng,
{
    /// Create a new MCTS instance.
    pub fn new(config: MctsConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            _model: PhantomData,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Run the search and return only the recommended action.
    pub fn run(&mut self, model: &M, initial_state: &M::State) -> Result<M::Action> {
        Ok(self.search(model, initial_state)?.best_action)
    }

    /// Run MCTS from the given state, returning root statistics.
    pub fn search(
        &mut self,
        model: &M,
        initial_state: &M::State,
    ) -> Result<SearchResult<M::Action>> {
        let grown = self.grow(model, initial_state)?;
        let result = grown.into_result()?;
        debug!(
            "search finished: {} simulations, {} nodes, best {:?}",
            result.simulations_run, result.tree_size, result.best_action
        );
        Ok(result)
    }

    /// Grow a fresh tree from `initial_state` and hand it back for inspection.
    ///
    /// # Errors
    /// - `PlanError::InvalidBudget` / `InvalidExplorationConstant` for a bad config
    /// - `PlanError::InvalidInitialState` if the root has no legal actions
    /// - `PlanError::WorldModel` for any world model failure, unchanged
    /// - `PlanError::NonFiniteOutcome` if a simulation yields NaN or infinity
    pub fn grow(
        &mut self,
        model: &M,
        initial_state: &M::State,
    ) -> Result<GrownTree<M::State, M::Action>> {
        self.config.validate()?;

        let root_actions = model.legal_actions(initial_state)?;
        if root_actions.is_empty() {
            return Err(PlanError::InvalidInitialState);
        }

        let mut tree = SearchTree::new(initial_state.clone(), root_actions);
        let deadline = self.config.time_limit_duration();
        let started = Instant::now();
        let budget = self.config.num_simulations;
        let mut simulations_run = 0;
        let mut stopped_early = false;

        while simulations_run < budget {
            self.simulate(model, &mut tree)?;
            simulations_run += 1;

            if let Some(limit) = deadline {
                if simulations_run < budget && started.elapsed() >= limit {
                    warn!(
                        "time limit of {:?} reached after {}/{} simulations",
                        limit, simulations_run, budget
                    );
                    stopped_early = true;
                    break;
                }
            }
        }

        Ok(GrownTree {
            tree,
            simulations_run,
            stopped_early,
        })
    }

    /// Run a single cycle: select -> expand -> simulate -> backpropagate.
    fn simulate(&mut self, model: &M, tree: &mut SearchTree<M::State, M::Action>) -> Result<()> {
        let selected = select(tree, self.config.exploration_constant);
        let leaf = self.expand(model, tree, selected)?;
        let outcome = self
            .evaluator
            .evaluate(model, tree.get(leaf).state(), &mut self.rng)?;
        if !outcome.value().is_finite() {
            return Err(PlanError::NonFiniteOutcome(outcome.value()));
        }
        trace!(
            "cycle: selected #{} simulated #{} -> {}",
            selected.index(),
            leaf.index(),
            outcome
        );
        backpropagate(tree, leaf, outcome);
        Ok(())
    }

    /// Expand one untried action of `node_id`, returning the new child.
    ///
    /// A node with nothing left to try is returned unchanged.
    fn expand(
        &mut self,
        model: &M,
        tree: &mut SearchTree<M::State, M::Action>,
        node_id: NodeId,
    ) -> std::result::Result<NodeId, WorldModelError> {
        let node = tree.get(node_id);
        let Some(&action) = node.untried_actions().last() else {
            return Ok(node_id);
        };

        let child_state = model.transition(node.state(), action, &mut self.rng)?;
        let child_actions = model.legal_actions(&child_state)?;

        tree.get_mut(node_id).untried_actions.pop();
        Ok(tree.add_child(node_id, action, child_state, child_actions))
    }
}

/// Descend from the root along UCB1-best children.
///
/// Stops at the first node that still has untried actions or has no
/// children at all. Never mutates statistics.
pub(crate) fn select<S, A: Copy>(tree: &SearchTree<S, A>, exploration_constant: f64) -> NodeId {
    let mut current = NodeId::ROOT;
    loop {
        let node = tree.get(current);
        if !node.is_fully_expanded() || node.children().is_empty() {
            return current;
        }
        current = select_child(tree, current, exploration_constant);
    }
}

/// Select the child of `node_id` with the highest UCB1 score.
///
/// `N` is the total visit count of the sibling set. Ties go to the child
/// expanded first.
///
/// # Panics
/// Panics if the node has no children.
pub(crate) fn select_child<S, A: Copy>(
    tree: &SearchTree<S, A>,
    node_id: NodeId,
    exploration_constant: f64,
) -> NodeId {
    let children = tree.get(node_id).children();
    let sibling_visits: u32 = children.iter().map(|&id| tree.get(id).visit_count()).sum();

    let mut best_id = children[0];
    let mut best_score = f64::NEG_INFINITY;

    for &child_id in children {
        let score = tree
            .get(child_id)
            .stats()
            .ucb1(sibling_visits, exploration_constant);
        if score > best_score {
            best_score = score;
            best_id = child_id;
        }
    }

    best_id
}

/// Add one visit and the outcome to every node from `leaf` up to the root.
pub(crate) fn backpropagate<S, A: Copy>(
    tree: &mut SearchTree<S, A>,
    leaf: NodeId,
    outcome: Outcome,
) {
    let value = outcome.value();
    let mut current = Some(leaf);

    while let Some(node_id) = current {
        let node = tree.get_mut(node_id);
        node.stats.visit_count += 1;
        node.stats.reward_sum += value;
        current = node.parent;
    }
}

/// Plan one action with the default evaluator and a seeded generator.
///
/// Equivalent to building an [`Mcts`] with [`ModelEvaluator`] and a
/// `ChaCha8Rng` seeded from `seed`, then calling [`Mcts::run`].
pub fn run<M: WorldModel>(
    model: &M,
    initial_state: &M::State,
    simulation_budget: usize,
    exploration_constant: f64,
    seed: u64,
) -> Result<M::Action> {
    let config = MctsConfig::with_simulations(simulation_budget)
        .exploration(exploration_constant);
    let mut mcts = Mcts::new(config, ModelEvaluator, ChaCha8Rng::seed_from_u64(seed));
    mcts.run(model, initial_state)
}
