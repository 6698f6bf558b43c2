//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Parent links are plain indices, so the tree owns every node exactly once
/// and back-references never form ownership cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena (creation order).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Statistics for a single MCTS node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// Number of completed simulations that passed through this node.
    pub visit_count: u32,

    /// Sum of outcome contributions from all visits.
    pub reward_sum: f64,
}

impl NodeStats {
    /// Mean outcome for this node.
    ///
    /// Returns 0.0 if the node has never been visited.
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward_sum / f64::from(self.visit_count)
        }
    }

    /// UCB1 score relative to a sibling set with `sibling_visits` total visits.
    ///
    /// Unvisited nodes score `+inf` so they are always tried before any
    /// visited sibling.
    pub fn ucb1(&self, sibling_visits: u32, exploration_constant: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(self.visit_count);
        // ln(N) for N <= 1 contributes no exploration bonus.
        let ln_total = f64::from(sibling_visits.max(1)).ln();
        self.mean_reward() + exploration_constant * (ln_total / n).sqrt()
    }
}

/// A node in the MCTS tree.
///
/// Each node owns a snapshot of the state it represents and the actions
/// that have not been expanded from it yet.
#[derive(Clone, Debug)]
pub struct Node<S, A> {
    pub(crate) state: S,
    pub(crate) parent: Option<NodeId>,
    pub(crate) action: Option<A>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) untried_actions: Vec<A>,
    pub(crate) stats: NodeStats,
}

impl<S, A> Node<S, A> {
    /// Create a fresh, unvisited node.
    pub(crate) fn new(
        state: S,
        parent: Option<NodeId>,
        action: Option<A>,
        untried: Vec<A>,
    ) -> Self {
        Self {
            state,
            parent,
            action,
            children: Vec::new(),
            untried_actions: untried,
            stats: NodeStats::default(),
        }
    }

    /// The state this node represents.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Parent node (None for root).
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in expansion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Actions not yet expanded from this node.
    pub fn untried_actions(&self) -> &[A] {
        &self.untried_actions
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    pub fn visit_count(&self) -> u32 {
        self.stats.visit_count
    }

    pub fn reward_sum(&self) -> f64 {
        self.stats.reward_sum
    }

    /// True once every legal action has a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// True for a node with nothing left to expand and nothing below it.
    pub fn is_dead_end(&self) -> bool {
        self.untried_actions.is_empty() && self.children.is_empty()
    }
}

impl<S, A: Copy> Node<S, A> {
    /// Action that led to this node (None for root).
    pub fn action(&self) -> Option<A> {
        self.action
    }
}
