//! Q-table implementation for temporal difference learning

use std::collections::HashMap;
use std::hash::Hash;

/// Q-table mapping (state key, action) pairs to Q-values
#[derive(Debug, Clone)]
pub struct QTable<K, A> {
    q_values: HashMap<(K, A), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value for unseen state-action pairs
    q_init: f64,
}

impl<K, A> QTable<K, A>
where
    K: Clone + Eq + Hash,
    A: Copy + Eq + Hash,
{
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64, q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, key: &K, action: A) -> f64 {
        self.q_values
            .get(&(key.clone(), action))
            .copied()
            .unwrap_or(self.q_init)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, key: K, action: A, value: f64) {
        self.q_values.insert((key, action), value);
    }

    /// Get maximum Q-value over legal actions in a state
    ///
    /// Returns `q_init` when there are no legal actions.
    pub fn max_q(&self, key: &K, legal_actions: &[A]) -> f64 {
        legal_actions
            .iter()
            .map(|&action| self.get(key, action))
            .reduce(f64::max)
            .unwrap_or(self.q_init)
    }

    /// Select greedy action (highest Q-value) from legal actions
    ///
    /// Ties go to the action listed first. Returns None if there are no
    /// legal actions.
    pub fn greedy_action(&self, key: &K, legal_actions: &[A]) -> Option<A> {
        let mut best: Option<(A, f64)> = None;
        for &action in legal_actions {
            let q = self.get(key, action);
            match best {
                Some((_, best_q)) if q <= best_q => {}
                _ => best = Some((action, q)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// A terminal successor (`done`) contributes no bootstrap term.
    pub fn update(
        &mut self,
        key: K,
        action: A,
        reward: f64,
        next_key: &K,
        next_legal_actions: &[A],
        done: bool,
    ) {
        let current_q = self.get(&key, action);
        let max_next_q = if done || next_legal_actions.is_empty() {
            0.0
        } else {
            self.max_q(next_key, next_legal_actions)
        };
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        self.set(key, action, current_q + self.learning_rate * td_error);
    }

    /// Reset all Q-values
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}
