//! Q-learning agent
//!
//! Learns action values from experienced transitions with ε-greedy
//! exploration, one episode at a time.

use crate::{LearnError, QLearningConfig, QTable, Result};
use log::debug;
use pitwall_core::Environment;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::Hash;

/// What happened in one episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary<A> {
    /// Sum of step rewards.
    pub total_reward: f64,

    /// Transitions taken before the terminal state.
    pub steps: usize,

    /// Actions in the order they were taken.
    pub actions: Vec<A>,
}

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal Q* function by always updating toward the maximum
/// next-state value, regardless of the action actually taken.
#[derive(Debug, Clone)]
pub struct QLearningAgent<K, A> {
    q_table: QTable<K, A>,
    config: QLearningConfig,
    epsilon: f64,
    episodes: usize,
    rng: ChaCha8Rng,
}

impl<K, A> QLearningAgent<K, A>
where
    K: Clone + Eq + Hash,
    A: Copy + Eq + Hash,
{
    /// Create a new Q-learning agent with a seeded generator.
    ///
    /// # Errors
    /// Returns `LearnError::InvalidConfig` if the config does not validate.
    pub fn new(config: QLearningConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(config.learning_rate, config.discount_factor, config.q_init),
            epsilon: config.epsilon,
            config,
            episodes: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn q_table(&self) -> &QTable<K, A> {
        &self.q_table
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Training episodes completed.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// ε-greedy action selection
    ///
    /// # Errors
    /// `LearnError::NoLegalActions` if `legal_actions` is empty.
    pub fn choose_action(&mut self, key: &K, legal_actions: &[A]) -> Result<A> {
        if legal_actions.is_empty() {
            return Err(LearnError::NoLegalActions);
        }
        if self.rng.gen::<f64>() < self.epsilon {
            // Explore: random action
            legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(LearnError::NoLegalActions)
        } else {
            // Exploit: greedy action based on Q-values
            self.greedy_action(key, legal_actions)
        }
    }

    /// Greedy action, ties broken by listing order.
    pub fn greedy_action(&self, key: &K, legal_actions: &[A]) -> Result<A> {
        self.q_table
            .greedy_action(key, legal_actions)
            .ok_or(LearnError::NoLegalActions)
    }

    /// Run one ε-greedy episode, updating the table after every step.
    pub fn train_episode<E>(&mut self, env: &E) -> Result<EpisodeSummary<A>>
    where
        E: Environment<Key = K, Action = A>,
    {
        let summary = self.play(env, true)?;
        self.episodes += 1;
        self.decay_epsilon();
        debug!(
            "episode {}: reward {:.2} over {} steps, epsilon {:.4}",
            self.episodes, summary.total_reward, summary.steps, self.epsilon
        );
        Ok(summary)
    }

    /// Follow the greedy policy for one episode without learning.
    pub fn greedy_episode<E>(&mut self, env: &E) -> Result<EpisodeSummary<A>>
    where
        E: Environment<Key = K, Action = A>,
    {
        self.play(env, false)
    }

    fn play<E>(&mut self, env: &E, learn: bool) -> Result<EpisodeSummary<A>>
    where
        E: Environment<Key = K, Action = A>,
    {
        let mut state = env.initial_state();
        let mut legal = env.legal_actions(&state)?;
        let mut summary = EpisodeSummary {
            total_reward: 0.0,
            steps: 0,
            actions: Vec::new(),
        };

        while !legal.is_empty() {
            if summary.steps >= self.config.max_steps_per_episode {
                return Err(LearnError::EpisodeTooLong(summary.steps));
            }

            let key = env.observe(&state);
            let action = if learn {
                self.choose_action(&key, &legal)?
            } else {
                self.greedy_action(&key, &legal)?
            };

            let next = env.transition(&state, action, &mut self.rng)?;
            let reward = env.reward(&state, action, &next);
            let next_legal = env.legal_actions(&next)?;

            if learn {
                let next_key = env.observe(&next);
                let done = next_legal.is_empty();
                self.q_table
                    .update(key, action, reward, &next_key, &next_legal, done);
            }

            summary.total_reward += reward;
            summary.steps += 1;
            summary.actions.push(action);
            state = next;
            legal = next_legal;
        }

        Ok(summary)
    }

    /// Decay epsilon after episode
    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay)
            .max(self.config.min_epsilon);
    }
}
