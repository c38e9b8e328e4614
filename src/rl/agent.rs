// src/rl/agent.rs
//
// Tabular Q-learning agent.
//
// Action-value rows are created lazily (all-zero) on first access, so the
// table only ever holds visited states. Exploration draws come from the
// agent's own seeded RNG stream, independent of the simulation RNG, so a
// policy replay is deterministic regardless of event interleaving.

use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::AgentConfig;

/// Tabular action-value store with epsilon-greedy selection and TD(0)
/// updates.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: HashMap<usize, Vec<f64>>,
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    n_actions: usize,
    rng: ChaCha8Rng,
}

impl QLearningAgent {
    /// Hyperparameters come from a validated config; `seed` isolates the
    /// exploration stream from the simulation stream.
    pub fn new(cfg: &AgentConfig, n_actions: usize, seed: u64) -> Self {
        Self {
            q_table: HashMap::new(),
            alpha: cfg.alpha,
            gamma: cfg.gamma,
            epsilon: cfg.epsilon,
            n_actions,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Action values for `state`; an unvisited state reads as all-zero.
    pub fn q_values(&self, state: usize) -> Vec<f64> {
        self.q_table
            .get(&state)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.n_actions])
    }

    /// Greedy action for `state`, lowest index among ties.
    pub fn greedy_action(&self, state: usize) -> usize {
        match self.q_table.get(&state) {
            Some(row) => {
                let mut best = 0;
                for (i, &v) in row.iter().enumerate().skip(1) {
                    // Strict comparison keeps the lowest index on ties.
                    if v > row[best] {
                        best = i;
                    }
                }
                best
            }
            None => 0,
        }
    }

    /// Epsilon-greedy selection: explore uniformly with probability
    /// epsilon, otherwise exploit greedily.
    pub fn choose_action(&mut self, state: usize) -> usize {
        if self.epsilon > 0.0 && self.rng.gen::<f64>() < self.epsilon {
            self.rng.gen_range(0..self.n_actions)
        } else {
            self.greedy_action(state)
        }
    }

    /// One TD(0) update:
    /// `Q[s,a] += alpha * (r + gamma * max_a' Q[s',a'] - Q[s,a])`.
    pub fn learn(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        let max_next = self
            .q_table
            .get(&next_state)
            .map(|row| row.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(0.0);
        let target = reward + self.gamma * max_next;
        let row = self
            .q_table
            .entry(state)
            .or_insert_with(|| vec![0.0; self.n_actions]);
        row[action] += self.alpha * (target - row[action]);
    }

    /// Sorted snapshot of the visited part of the table.
    pub fn snapshot(&self) -> BTreeMap<usize, Vec<f64>> {
        self.q_table
            .iter()
            .map(|(&s, row)| (s, row.clone()))
            .collect()
    }

    /// Arg-max per visited row: the greedy action for every state the
    /// table has seen.
    pub fn greedy_policy(&self) -> BTreeMap<usize, usize> {
        self.q_table
            .keys()
            .map(|&s| (s, self.greedy_action(s)))
            .collect()
    }

    /// Number of visited states.
    pub fn visited_states(&self) -> usize {
        self.q_table.len()
    }
}
