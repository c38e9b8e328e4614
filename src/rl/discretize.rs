// src/rl/discretize.rs
//
// Pure state discretizer: (time period, queue length, open checkouts)
// -> bounded integer state id for the tabular agent.
//
// Total and deterministic: every input maps to an id in [0, n_states),
// out-of-range open counts clamp to the nearest level instead of failing,
// so an odd observation can never interrupt the control loop.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::types::TimePeriod;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discretizer {
    /// Ordered queue-length thresholds; buckets are
    /// `{0, <=t[0], <=t[1], ..., > t[last]}`.
    thresholds: Vec<usize>,
    /// Open-checkout levels resolved by the table (1..=n_levels).
    n_levels: usize,
}

impl Discretizer {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            thresholds: cfg.queue_thresholds.clone(),
            n_levels: cfg.n_actions,
        }
    }

    pub fn n_queue_buckets(&self) -> usize {
        self.thresholds.len() + 2
    }

    pub fn n_states(&self) -> usize {
        TimePeriod::ALL.len() * self.n_queue_buckets() * self.n_levels
    }

    /// Bucket a total queue length: 0 -> 0, then one bucket per
    /// threshold, with everything past the last threshold in the top
    /// bucket.
    pub fn queue_bucket(&self, queue_len: usize) -> usize {
        if queue_len == 0 {
            return 0;
        }
        for (i, &t) in self.thresholds.iter().enumerate() {
            if queue_len <= t {
                return i + 1;
            }
        }
        self.thresholds.len() + 1
    }

    /// Encode the observables as a single table index:
    /// `period * (buckets * levels) + bucket * levels + (open - 1)`,
    /// with `open` clamped into `[1, n_levels]`.
    pub fn discretize(&self, period: TimePeriod, queue_len: usize, open_count: usize) -> usize {
        let bucket = self.queue_bucket(queue_len);
        let level = open_count.clamp(1, self.n_levels) - 1;
        let levels = self.n_levels;
        period.index() * (self.n_queue_buckets() * levels) + bucket * levels + level
    }
}
