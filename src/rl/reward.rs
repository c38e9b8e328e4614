// src/rl/reward.rs
//
// Reward shaping for the capacity controller.
//
// The reward is a negated cost: staffing cost per open checkout plus a
// period-weighted queueing cost, with convex penalties once the queue or
// the staffing level runs past its threshold. More queue or more staff
// past a threshold always means strictly less reward.

use serde::{Deserialize, Serialize};

/// Weights combining the observables into a scalar reward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardWeights {
    /// Cost per open checkout per decision epoch.
    pub unit_cost: f64,
    /// Total queue length beyond which the overload penalty kicks in.
    pub queue_threshold: usize,
    /// Weight on the squared queue excess.
    pub queue_overload_weight: f64,
    /// Open-checkout count beyond which the overstaffing penalty kicks in.
    pub open_ceiling: usize,
    /// Weight on the squared staffing excess.
    pub overstaff_weight: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            unit_cost: 0.5,
            queue_threshold: 8,
            queue_overload_weight: 0.25,
            open_ceiling: 5,
            overstaff_weight: 1.0,
        }
    }
}

impl RewardWeights {
    /// Validation hook used by `Config::validate`.
    pub fn validate(&self) -> Result<(), String> {
        if self.unit_cost < 0.0 {
            return Err("unit_cost must be non-negative".to_string());
        }
        if self.queue_overload_weight < 0.0 {
            return Err("queue_overload_weight must be non-negative".to_string());
        }
        if self.overstaff_weight < 0.0 {
            return Err("overstaff_weight must be non-negative".to_string());
        }
        if self.queue_threshold == 0 {
            return Err("queue_threshold must be >= 1".to_string());
        }
        if self.open_ceiling == 0 {
            return Err("open_ceiling must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Observables gathered at the end of an observation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardComponents {
    /// Open checkouts at observation time.
    pub open_count: usize,
    /// Total waiting customers across all checkouts.
    pub queue_length: usize,
    /// Queue weight of the current time period.
    pub wait_weight: f64,
}

impl RewardComponents {
    /// Scalar reward:
    /// `-(unit_cost * open) - wait_weight * queue
    ///  - queue_overload_weight * max(0, queue - threshold)^2
    ///  - overstaff_weight * max(0, open - ceiling)^2`.
    pub fn compute_reward(&self, weights: &RewardWeights) -> f64 {
        let open = self.open_count as f64;
        let queue = self.queue_length as f64;

        let mut reward = -(weights.unit_cost * open) - self.wait_weight * queue;

        let queue_excess = self.queue_length.saturating_sub(weights.queue_threshold) as f64;
        if queue_excess > 0.0 {
            reward -= weights.queue_overload_weight * queue_excess * queue_excess;
        }

        let open_excess = self.open_count.saturating_sub(weights.open_ceiling) as f64;
        if open_excess > 0.0 {
            reward -= weights.overstaff_weight * open_excess * open_excess;
        }

        reward
    }
}
