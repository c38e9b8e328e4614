// src/rl/policy.rs
//
// Capacity-decision policies.
//
// The control loop only ever talks to the CapacityPolicy trait, so the
// fixed-rule and learned variants share one simulation engine instead of
// duplicating it per experiment. The policy proposes a staffing level;
// the pool enforces its own invariants when the level is applied.

use serde::{Deserialize, Serialize};

use super::agent::QLearningAgent;

/// One completed decision epoch, consumed by `observe`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: usize,
    pub action: usize,
    pub reward: f64,
    pub next_state: usize,
}

/// Strategy seam between the control loop and the decision maker.
///
/// Action convention: action `a` targets `a + 1` open checkouts, so
/// action 0 means "run with a single open checkout".
pub trait CapacityPolicy {
    /// Pick an action for the discretized state.
    fn decide(&mut self, state: usize) -> usize;

    /// Feed back the completed transition. Non-learning policies ignore it.
    fn observe(&mut self, transition: &Transition);
}

/// Static policy: always the same action. Used for baselines and for
/// deterministic end-to-end tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy {
    action: usize,
}

impl FixedPolicy {
    pub fn new(action: usize) -> Self {
        Self { action }
    }
}

impl CapacityPolicy for FixedPolicy {
    fn decide(&mut self, _state: usize) -> usize {
        self.action
    }

    fn observe(&mut self, _transition: &Transition) {
        // intentionally no-op
    }
}

/// Q-learning-backed policy.
#[derive(Debug, Clone)]
pub struct LearnedPolicy {
    agent: QLearningAgent,
}

impl LearnedPolicy {
    pub fn new(agent: QLearningAgent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    /// Hand the agent back (e.g. to carry it into the next episode).
    pub fn into_agent(self) -> QLearningAgent {
        self.agent
    }
}

impl CapacityPolicy for LearnedPolicy {
    fn decide(&mut self, state: usize) -> usize {
        self.agent.choose_action(state)
    }

    fn observe(&mut self, transition: &Transition) {
        self.agent.learn(
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;

    #[test]
    fn fixed_policy_is_constant_and_ignores_feedback() {
        let mut p = FixedPolicy::new(1);
        assert_eq!(p.decide(0), 1);
        p.observe(&Transition {
            state: 0,
            action: 1,
            reward: -100.0,
            next_state: 3,
        });
        assert_eq!(p.decide(3), 1);
        assert_eq!(p.decide(124), 1);
    }

    #[test]
    fn learned_policy_feeds_transitions_to_the_agent() {
        let cfg = AgentConfig {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.0,
        };
        let mut p = LearnedPolicy::new(QLearningAgent::new(&cfg, 3, 0));
        p.observe(&Transition {
            state: 5,
            action: 2,
            reward: 4.0,
            next_state: 6,
        });
        assert!(p.agent().q_values(5)[2] > 0.0);
        // Greedy selection now prefers the rewarded action.
        assert_eq!(p.decide(5), 2);
    }
}
