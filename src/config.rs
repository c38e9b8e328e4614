// src/config.rs
//
// Central configuration for the tillsim simulator.
// This is the single source of truth for the arrival model (per-period
// rates and customer-kind mixes), the customer duration tables, the
// checkout pool bounds, the state discretizer shape, the agent
// hyperparameters, and the reward weights.
//
// Everything is validated once, at construction; a validated config can
// never produce a mid-run failure.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rl::reward::RewardWeights;
use crate::types::{CustomerKind, TimePeriod};

/// Bounds of a uniform duration draw, in minutes: samples lie in
/// `[lo, hi)`, or exactly `lo` when the range is degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub lo: f64,
    pub hi: f64,
}

impl DurationRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

/// Per-kind shopping and service duration ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindDurations {
    pub shopping: DurationRange,
    pub service: DurationRange,
}

/// Arrival-model row for one time period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Mean customer arrivals per simulated minute (Poisson rate).
    pub arrival_rate: f64,
    /// Probability of each customer kind, indexed `[quick, regular, lengthy]`.
    /// Must sum to 1.
    pub kind_probs: [f64; 3],
    /// Weight on total queue length in the reward for this period.
    pub wait_weight: f64,
}

/// Q-learning hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α, in (0, 1).
    pub alpha: f64,
    /// Discount factor γ, in (0, 1).
    pub gamma: f64,
    /// Exploration rate ε, in [0, 1].
    pub epsilon: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            epsilon: 0.1,
        }
    }
}

/// Full simulator configuration.
///
/// All fields have canonical defaults, so YAML scenarios only need to
/// name the fields they override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Total simulated minutes for one run / episode.
    pub duration_min: f64,
    /// Checkouts open at time 0.
    pub initial_open: usize,
    /// Floor on open checkouts; capacity decreases below this are no-ops.
    pub min_open: usize,
    /// Number of agent actions. Action `a` targets `a + 1` open checkouts,
    /// so this is also the maximum pool size the discretizer resolves.
    pub n_actions: usize,
    /// Minutes between control-loop decision epochs.
    pub decision_period_min: f64,
    /// Minutes between queue-telemetry samples.
    pub log_period_min: f64,
    /// Master seed for the run. The environment and the agent derive
    /// their own ChaCha8 streams from it.
    pub seed: u64,
    /// Ordered queue-length bucket thresholds `[low, mid, high]`:
    /// buckets are `{0, <=low, <=mid, <=high, >high}`.
    pub queue_thresholds: Vec<usize>,
    /// Arrival-model rows, indexed by `TimePeriod::index()`.
    pub periods: Vec<PeriodConfig>,
    /// Duration tables, indexed by `CustomerKind::index()`.
    pub kinds: Vec<KindDurations>,
    /// Agent hyperparameters.
    pub agent: AgentConfig,
    /// Reward weights.
    pub reward: RewardWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_min: 1020.0,
            initial_open: 2,
            min_open: 1,
            n_actions: 5,
            decision_period_min: 10.0,
            log_period_min: 1.0,
            seed: 0,
            queue_thresholds: vec![2, 5, 9],
            periods: vec![
                // early_morning 06:00-08:00
                PeriodConfig {
                    arrival_rate: 1.0,
                    kind_probs: [0.6, 0.3, 0.1],
                    wait_weight: 1.0,
                },
                // morning 08:00-11:00
                PeriodConfig {
                    arrival_rate: 1.0,
                    kind_probs: [0.4, 0.4, 0.2],
                    wait_weight: 1.0,
                },
                // lunch 11:00-14:00
                PeriodConfig {
                    arrival_rate: 4.0,
                    kind_probs: [0.7, 0.2, 0.1],
                    wait_weight: 2.0,
                },
                // afternoon 14:00-17:00
                PeriodConfig {
                    arrival_rate: 0.5,
                    kind_probs: [0.3, 0.5, 0.2],
                    wait_weight: 1.0,
                },
                // evening 17:00-06:00
                PeriodConfig {
                    arrival_rate: 1.0,
                    kind_probs: [0.2, 0.5, 0.3],
                    wait_weight: 1.5,
                },
            ],
            kinds: vec![
                // quick
                KindDurations {
                    shopping: DurationRange::new(2.0, 5.0),
                    service: DurationRange::new(1.0, 3.0),
                },
                // regular
                KindDurations {
                    shopping: DurationRange::new(5.0, 15.0),
                    service: DurationRange::new(2.0, 5.0),
                },
                // lengthy
                KindDurations {
                    shopping: DurationRange::new(10.0, 30.0),
                    service: DurationRange::new(4.0, 8.0),
                },
            ],
            agent: AgentConfig::default(),
            reward: RewardWeights::default(),
        }
    }
}

impl Config {
    /// Number of queue-length buckets implied by the thresholds.
    pub fn n_queue_buckets(&self) -> usize {
        self.queue_thresholds.len() + 2
    }

    /// Total discrete states: periods x queue buckets x open-count levels.
    pub fn n_states(&self) -> usize {
        TimePeriod::ALL.len() * self.n_queue_buckets() * self.n_actions
    }

    /// Arrival-model row for a period.
    pub fn period(&self, period: TimePeriod) -> &PeriodConfig {
        &self.periods[period.index()]
    }

    /// Duration table for a customer kind.
    pub fn durations(&self, kind: CustomerKind) -> &KindDurations {
        &self.kinds[kind.index()]
    }

    /// Load a config from a YAML scenario file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e.to_string(),
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a config from a YAML string and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            source: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the configuration. Called once at construction; every
    /// runtime component may assume a validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &str, message: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Validation {
                field: field.to_string(),
                message: message.into(),
            })
        }

        if !(self.duration_min > 0.0) {
            return invalid("duration_min", "must be > 0");
        }
        if self.n_actions == 0 {
            return invalid("n_actions", "must be >= 1");
        }
        if self.min_open == 0 {
            return invalid("min_open", "must be >= 1");
        }
        if self.min_open > self.n_actions {
            return invalid(
                "min_open",
                format!(
                    "exceeds the action range: min_open={} but n_actions={} caps the pool at {}",
                    self.min_open, self.n_actions, self.n_actions
                ),
            );
        }
        if self.initial_open < self.min_open || self.initial_open > self.n_actions {
            return invalid(
                "initial_open",
                format!(
                    "must lie in [min_open, n_actions] = [{}, {}]",
                    self.min_open, self.n_actions
                ),
            );
        }
        if !(self.decision_period_min > 0.0) {
            return invalid("decision_period_min", "must be > 0");
        }
        if !(self.log_period_min > 0.0) {
            return invalid("log_period_min", "must be > 0");
        }

        if self.queue_thresholds.is_empty() {
            return invalid("queue_thresholds", "must not be empty");
        }
        if self.queue_thresholds[0] == 0 {
            return invalid("queue_thresholds", "first threshold must be >= 1");
        }
        if !self.queue_thresholds.windows(2).all(|w| w[0] < w[1]) {
            return invalid("queue_thresholds", "must be strictly increasing");
        }

        if self.periods.len() != TimePeriod::ALL.len() {
            return invalid(
                "periods",
                format!("expected {} rows, got {}", TimePeriod::ALL.len(), self.periods.len()),
            );
        }
        for (i, p) in self.periods.iter().enumerate() {
            let name = TimePeriod::ALL[i].as_str();
            if !(p.arrival_rate > 0.0) {
                return invalid(
                    "periods.arrival_rate",
                    format!("{name}: rate must be > 0, got {}", p.arrival_rate),
                );
            }
            if p.kind_probs.iter().any(|&q| q < 0.0) {
                return invalid(
                    "periods.kind_probs",
                    format!("{name}: probabilities must be non-negative"),
                );
            }
            let sum: f64 = p.kind_probs.iter().sum();
            if (sum - 1.0).abs() > 1e-6 {
                return invalid(
                    "periods.kind_probs",
                    format!("{name}: probabilities sum to {sum}, expected 1"),
                );
            }
            if p.wait_weight < 0.0 {
                return invalid(
                    "periods.wait_weight",
                    format!("{name}: must be non-negative"),
                );
            }
        }

        if self.kinds.len() != CustomerKind::ALL.len() {
            return invalid(
                "kinds",
                format!("expected {} rows, got {}", CustomerKind::ALL.len(), self.kinds.len()),
            );
        }
        for (i, k) in self.kinds.iter().enumerate() {
            let name = CustomerKind::ALL[i].as_str();
            for (label, range) in [("shopping", &k.shopping), ("service", &k.service)] {
                if !(range.lo >= 0.0 && range.hi >= range.lo) {
                    return invalid(
                        "kinds",
                        format!("{name}.{label}: need 0 <= lo <= hi, got [{}, {}]", range.lo, range.hi),
                    );
                }
            }
        }

        if !(self.agent.alpha > 0.0 && self.agent.alpha < 1.0) {
            return invalid("agent.alpha", "must lie in (0, 1)");
        }
        if !(self.agent.gamma > 0.0 && self.agent.gamma < 1.0) {
            return invalid("agent.gamma", "must lie in (0, 1)");
        }
        if !(self.agent.epsilon >= 0.0 && self.agent.epsilon <= 1.0) {
            return invalid("agent.epsilon", "must lie in [0, 1]");
        }

        self.reward.validate().map_err(|message| ConfigError::Validation {
            field: "reward".to_string(),
            message,
        })?;

        Ok(())
    }
}

/// Configuration errors. These are the only fatal errors in the crate;
/// everything after construction is absorbed locally (clamped or no-op).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io { path: String, source: String },
    Parse { source: String },
    Validation { field: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config file '{}': {}", path, source)
            }
            ConfigError::Parse { source } => {
                write!(f, "failed to parse config YAML: {}", source)
            }
            ConfigError::Validation { field, message } => {
                write!(f, "config validation error in '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
