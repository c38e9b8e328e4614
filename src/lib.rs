//! Tillsim core library.
//!
//! Tillsim models a retail checkout area as a queueing system and trains
//! a tabular Q-learning controller to decide, on a fixed cadence, how
//! many checkouts to keep open. The binary (`src/main.rs`) is just a
//! thin research harness around these components.
//!
//! # Architecture
//!
//! - **Simulation core** (`sim`): a single-timeline event scheduler with
//!   deterministic same-time ordering, a runtime-resizable pool of
//!   single-capacity checkouts, and customer processes expressed as
//!   explicit state machines with named suspension points.
//!
//! - **Control** (`rl`): a pure state discretizer, a tabular Q-learning
//!   agent, reward shaping, and the `CapacityPolicy` seam that lets the
//!   same engine run a fixed-rule baseline or the learned controller.
//!
//! - **Sinks** (`stats`, `logging`): arrival statistics and periodic
//!   queue telemetry, both behind small traits so callers choose between
//!   counting, in-memory, file, or no-op implementations.
//!
//! Everything stochastic flows through seeded ChaCha8 streams, so a run
//! is reproducible from `(config, seed)` alone.

pub mod config;
pub mod logging;
pub mod rl;
pub mod sim;
pub mod stats;
pub mod types;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{AgentConfig, Config, ConfigError, DurationRange, KindDurations, PeriodConfig};

pub use logging::{JsonlSink, MemoryLog, NoopSink, QueueSample, TelemetrySink};

pub use rl::{
    CapacityPolicy, Discretizer, FixedPolicy, LearnedPolicy, QLearningAgent, RewardComponents,
    RewardWeights, Transition,
};

pub use sim::{
    ArrivalSampler, Checkout, CheckoutPool, ClockError, EventHandle, EventScheduler,
    RequestOutcome, RunSummary, SimEnvironment, Ticket, Wakeup,
};

pub use stats::{CustomerStats, NoopStats, StatsSink};

pub use types::{Customer, CustomerId, CustomerKind, SimTime, TimePeriod};
