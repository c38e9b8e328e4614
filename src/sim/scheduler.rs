// src/sim/scheduler.rs
//
// Simulated clock plus time-ordered event queue.
//
// All actors (arrival generator, in-flight customers, control loop,
// telemetry sampler) are resumable continuations identified by a Wakeup
// token. The scheduler owns the clock; events scheduled for the same
// simulated time fire in insertion order, which makes replay
// deterministic for a fixed seed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::{CustomerId, SimTime};

/// Resumption target for a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// The arrival generator: spawn a customer, schedule the next arrival.
    Arrival,
    /// A customer process reaching its next suspension point.
    Customer(CustomerId),
    /// A control-loop decision epoch.
    Decision,
    /// A queue-telemetry sample.
    QueueSample,
}

#[derive(Debug, Clone, PartialEq)]
struct ScheduledEvent {
    fire_time: SimTime,
    /// Insertion sequence; tie-break for equal fire times.
    seq: u64,
    wakeup: Wakeup,
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so the BinaryHeap pops the earliest fire time,
        // lowest insertion sequence first.
        other
            .fire_time
            .total_cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Scheduling a negative delay is a configuration error and is rejected
/// immediately; it can never arise from a validated `Config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockError {
    NegativeDelay { delay: f64 },
}

impl std::fmt::Display for ClockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockError::NegativeDelay { delay } => {
                write!(f, "cannot schedule a negative delay ({delay})")
            }
        }
    }
}

impl std::error::Error for ClockError {}

/// Opaque identifier of a scheduled resumption (its insertion sequence).
/// There is no cancellation; the handle exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle(u64);

/// Single-timeline cooperative event scheduler.
#[derive(Debug, Default)]
pub struct EventScheduler {
    now: SimTime,
    next_seq: u64,
    heap: BinaryHeap<ScheduledEvent>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of pending resumptions.
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// Register a resumption `delay` minutes from now.
    pub fn schedule(&mut self, delay: f64, wakeup: Wakeup) -> Result<EventHandle, ClockError> {
        // `!(delay >= 0.0)` also rejects NaN.
        if !(delay >= 0.0) {
            return Err(ClockError::NegativeDelay { delay });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledEvent {
            fire_time: self.now + delay,
            seq,
            wakeup,
        });
        Ok(EventHandle(seq))
    }

    /// Pop the next resumption with `fire_time <= until`, advancing the
    /// clock to its fire time. Returns `None` once no pending event is
    /// due; the caller then advances the clock with [`advance_to`].
    ///
    /// [`advance_to`]: EventScheduler::advance_to
    pub fn pop_due(&mut self, until: SimTime) -> Option<(SimTime, Wakeup)> {
        let due = self
            .heap
            .peek()
            .map(|ev| ev.fire_time <= until)
            .unwrap_or(false);
        if !due {
            return None;
        }
        let ev = self.heap.pop()?;
        // Events are scheduled at now + delay with delay >= 0, so the
        // clock never moves backwards here.
        self.now = ev.fire_time;
        Some((ev.fire_time, ev.wakeup))
    }

    /// Advance the clock to `t` (no-op if `t` is in the past).
    pub fn advance_to(&mut self, t: SimTime) {
        if t > self.now {
            self.now = t;
        }
    }
}
