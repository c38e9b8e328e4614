// src/sim/environment.rs
//
// The simulation environment: one value owning every piece of mutable
// run state (clock, event queue, checkout pool, RNG streams, policy,
// sinks, in-flight customer processes).
//
// All actors are continuations dispatched off the event queue:
//
//  - the arrival generator spawns customers and reschedules itself,
//  - each customer is a small state machine with named suspension
//    points (shopping timer, checkout wait list, service timer),
//  - the control loop wakes on a fixed cadence, scores the previous
//    epoch, asks the policy for the next staffing level and applies it,
//  - the telemetry sampler snapshots the queues on its own cadence.
//
// A fault in one customer process is absorbed locally; it can never
// abort the generator, the control loop, or other customers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::logging::{QueueSample, TelemetrySink};
use crate::rl::discretize::Discretizer;
use crate::rl::policy::{CapacityPolicy, Transition};
use crate::rl::reward::RewardComponents;
use crate::sim::arrivals::ArrivalSampler;
use crate::sim::pool::{CheckoutPool, RequestOutcome, Ticket};
use crate::sim::scheduler::{ClockError, EventScheduler, Wakeup};
use crate::stats::StatsSink;
use crate::types::{Customer, CustomerId, SimTime, TimePeriod};

/// Named suspension point of a customer process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CustomerPhase {
    /// Browsing the store; the next timer wake-up sends the customer to
    /// the checkout area.
    Shopping,
    /// In a checkout's FIFO wait list; woken by a release, not a timer.
    AwaitingCheckout,
    /// Seated at a checkout; the next timer wake-up completes the
    /// service and frees the seat.
    BeingServed(Ticket),
}

#[derive(Debug, Clone, Copy)]
struct CustomerProcess {
    customer: Customer,
    phase: CustomerPhase,
}

/// (state, action) carried from one decision epoch to the next, where it
/// is scored and fed back to the policy.
#[derive(Debug, Clone, Copy)]
struct PendingDecision {
    state: usize,
    action: usize,
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub duration_min: f64,
    pub customers_spawned: u64,
    pub customers_served: u64,
    pub final_open_count: usize,
    pub decision_epochs: u64,
    pub cumulative_reward: f64,
}

/// Discrete-event simulation of the checkout area, parameterized by the
/// capacity policy and the two external sinks.
pub struct SimEnvironment<P, S, T>
where
    P: CapacityPolicy,
    S: StatsSink,
    T: TelemetrySink,
{
    cfg: Config,
    scheduler: EventScheduler,
    pool: CheckoutPool,
    sampler: ArrivalSampler,
    discretizer: Discretizer,
    policy: P,
    stats: S,
    telemetry: T,
    customers: HashMap<CustomerId, CustomerProcess>,
    next_customer_id: CustomerId,
    pending: Option<PendingDecision>,
    customers_spawned: u64,
    customers_served: u64,
    decision_epochs: u64,
    cumulative_reward: f64,
}

impl<P, S, T> SimEnvironment<P, S, T>
where
    P: CapacityPolicy,
    S: StatsSink,
    T: TelemetrySink,
{
    /// Build an environment from a validated config. Fails fast on an
    /// invalid config; nothing after construction can fail that way.
    pub fn new(cfg: Config, policy: P, stats: S, telemetry: T) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let pool = CheckoutPool::new(cfg.initial_open, cfg.min_open);
        let sampler = ArrivalSampler::new(cfg.seed);
        let discretizer = Discretizer::from_config(&cfg);
        Ok(Self {
            cfg,
            scheduler: EventScheduler::new(),
            pool,
            sampler,
            discretizer,
            policy,
            stats,
            telemetry,
            customers: HashMap::new(),
            next_customer_id: 0,
            pending: None,
            customers_spawned: 0,
            customers_served: 0,
            decision_epochs: 0,
            cumulative_reward: 0.0,
        })
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn open_count(&self) -> usize {
        self.pool.open_count()
    }

    pub fn queue_length(&self) -> usize {
        self.pool.queue_length()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Tear the environment down to its parts the caller keeps:
    /// (policy, stats, telemetry).
    pub fn into_parts(self) -> (P, S, T) {
        (self.policy, self.stats, self.telemetry)
    }

    /// Run the simulation for the configured duration and return the
    /// summary. One environment runs once; training loops build a fresh
    /// environment per episode and carry the policy across.
    pub fn run(&mut self) -> Result<RunSummary, ClockError> {
        // Seed the three recurring processes. Insertion order fixes the
        // dispatch order for same-time events.
        let first_arrival = {
            let period = self.cfg.period(TimePeriod::from_sim_time(0.0));
            self.sampler.interarrival(period)
        };
        self.scheduler.schedule(first_arrival, Wakeup::Arrival)?;
        self.scheduler.schedule(0.0, Wakeup::Decision)?;
        self.scheduler
            .schedule(self.cfg.log_period_min, Wakeup::QueueSample)?;

        let horizon = self.cfg.duration_min;
        while let Some((_, wakeup)) = self.scheduler.pop_due(horizon) {
            match wakeup {
                Wakeup::Arrival => self.on_arrival()?,
                Wakeup::Customer(id) => self.on_customer_wake(id)?,
                Wakeup::Decision => self.on_decision()?,
                Wakeup::QueueSample => self.on_queue_sample()?,
            }
        }
        self.scheduler.advance_to(horizon);

        Ok(RunSummary {
            seed: self.cfg.seed,
            duration_min: self.cfg.duration_min,
            customers_spawned: self.customers_spawned,
            customers_served: self.customers_served,
            final_open_count: self.pool.open_count(),
            decision_epochs: self.decision_epochs,
            cumulative_reward: self.cumulative_reward,
        })
    }

    /// Arrival generator: spawn one customer, reschedule itself with the
    /// current period's rate.
    fn on_arrival(&mut self) -> Result<(), ClockError> {
        let now = self.scheduler.now();
        let period_cfg = *self.cfg.period(TimePeriod::from_sim_time(now));

        let id = self.next_customer_id;
        self.next_customer_id += 1;
        let customer = Customer {
            id,
            kind: self.sampler.kind(&period_cfg),
            arrival_time: now,
        };
        self.stats.record_arrival(&customer, now);
        self.customers_spawned += 1;

        let shopping = self
            .sampler
            .duration(&self.cfg.durations(customer.kind).shopping);
        self.customers.insert(
            id,
            CustomerProcess {
                customer,
                phase: CustomerPhase::Shopping,
            },
        );
        self.scheduler.schedule(shopping, Wakeup::Customer(id))?;

        let gap = self.sampler.interarrival(&period_cfg);
        self.scheduler.schedule(gap, Wakeup::Arrival)?;
        Ok(())
    }

    /// A customer's timer fired: advance its state machine.
    fn on_customer_wake(&mut self, id: CustomerId) -> Result<(), ClockError> {
        let phase = match self.customers.get(&id) {
            Some(proc) => proc.phase,
            // Stale wake-up for a completed process: absorbed.
            None => return Ok(()),
        };
        match phase {
            CustomerPhase::Shopping => {
                // Done browsing; compete for a checkout seat.
                match self.pool.request(id) {
                    RequestOutcome::Seated(ticket) => self.start_service(id, ticket)?,
                    RequestOutcome::Queued { .. } => {
                        if let Some(proc) = self.customers.get_mut(&id) {
                            proc.phase = CustomerPhase::AwaitingCheckout;
                        }
                    }
                }
            }
            CustomerPhase::BeingServed(ticket) => {
                // Service complete: free the seat and the process.
                self.customers.remove(&id);
                self.customers_served += 1;
                if let Some(next) = self.pool.release(ticket) {
                    let next_ticket = Ticket {
                        checkout_id: ticket.checkout_id,
                        customer: next,
                    };
                    self.start_service(next, next_ticket)?;
                }
            }
            // A waiting customer has no timer; a stray wake-up here is
            // absorbed rather than propagated.
            CustomerPhase::AwaitingCheckout => {}
        }
        Ok(())
    }

    /// Seat `id` and schedule its service completion.
    fn start_service(&mut self, id: CustomerId, ticket: Ticket) -> Result<(), ClockError> {
        let kind = match self.customers.get(&id) {
            Some(proc) => proc.customer.kind,
            None => return Ok(()),
        };
        let service = self.sampler.duration(&self.cfg.durations(kind).service);
        if let Some(proc) = self.customers.get_mut(&id) {
            proc.phase = CustomerPhase::BeingServed(ticket);
        }
        self.scheduler.schedule(service, Wakeup::Customer(id))?;
        Ok(())
    }

    /// One decision epoch: score the previous action against the fresh
    /// observables, then pick and apply the next staffing level.
    fn on_decision(&mut self) -> Result<(), ClockError> {
        let now = self.scheduler.now();
        let period = TimePeriod::from_sim_time(now);
        let state =
            self.discretizer
                .discretize(period, self.pool.queue_length(), self.pool.open_count());

        if let Some(prev) = self.pending.take() {
            let components = RewardComponents {
                open_count: self.pool.open_count(),
                queue_length: self.pool.queue_length(),
                wait_weight: self.cfg.period(period).wait_weight,
            };
            let reward = components.compute_reward(&self.cfg.reward);
            self.cumulative_reward += reward;
            self.policy.observe(&Transition {
                state: prev.state,
                action: prev.action,
                reward,
                next_state: state,
            });
        }

        let action = self.policy.decide(state);
        self.apply_target(action + 1);
        self.pending = Some(PendingDecision { state, action });
        self.decision_epochs += 1;

        self.scheduler
            .schedule(self.cfg.decision_period_min, Wakeup::Decision)?;
        Ok(())
    }

    /// Resize the pool toward `target` open checkouts. Increases always
    /// apply; decreases stop early when the pool declines them (floor
    /// reached or no idle checkout), clamping the effective count.
    fn apply_target(&mut self, target: usize) {
        while self.pool.open_count() < target {
            self.pool.add_checkout();
        }
        while self.pool.open_count() > target {
            if !self.pool.remove_checkout() {
                break;
            }
        }
    }

    /// Telemetry sampler: snapshot the queues, reschedule itself.
    fn on_queue_sample(&mut self) -> Result<(), ClockError> {
        let sample = QueueSample {
            time: self.scheduler.now(),
            queue_lengths: self.pool.queue_lengths(),
            open_count: self.pool.open_count(),
        };
        self.telemetry.record(&sample);
        self.scheduler
            .schedule(self.cfg.log_period_min, Wakeup::QueueSample)?;
        Ok(())
    }
}
