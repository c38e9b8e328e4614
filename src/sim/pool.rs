// src/sim/pool.rs
//
// Runtime-resizable pool of single-capacity checkouts.
//
// Each checkout serves one customer at a time and owns a FIFO wait list.
// Capacity only changes at control-loop decision epochs; a decrease never
// evicts a busy checkout and never takes the pool below its floor - both
// cases are silent no-ops so the control loop keeps its liveness.

use std::collections::VecDeque;

use crate::types::CustomerId;

/// Proof of a seat at a checkout, consumed by [`CheckoutPool::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub checkout_id: usize,
    pub customer: CustomerId,
}

/// Outcome of a seat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The selected checkout was idle; the customer is being served.
    Seated(Ticket),
    /// The customer joined the selected checkout's FIFO wait list and
    /// will be seated by a later `release`.
    Queued { checkout_id: usize },
}

/// A single-capacity service point.
#[derive(Debug, Clone)]
pub struct Checkout {
    id: usize,
    occupant: Option<CustomerId>,
    waiting: VecDeque<CustomerId>,
}

impl Checkout {
    fn new(id: usize) -> Self {
        Self {
            id,
            occupant: None,
            waiting: VecDeque::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_idle(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }
}

/// Ordered collection of checkouts with a configured size floor.
#[derive(Debug, Clone)]
pub struct CheckoutPool {
    checkouts: Vec<Checkout>,
    min_open: usize,
    next_id: usize,
}

impl CheckoutPool {
    /// Create a pool with `initial_open` idle checkouts. The caller
    /// (config validation) guarantees `initial_open >= min_open >= 1`.
    pub fn new(initial_open: usize, min_open: usize) -> Self {
        let checkouts = (0..initial_open).map(Checkout::new).collect();
        Self {
            checkouts,
            min_open,
            next_id: initial_open,
        }
    }

    pub fn open_count(&self) -> usize {
        self.checkouts.len()
    }

    pub fn min_open(&self) -> usize {
        self.min_open
    }

    /// Total number of waiting customers across all checkouts.
    pub fn queue_length(&self) -> usize {
        self.checkouts.iter().map(|c| c.waiting.len()).sum()
    }

    /// Per-checkout wait-list lengths, in pool order (for telemetry).
    pub fn queue_lengths(&self) -> Vec<usize> {
        self.checkouts.iter().map(|c| c.waiting.len()).collect()
    }

    pub fn checkouts(&self) -> &[Checkout] {
        &self.checkouts
    }

    /// Index of the checkout with the shortest wait list, ties broken by
    /// lowest checkout id. The pool is never empty (floor >= 1).
    fn select_index(&self) -> usize {
        let mut best = 0;
        for (idx, c) in self.checkouts.iter().enumerate().skip(1) {
            let cur = &self.checkouts[best];
            if c.waiting.len() < cur.waiting.len()
                || (c.waiting.len() == cur.waiting.len() && c.id < cur.id)
            {
                best = idx;
            }
        }
        best
    }

    /// Request a seat for `customer` on the checkout chosen by the
    /// shortest-wait-list policy.
    pub fn request(&mut self, customer: CustomerId) -> RequestOutcome {
        let idx = self.select_index();
        let checkout = &mut self.checkouts[idx];
        if checkout.occupant.is_none() {
            checkout.occupant = Some(customer);
            RequestOutcome::Seated(Ticket {
                checkout_id: checkout.id,
                customer,
            })
        } else {
            checkout.waiting.push_back(customer);
            RequestOutcome::Queued {
                checkout_id: checkout.id,
            }
        }
    }

    /// Free the seat named by `ticket` and immediately seat the next FIFO
    /// waiter on the same checkout, returning it. An unknown ticket (the
    /// checkout has since been removed) is absorbed as a no-op.
    pub fn release(&mut self, ticket: Ticket) -> Option<CustomerId> {
        let idx = self
            .checkouts
            .iter()
            .position(|c| c.id == ticket.checkout_id)?;
        let checkout = &mut self.checkouts[idx];
        checkout.occupant = None;
        let next = checkout.waiting.pop_front();
        if let Some(customer) = next {
            checkout.occupant = Some(customer);
        }
        next
    }

    /// Open a fresh idle checkout. Always permitted.
    pub fn add_checkout(&mut self) {
        let id = self.next_id;
        self.next_id += 1;
        self.checkouts.push(Checkout::new(id));
    }

    /// Close the idle checkout with the shortest wait list among idle
    /// checkouts. Returns `false` (no-op) when no checkout is idle or the
    /// pool is at its floor; a busy checkout is never evicted.
    pub fn remove_checkout(&mut self) -> bool {
        if self.checkouts.len() <= self.min_open {
            return false;
        }
        let candidate = self
            .checkouts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_idle())
            .min_by_key(|(_, c)| (c.waiting.len(), c.id))
            .map(|(idx, _)| idx);
        let idx = match candidate {
            Some(idx) => idx,
            None => return false,
        };
        let removed = self.checkouts.remove(idx);
        // An idle checkout normally has no waiters (release seats the
        // next waiter immediately), but if any exist they re-queue
        // through the normal selection policy in FIFO order.
        for customer in removed.waiting {
            self.request(customer);
        }
        true
    }
}
