// src/stats.rs
//
// Arrival statistics sink.
//
// The environment notifies the sink once per customer, at arrival time;
// the counting implementation keeps per-kind totals and a per-period
// breakdown for the end-of-run report.

use serde::{Deserialize, Serialize};

use crate::types::{Customer, CustomerKind, SimTime, TimePeriod};

/// Receiver for customer-arrival notifications.
pub trait StatsSink {
    fn record_arrival(&mut self, customer: &Customer, time: SimTime);
}

/// Sink that discards all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStats;

impl StatsSink for NoopStats {
    fn record_arrival(&mut self, _customer: &Customer, _time: SimTime) {
        // intentionally no-op
    }
}

/// Counting sink: per-kind totals plus a per-period breakdown.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerStats {
    totals: [u64; 3],
    per_period: [[u64; 3]; 5],
}

impl CustomerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self, kind: CustomerKind) -> u64 {
        self.totals[kind.index()]
    }

    pub fn total_customers(&self) -> u64 {
        self.totals.iter().sum()
    }

    pub fn period_count(&self, period: TimePeriod, kind: CustomerKind) -> u64 {
        self.per_period[period.index()][kind.index()]
    }

    /// Render the end-of-run report.
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str("customer totals by kind:\n");
        for kind in CustomerKind::ALL {
            out.push_str(&format!("  {:<8} {}\n", kind.as_str(), self.total(kind)));
        }
        out.push_str("customer kinds by time period:\n");
        for period in TimePeriod::ALL {
            let row = &self.per_period[period.index()];
            if row.iter().all(|&c| c == 0) {
                out.push_str(&format!("  {:<14} no customers\n", period.as_str()));
                continue;
            }
            out.push_str(&format!(
                "  {:<14} quick={} regular={} lengthy={}\n",
                period.as_str(),
                row[0],
                row[1],
                row[2]
            ));
        }
        out
    }
}

impl StatsSink for CustomerStats {
    fn record_arrival(&mut self, customer: &Customer, time: SimTime) {
        let kind = customer.kind.index();
        self.totals[kind] += 1;
        self.per_period[TimePeriod::from_sim_time(time).index()][kind] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: u64, kind: CustomerKind, arrival_time: SimTime) -> Customer {
        Customer {
            id,
            kind,
            arrival_time,
        }
    }

    #[test]
    fn counts_totals_and_period_breakdown() {
        let mut stats = CustomerStats::new();
        // Two quick in the early morning, one lengthy at lunch.
        stats.record_arrival(&customer(1, CustomerKind::Quick, 10.0), 10.0);
        stats.record_arrival(&customer(2, CustomerKind::Quick, 30.0), 30.0);
        stats.record_arrival(&customer(3, CustomerKind::Lengthy, 310.0), 310.0);

        assert_eq!(stats.total(CustomerKind::Quick), 2);
        assert_eq!(stats.total(CustomerKind::Lengthy), 1);
        assert_eq!(stats.total_customers(), 3);
        assert_eq!(
            stats.period_count(TimePeriod::EarlyMorning, CustomerKind::Quick),
            2
        );
        assert_eq!(
            stats.period_count(TimePeriod::Lunch, CustomerKind::Lengthy),
            1
        );
    }

    #[test]
    fn report_marks_empty_periods() {
        let stats = CustomerStats::new();
        let report = stats.report();
        assert!(report.contains("no customers"));
    }
}
