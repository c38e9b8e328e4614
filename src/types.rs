// src/types.rs
//
// Common shared types for the tillsim checkout simulator.

use serde::{Deserialize, Serialize};

/// Simulated minutes since store opening. Monotonically non-decreasing,
/// advanced only by the event scheduler.
pub type SimTime = f64;

/// Simulated minutes between midnight and store opening (sim time 0),
/// i.e. the store opens at 06:00 wall clock.
pub const OPENING_OFFSET_MIN: u32 = 360;

/// Minutes in a wall-clock day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Identifier for an in-flight customer process.
pub type CustomerId = u64;

/// Customer kind. Determines the shopping-time and service-time
/// distributions via the config duration tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerKind {
    Quick,
    Regular,
    Lengthy,
}

impl CustomerKind {
    pub const ALL: [CustomerKind; 3] =
        [CustomerKind::Quick, CustomerKind::Regular, CustomerKind::Lengthy];

    /// Stable lowercase name (used in logs / reports).
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerKind::Quick => "quick",
            CustomerKind::Regular => "regular",
            CustomerKind::Lengthy => "lengthy",
        }
    }

    /// Index into per-kind tables (probabilities, duration ranges).
    pub fn index(&self) -> usize {
        match self {
            CustomerKind::Quick => 0,
            CustomerKind::Regular => 1,
            CustomerKind::Lengthy => 2,
        }
    }
}

/// Named segment of the day. Each period carries its own arrival rate and
/// customer-kind distribution in the config tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    EarlyMorning,
    Morning,
    Lunch,
    Afternoon,
    Evening,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::EarlyMorning,
        TimePeriod::Morning,
        TimePeriod::Lunch,
        TimePeriod::Afternoon,
        TimePeriod::Evening,
    ];

    /// Stable lowercase name (used in logs / reports).
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::EarlyMorning => "early_morning",
            TimePeriod::Morning => "morning",
            TimePeriod::Lunch => "lunch",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
        }
    }

    /// Index into the per-period config tables and the discretizer.
    pub fn index(&self) -> usize {
        match self {
            TimePeriod::EarlyMorning => 0,
            TimePeriod::Morning => 1,
            TimePeriod::Lunch => 2,
            TimePeriod::Afternoon => 3,
            TimePeriod::Evening => 4,
        }
    }

    /// Map a simulated minute to its time period.
    ///
    /// Sim time 0 is 06:00 wall clock; times wrap around the day, so a
    /// multi-day run cycles through the same five periods.
    pub fn from_sim_time(t: SimTime) -> TimePeriod {
        let minute_of_day = (t.max(0.0) as u32 + OPENING_OFFSET_MIN) % MINUTES_PER_DAY;
        let hour = minute_of_day / 60;
        match hour {
            6..=7 => TimePeriod::EarlyMorning,
            8..=10 => TimePeriod::Morning,
            11..=13 => TimePeriod::Lunch,
            14..=16 => TimePeriod::Afternoon,
            _ => TimePeriod::Evening,
        }
    }
}

/// A customer entity. Created by the arrival process, immutable afterwards;
/// its lifecycle (shopping, queueing, service) is tracked by the
/// environment's process table, not on the customer itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub kind: CustomerKind,
    pub arrival_time: SimTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_boundaries_match_wall_clock() {
        // Sim time 0 = 06:00.
        assert_eq!(TimePeriod::from_sim_time(0.0), TimePeriod::EarlyMorning);
        // 08:00 is the first Morning minute.
        assert_eq!(TimePeriod::from_sim_time(119.9), TimePeriod::EarlyMorning);
        assert_eq!(TimePeriod::from_sim_time(120.0), TimePeriod::Morning);
        // 11:00 Lunch, 14:00 Afternoon, 17:00 Evening.
        assert_eq!(TimePeriod::from_sim_time(300.0), TimePeriod::Lunch);
        assert_eq!(TimePeriod::from_sim_time(480.0), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_sim_time(660.0), TimePeriod::Evening);
    }

    #[test]
    fn period_wraps_across_days() {
        // 24h after opening we are back in EarlyMorning.
        let t = MINUTES_PER_DAY as f64;
        assert_eq!(TimePeriod::from_sim_time(t), TimePeriod::EarlyMorning);
        assert_eq!(
            TimePeriod::from_sim_time(t + 300.0),
            TimePeriod::from_sim_time(300.0)
        );
    }
}
