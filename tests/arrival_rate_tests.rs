// tests/arrival_rate_tests.rs
//
// Statistical check on the arrival process: with the rate held constant
// across all periods, the measured mean inter-arrival time converges to
// 1/rate as the window grows, across several seeds.

use tillsim::{Config, CustomerStats, FixedPolicy, MemoryLog, SimEnvironment};

/// Config with one flat arrival rate so the period step function plays
/// no role, and a wide-open pool so service never throttles anything.
fn flat_rate_config(rate: f64, duration_min: f64, seed: u64) -> Config {
    let mut cfg = Config {
        duration_min,
        seed,
        initial_open: 5,
        ..Config::default()
    };
    for period in &mut cfg.periods {
        period.arrival_rate = rate;
    }
    cfg
}

fn spawned_over_window(rate: f64, duration_min: f64, seed: u64) -> u64 {
    let cfg = flat_rate_config(rate, duration_min, seed);
    let mut env = SimEnvironment::new(
        cfg,
        FixedPolicy::new(4),
        CustomerStats::new(),
        MemoryLog::new(),
    )
    .unwrap();
    env.run().unwrap().customers_spawned
}

#[test]
fn mean_interarrival_converges_to_one_over_rate() {
    let rate = 2.0;
    let window = 4_000.0;
    let seeds = [1u64, 2, 3, 4, 5];

    let mut total_spawned = 0u64;
    for seed in seeds {
        total_spawned += spawned_over_window(rate, window, seed);
    }
    let mean_interarrival = (window * seeds.len() as f64) / total_spawned as f64;
    let expected = 1.0 / rate;

    assert!(
        (mean_interarrival - expected).abs() < 0.05 * expected,
        "mean inter-arrival {mean_interarrival} vs expected {expected}"
    );
}

#[test]
fn longer_windows_tighten_the_estimate() {
    let rate = 1.0;
    let short: u64 = (1..=8).map(|s| spawned_over_window(rate, 250.0, s)).sum();
    let long: u64 = (1..=8).map(|s| spawned_over_window(rate, 4_000.0, s)).sum();

    let short_err = ((8.0 * 250.0 / short as f64) - 1.0).abs();
    let long_err = ((8.0 * 4_000.0 / long as f64) - 1.0).abs();

    // Not a strict guarantee for any single seed set, but with 8 pooled
    // seeds the 16x window reliably beats the short one.
    assert!(
        long_err <= short_err + 0.02,
        "short_err={short_err} long_err={long_err}"
    );
}

#[test]
fn doubling_the_rate_roughly_doubles_the_arrivals() {
    let slow: u64 = (1..=4).map(|s| spawned_over_window(1.0, 2_000.0, s)).sum();
    let fast: u64 = (1..=4).map(|s| spawned_over_window(2.0, 2_000.0, s)).sum();
    let ratio = fast as f64 / slow as f64;
    assert!((ratio - 2.0).abs() < 0.15, "ratio {ratio}");
}
