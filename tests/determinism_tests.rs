// tests/determinism_tests.rs
//
// Replay determinism: a run is a pure function of (config, seed).
// Same seed => byte-identical queue logs, summaries, and Q-tables;
// different seeds => diverging trajectories.

use tillsim::{
    AgentConfig, Config, CustomerStats, LearnedPolicy, MemoryLog, QLearningAgent, RunSummary,
    SimEnvironment,
};

fn test_config(seed: u64) -> Config {
    Config {
        duration_min: 480.0,
        seed,
        ..Config::default()
    }
}

fn run_learned(cfg: Config) -> (RunSummary, MemoryLog, QLearningAgent) {
    let agent = QLearningAgent::new(&cfg.agent, cfg.n_actions, cfg.seed.wrapping_add(1));
    let mut env = SimEnvironment::new(
        cfg,
        LearnedPolicy::new(agent),
        CustomerStats::new(),
        MemoryLog::new(),
    )
    .unwrap();
    let summary = env.run().unwrap();
    let (policy, _, log) = env.into_parts();
    (summary, log, policy.into_agent())
}

#[test]
fn same_seed_gives_byte_identical_runs() {
    let (summary1, log1, agent1) = run_learned(test_config(12345));
    let (summary2, log2, agent2) = run_learned(test_config(12345));

    assert_eq!(summary1, summary2);

    // Compare the serialized logs so any drift in field values shows up
    // as a byte difference.
    let json1 = serde_json::to_string(log1.samples()).unwrap();
    let json2 = serde_json::to_string(log2.samples()).unwrap();
    assert_eq!(json1, json2, "queue logs must be byte-identical");

    assert_eq!(agent1.snapshot(), agent2.snapshot(), "Q-tables must match");
}

#[test]
fn different_seeds_diverge() {
    let (summary1, log1, _) = run_learned(test_config(100));
    let (summary2, log2, _) = run_learned(test_config(200));

    // Arrival counts over 480 minutes virtually never coincide exactly
    // while the trajectories differ; compare the whole log to be safe.
    let same_log = log1.samples() == log2.samples();
    let same_spawned = summary1.customers_spawned == summary2.customers_spawned;
    assert!(
        !(same_log && same_spawned),
        "independent seeds produced identical runs"
    );
}

#[test]
fn greedy_runs_are_reproducible_without_exploration() {
    let mut cfg = test_config(777);
    cfg.agent = AgentConfig {
        epsilon: 0.0,
        ..cfg.agent
    };
    let (summary1, log1, agent1) = run_learned(cfg.clone());
    let (summary2, log2, agent2) = run_learned(cfg);

    assert_eq!(summary1, summary2);
    assert_eq!(log1.samples(), log2.samples());
    assert_eq!(agent1.snapshot(), agent2.snapshot());
}

#[test]
fn log_cadence_is_exact() {
    let cfg = test_config(5);
    let expected = (cfg.duration_min / cfg.log_period_min) as usize;
    let (_, log, _) = run_learned(cfg);
    assert_eq!(log.len(), expected);
}
