// src/main.rs
//
// Research-harness CLI for tillsim.
//
// - Deterministic runs via --seed; per-episode seeds derive from it.
// - Config comes from a YAML scenario file plus CLI overrides.
// - `--policy learned` trains the Q-table across --episodes and prints
//   the greedy staffing table; `--policy fixed` runs the static
//   baseline.
// - `--out` exports the final episode's queue log as JSONL.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};

use tillsim::{
    Config, CustomerStats, FixedPolicy, JsonlSink, LearnedPolicy, MemoryLog, QLearningAgent,
    RunSummary, SimEnvironment, TelemetrySink, TimePeriod,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PolicyArg {
    /// Q-learning controller (trains across episodes).
    Learned,
    /// Static baseline: always the same action.
    Fixed,
}

#[derive(Debug, Parser)]
#[command(
    name = "tillsim",
    about = "Checkout-area queueing simulator with a Q-learning capacity controller",
    version
)]
struct Args {
    /// YAML scenario file with config overrides.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Simulated minutes per episode (overrides the scenario).
    #[arg(long)]
    duration: Option<f64>,

    /// Master seed; episode k runs with seed + k.
    #[arg(long)]
    seed: Option<u64>,

    /// Training episodes; the Q-table persists across them.
    #[arg(long, default_value_t = 1)]
    episodes: u64,

    /// Decision policy.
    #[arg(long, value_enum, default_value_t = PolicyArg::Learned)]
    policy: PolicyArg,

    /// Action for the fixed policy (action a targets a + 1 open checkouts).
    #[arg(long, default_value_t = 1)]
    fixed_action: usize,

    /// Exploration-rate override.
    #[arg(long)]
    epsilon: Option<f64>,

    /// Write the final episode's queue log to this JSONL file.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Verbosity: -v, -vv
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = match &args.scenario {
        Some(path) => Config::from_yaml_file(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(duration) = args.duration {
        cfg.duration_min = duration;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(epsilon) = args.epsilon {
        cfg.agent.epsilon = epsilon;
    }
    cfg.validate()?;

    if matches!(args.policy, PolicyArg::Fixed) && args.fixed_action >= cfg.n_actions {
        bail!(
            "--fixed-action {} out of range: n_actions is {}",
            args.fixed_action,
            cfg.n_actions
        );
    }

    println!(
        "tillsim | duration={}min | episodes={} | seed={} | policy={:?} | states={} actions={}",
        cfg.duration_min,
        args.episodes,
        cfg.seed,
        args.policy,
        cfg.n_states(),
        cfg.n_actions
    );

    match args.policy {
        PolicyArg::Fixed => run_fixed(&cfg, &args),
        PolicyArg::Learned => run_training(&cfg, &args),
    }
}

fn run_fixed(cfg: &Config, args: &Args) -> anyhow::Result<()> {
    let mut env = SimEnvironment::new(
        cfg.clone(),
        FixedPolicy::new(args.fixed_action),
        CustomerStats::new(),
        MemoryLog::new(),
    )?;
    let summary = env.run()?;
    let (_, stats, log) = env.into_parts();

    print_summary(&summary);
    print!("{}", stats.report());
    export_queue_log(&log, args)?;
    Ok(())
}

fn run_training(cfg: &Config, args: &Args) -> anyhow::Result<()> {
    // The agent's exploration stream is separate from the simulation
    // stream so policy replay does not depend on event interleaving.
    let mut agent = QLearningAgent::new(&cfg.agent, cfg.n_actions, cfg.seed.wrapping_add(1));

    let mut last: Option<(RunSummary, CustomerStats, MemoryLog)> = None;
    for episode in 0..args.episodes.max(1) {
        let mut episode_cfg = cfg.clone();
        episode_cfg.seed = cfg.seed.wrapping_add(episode);

        let mut env = SimEnvironment::new(
            episode_cfg,
            LearnedPolicy::new(agent),
            CustomerStats::new(),
            MemoryLog::new(),
        )?;
        let summary = env.run()?;
        let (policy, stats, log) = env.into_parts();
        agent = policy.into_agent();

        if args.verbose > 0 || args.episodes > 1 {
            println!(
                "episode {episode:>4} | reward={:+.1} | spawned={} served={} | final_open={}",
                summary.cumulative_reward,
                summary.customers_spawned,
                summary.customers_served,
                summary.final_open_count
            );
        }
        last = Some((summary, stats, log));
    }

    if let Some((summary, stats, log)) = last {
        print_summary(&summary);
        print!("{}", stats.report());
        print_q_analysis(&agent, cfg);
        export_queue_log(&log, args)?;
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "run complete | {} epochs | reward={:+.1} | spawned={} served={} | final_open={}",
        summary.decision_epochs,
        summary.cumulative_reward,
        summary.customers_spawned,
        summary.customers_served,
        summary.final_open_count
    );
}

/// Greedy staffing table: for every (period, queue bucket, current open
/// count) cell, the open-checkout count the learned policy would target.
fn print_q_analysis(agent: &QLearningAgent, cfg: &Config) {
    let n_levels = cfg.n_actions;
    let labels = bucket_labels(cfg);
    println!(
        "greedy staffing table ({} visited states); columns are current open 1..={}:",
        agent.visited_states(),
        n_levels
    );
    for period in TimePeriod::ALL {
        println!("time period: {}", period.as_str());
        for (bucket, label) in labels.iter().enumerate() {
            let row: Vec<String> = (0..n_levels)
                .map(|level| {
                    let state = period.index() * (labels.len() * n_levels)
                        + bucket * n_levels
                        + level;
                    format!("{}", agent.greedy_action(state) + 1)
                })
                .collect();
            println!("  queue {:<5} -> {}", label, row.join(" "));
        }
    }
}

/// Human-readable queue-bucket labels, e.g. `0, <=2, <=5, <=9, >9`.
fn bucket_labels(cfg: &Config) -> Vec<String> {
    let mut labels = vec!["0".to_string()];
    for &t in &cfg.queue_thresholds {
        labels.push(format!("<={t}"));
    }
    if let Some(&last) = cfg.queue_thresholds.last() {
        labels.push(format!(">{last}"));
    }
    labels
}

fn export_queue_log(log: &MemoryLog, args: &Args) -> anyhow::Result<()> {
    let path = match &args.out {
        Some(path) => path,
        None => return Ok(()),
    };
    let mut sink = JsonlSink::create(path)
        .with_context(|| format!("creating queue log {}", path.display()))?;
    for sample in log.samples() {
        sink.record(sample);
    }
    if args.verbose > 0 {
        println!("wrote {} queue samples to {}", log.len(), path.display());
    }
    Ok(())
}
