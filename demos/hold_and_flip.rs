use std::{env, time::Instant};

use anyhow::{Context, Result};
use fxgym::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let data_dir = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let cfg = EnvConfig::default().with_data_dir(&data_dir);

    let build_start = Instant::now();
    let mut env = make(cfg).with_context(|| format!("Failed to load candles from {data_dir}"))?;
    let build_time = build_start.elapsed();

    let mut agents: Vec<Box<dyn Agent>> = vec![
        Box::new(Scripted::new([Action::Long, Action::Hold, Action::Short])),
        Box::new(TakeProfit::new(Action::Long)),
        Box::new(TakeProfit::new(Action::Short)),
    ];

    println!("Environment built in {build_time:?} ({} episodes)", env.episode_count());

    for agent in agents.iter_mut() {
        env.reset()?;
        println!("\n--- {} ---", agent.name());

        for _ in 0..env.episode_count() {
            let report = env.run_episode(agent)?;
            for settlement in &report.settlements {
                println!("  {settlement}");
            }
            println!(
                "{:<12} steps {:>4}  reward {:>10.5}  outcome {}",
                report.name, report.steps, report.total_reward.0, report.outcome
            );
        }
    }

    info!("Demo finished");
    Ok(())
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Detect if running in container
    let in_container =
        env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists();

    if in_container {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}
