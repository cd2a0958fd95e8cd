//! Headless STANDOFF runner.
//!
//! Usage: `standoff [CONFIG.toml] [SEED]`
//!
//! Starts the demo task group, authorizes the Blue flagship against the
//! marked targets, runs until every munition resolves and prints the final
//! snapshot as JSON. Log level via `RUST_LOG` (default `info`).

use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use standoff_app::demo;
use standoff_app::session_loop::spawn_session_loop;
use standoff_core::commands::OperatorCommand;
use standoff_core::config::SessionConfig;
use standoff_core::enums::Faction;

const DEMO_TIME_SCALE: f64 = 50.0;
const DEMO_WALL_CLOCK_LIMIT: Duration = Duration::from_secs(60);
const DEFAULT_SEED: u64 = 52;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_names(true))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SessionConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => SessionConfig::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed {raw:?}"))?,
        None => DEFAULT_SEED,
    };
    info!(seed, launch_cap = config.launch_cap, "starting demo");

    let session_loop = spawn_session_loop(config, demo::demo_host(seed), DEMO_TIME_SCALE)?;

    session_loop.operator(OperatorCommand::ListAssets {
        faction: Faction::Blue,
    });
    session_loop.operator(OperatorCommand::Authorize {
        faction: Faction::Blue,
        asset: demo::FLAGSHIP.into(),
    });
    session_loop.operator(OperatorCommand::ReportInventory {
        faction: Faction::Blue,
        asset: demo::FLAGSHIP.into(),
    });

    let deadline = Instant::now() + DEMO_WALL_CLOCK_LIMIT;
    loop {
        std::thread::sleep(Duration::from_millis(100));
        let settled = session_loop
            .latest()
            .is_some_and(|s| s.stats.munitions_enrolled > 0 && s.munitions.is_empty());
        if settled {
            break;
        }
        if Instant::now() >= deadline {
            warn!("demo did not settle before the wall-clock limit");
            break;
        }
    }

    let snapshot = session_loop
        .shutdown()
        .context("session loop published no snapshot")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
