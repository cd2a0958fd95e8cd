//! Session loop thread: ticks the engine at `TICK_RATE` and publishes snapshots.
//!
//! The session and its host are moved into the thread and never shared.
//! Commands arrive via `mpsc`; the latest snapshot is stored in shared
//! state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info};

use standoff_core::config::SessionConfig;
use standoff_core::constants::TICK_RATE;
use standoff_core::state::SessionSnapshot;
use standoff_sim::sandbox::SandboxHost;
use standoff_sim::Session;

use crate::state::{LoopCommand, SessionLoop};

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Start a session on `host` and spawn its loop thread.
///
/// `time_scale` speeds the loop up relative to wall-clock time
/// (1.0 = real time). Config errors surface here, before any thread starts.
pub fn spawn_session_loop(
    config: SessionConfig,
    mut host: SandboxHost,
    time_scale: f64,
) -> anyhow::Result<SessionLoop> {
    let session = Session::start(config, &mut host).context("failed to start session")?;
    let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);
    let time_scale = time_scale.clamp(0.1, 1_000.0);

    let thread = std::thread::Builder::new()
        .name("standoff-session-loop".into())
        .spawn(move || run_session_loop(session, host, command_rx, &shared, time_scale))
        .context("failed to spawn session loop thread")?;

    Ok(SessionLoop {
        command_tx,
        latest_snapshot,
        thread,
    })
}

/// The loop. Runs until Shutdown or channel disconnect.
fn run_session_loop(
    mut session: Session,
    mut host: SandboxHost,
    command_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<SessionSnapshot>>,
    time_scale: f64,
) {
    let tick_duration = TICK_DURATION.div_f64(time_scale);
    let mut next_tick_time = Instant::now();
    info!(time_scale, "session loop running");

    loop {
        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(LoopCommand::Operator(command)) => session.queue_command(command),
                Ok(LoopCommand::PlaceMarker { label, position }) => {
                    let handle = host.place_marker(&label, position);
                    debug!(%label, marker = %handle, "marker placed");
                }
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = session.time().tick, "session loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance the host world, then the engine
        host.step();
        let snapshot = session.tick(&mut host);

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind, skip ahead instead of bursting ticks
            next_tick_time = now;
        }
    }
}
