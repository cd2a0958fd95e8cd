//! Fire-command execution: each command becomes a launch after a seeded
//! random delay, so launches from one salvo surface out of issue order.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use standoff_core::constants::SANDBOX_LAUNCH_HEIGHT;
use standoff_core::events::LaunchEvent;
use standoff_core::types::{Position, Velocity};

use super::components::{Munition, Ship};
use super::handle_of;

/// A fire command waiting for its launch tick.
#[derive(Debug, Clone)]
pub struct PendingLaunch {
    pub due_tick: u64,
    pub ship: Entity,
    pub aim: Position,
}

pub fn schedule(
    pending: &mut Vec<PendingLaunch>,
    rng: &mut ChaCha8Rng,
    now_tick: u64,
    max_delay_ticks: u64,
    ship: Entity,
    aim: Position,
) {
    let delay = rng.gen_range(0..=max_delay_ticks);
    pending.push(PendingLaunch {
        due_tick: now_tick + delay,
        ship,
        aim,
    });
}

/// Spawn every munition due at `now_tick` and return the launch events.
/// Commands for ships that no longer exist are dropped.
pub fn run(
    world: &mut World,
    pending: &mut Vec<PendingLaunch>,
    now_tick: u64,
    speed: f64,
) -> Vec<LaunchEvent> {
    let mut due = Vec::new();
    pending.retain(|launch| {
        if launch.due_tick <= now_tick {
            due.push(launch.clone());
            false
        } else {
            true
        }
    });

    let mut events = Vec::with_capacity(due.len());
    for launch in due {
        let (name, origin) = {
            let Ok(ship) = world.get::<&Ship>(launch.ship) else {
                continue;
            };
            let Ok(pos) = world.get::<&Position>(launch.ship) else {
                continue;
            };
            (ship.name.clone(), Position::new(pos.x, pos.y, pos.z + SANDBOX_LAUNCH_HEIGHT))
        };

        let offset = launch.aim.to_dvec3() - origin.to_dvec3();
        let velocity = Velocity::from(offset.normalize_or_zero() * speed);
        let munition = world.spawn((
            origin,
            velocity,
            Munition {
                launched_by: name.clone(),
                aim: launch.aim,
                speed,
            },
        ));
        events.push(LaunchEvent {
            firing_unit: name,
            weapon: handle_of(munition),
        });
    }
    events
}
