//! Deterministic in-process host.
//!
//! Ships and munitions live in a hecs world; the same seed always produces
//! the same launch timing. Used by the runner binary and by tests that want
//! a whole session rather than a scripted host.

pub mod components;
pub mod launcher;
pub mod movement;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use standoff_core::constants::{SANDBOX_MAX_LAUNCH_DELAY_SECS, SANDBOX_MUNITION_SPEED};
use standoff_core::enums::{Audience, Faction};
use standoff_core::events::Notification;
use standoff_core::types::{secs_to_ticks, MarkerHandle, ObjectHandle, Position, Velocity};

use crate::host::{
    CapabilityDiscovery, DiscoveredUnit, FireCommand, LaunchEventFeed, LaunchSubscriber,
    MarkerRecord, NotificationSink, TargetResolver, Telemetry, WeaponTasking,
};

use self::components::{Munition, Ship};
use self::launcher::PendingLaunch;

pub(crate) fn handle_of(entity: Entity) -> ObjectHandle {
    ObjectHandle(entity.to_bits().get())
}

fn entity_of(handle: ObjectHandle) -> Option<Entity> {
    Entity::from_bits(handle.0)
}

/// Host backed by an ECS world.
pub struct SandboxHost {
    world: World,
    rng: ChaCha8Rng,
    tick: u64,
    markers: Vec<MarkerRecord>,
    next_marker: u64,
    pending_launches: Vec<PendingLaunch>,
    subscribers: Vec<LaunchSubscriber>,
    notifications: Vec<Notification>,
    fire_log: Vec<(ObjectHandle, FireCommand)>,
    despawn_buffer: Vec<Entity>,
    munition_speed: f64,
    max_launch_delay_ticks: u64,
}

impl SandboxHost {
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            markers: Vec::new(),
            next_marker: 1,
            pending_launches: Vec::new(),
            subscribers: Vec::new(),
            notifications: Vec::new(),
            fire_log: Vec::new(),
            despawn_buffer: Vec::new(),
            munition_speed: SANDBOX_MUNITION_SPEED,
            max_launch_delay_ticks: secs_to_ticks(SANDBOX_MAX_LAUNCH_DELAY_SECS),
        }
    }

    /// Launch every fire command on the tick it is issued.
    pub fn with_immediate_launches(mut self) -> Self {
        self.max_launch_delay_ticks = 0;
        self
    }

    pub fn with_munition_speed(mut self, speed: f64) -> Self {
        self.munition_speed = speed;
        self
    }

    pub fn spawn_ship(
        &mut self,
        name: &str,
        faction: Faction,
        armament: &[&str],
        position: Position,
    ) -> ObjectHandle {
        let entity = self.world.spawn((
            Ship {
                name: name.to_string(),
                faction,
                armament: armament.iter().map(|t| t.to_string()).collect(),
            },
            position,
            Velocity::default(),
        ));
        handle_of(entity)
    }

    /// Remove any object. Returns false if it was already gone.
    pub fn remove_object(&mut self, handle: ObjectHandle) -> bool {
        entity_of(handle).is_some_and(|e| self.world.despawn(e).is_ok())
    }

    pub fn set_velocity(&mut self, handle: ObjectHandle, velocity: Velocity) -> bool {
        let Some(entity) = entity_of(handle) else {
            return false;
        };
        if let Ok(mut v) = self.world.get::<&mut Velocity>(entity) {
            *v = velocity;
            return true;
        }
        self.world.insert_one(entity, velocity).is_ok()
    }

    /// Make an object stop reporting velocity.
    pub fn strip_velocity(&mut self, handle: ObjectHandle) -> bool {
        entity_of(handle).is_some_and(|e| self.world.remove_one::<Velocity>(e).is_ok())
    }

    pub fn place_marker(&mut self, label: &str, position: Position) -> MarkerHandle {
        let handle = MarkerHandle(self.next_marker);
        self.next_marker += 1;
        self.markers.push(MarkerRecord {
            handle,
            label: label.to_string(),
            position,
        });
        handle
    }

    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn fire_log(&self) -> &[(ObjectHandle, FireCommand)] {
        &self.fire_log
    }

    pub fn munition_count(&self) -> usize {
        self.world.query::<&Munition>().iter().count()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the host world one tick: launch due munitions and publish
    /// their events, detonate arrivals, integrate movement.
    pub fn step(&mut self) {
        let events = launcher::run(
            &mut self.world,
            &mut self.pending_launches,
            self.tick,
            self.munition_speed,
        );
        for event in events {
            for subscriber in self.subscribers.iter_mut() {
                subscriber(event.clone());
            }
        }
        movement::detonate_arrived(&mut self.world, &mut self.despawn_buffer);
        movement::run(&mut self.world);
        self.tick += 1;
    }
}

impl CapabilityDiscovery for SandboxHost {
    fn list_units(&self, faction: Faction) -> Vec<DiscoveredUnit> {
        let mut units: Vec<DiscoveredUnit> = self
            .world
            .query::<&Ship>()
            .iter()
            .filter(|(_, ship)| ship.faction == faction)
            .map(|(entity, ship)| DiscoveredUnit {
                name: ship.name.clone(),
                handle: handle_of(entity),
                armament: ship.armament.clone(),
            })
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name));
        units
    }
}

impl TargetResolver for SandboxHost {
    fn list_pending_markers(&self) -> Vec<MarkerRecord> {
        self.markers.clone()
    }

    fn consume_marker(&mut self, marker: MarkerHandle) {
        self.markers.retain(|m| m.handle != marker);
    }
}

impl WeaponTasking for SandboxHost {
    fn issue_fire_command(&mut self, asset: ObjectHandle, command: FireCommand) {
        self.fire_log.push((asset, command));
        let Some(ship) = entity_of(asset).filter(|e| self.world.contains(*e)) else {
            return;
        };
        launcher::schedule(
            &mut self.pending_launches,
            &mut self.rng,
            self.tick,
            self.max_launch_delay_ticks,
            ship,
            command.target,
        );
    }
}

impl Telemetry for SandboxHost {
    fn object_exists(&self, object: ObjectHandle) -> bool {
        entity_of(object).is_some_and(|e| self.world.contains(e))
    }

    fn position(&self, object: ObjectHandle) -> Option<Position> {
        let entity = entity_of(object)?;
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }

    fn velocity(&self, object: ObjectHandle) -> Option<Velocity> {
        let entity = entity_of(object)?;
        self.world.get::<&Velocity>(entity).ok().map(|v| *v)
    }
}

impl LaunchEventFeed for SandboxHost {
    fn subscribe(&mut self, subscriber: LaunchSubscriber) {
        self.subscribers.push(subscriber);
    }
}

impl NotificationSink for SandboxHost {
    fn notify(&mut self, audience: Audience, text: &str) {
        info!(?audience, "{text}");
        self.notifications.push(Notification {
            audience,
            text: text.to_string(),
            tick: self.tick,
        });
    }
}
