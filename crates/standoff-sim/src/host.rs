//! Interfaces to the hosting combat simulation.
//!
//! The engine owns no physical objects. Discovery, markers, weapon tasking,
//! telemetry, launch observation and notification delivery are all provided
//! by the host through these traits.

use standoff_core::enums::{Audience, Faction};
use standoff_core::events::LaunchEvent;
use standoff_core::types::{MarkerHandle, ObjectHandle, Position, Velocity};

/// A unit reported by capability discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredUnit {
    pub name: String,
    pub handle: ObjectHandle,
    /// Weapon type tags of everything the unit carries.
    pub armament: Vec<String>,
}

/// An operator-drawn map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub handle: MarkerHandle,
    pub label: String,
    pub position: Position,
}

/// A single fire-at-point tasking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireCommand {
    pub target: Position,
    pub radius_m: f64,
    pub expend: u32,
}

/// Callback invoked for every weapon launched anywhere in the session.
pub type LaunchSubscriber = Box<dyn FnMut(LaunchEvent) + Send>;

pub trait CapabilityDiscovery {
    /// Every live unit of `faction`, with its armament.
    fn list_units(&self, faction: Faction) -> Vec<DiscoveredUnit>;
}

pub trait TargetResolver {
    /// Every marker currently on the map, in host order.
    fn list_pending_markers(&self) -> Vec<MarkerRecord>;
    /// Remove a marker. Called once per marker used in a launch batch.
    fn consume_marker(&mut self, marker: MarkerHandle);
}

pub trait WeaponTasking {
    /// Fire-and-forget: no acknowledgement is expected.
    fn issue_fire_command(&mut self, asset: ObjectHandle, command: FireCommand);
}

pub trait Telemetry {
    fn object_exists(&self, object: ObjectHandle) -> bool;
    fn position(&self, object: ObjectHandle) -> Option<Position>;
    fn velocity(&self, object: ObjectHandle) -> Option<Velocity>;
}

pub trait LaunchEventFeed {
    fn subscribe(&mut self, subscriber: LaunchSubscriber);
}

pub trait NotificationSink {
    fn notify(&mut self, audience: Audience, text: &str);
}

/// Everything a session needs from its host.
pub trait Host:
    CapabilityDiscovery + TargetResolver + WeaponTasking + Telemetry + LaunchEventFeed + NotificationSink
{
}

impl<T> Host for T where
    T: CapabilityDiscovery
        + TargetResolver
        + WeaponTasking
        + Telemetry
        + LaunchEventFeed
        + NotificationSink
{
}
