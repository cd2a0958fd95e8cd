//! Tests for the registry, authorization, assignment, TTI tracking and the session.

use std::collections::{HashMap, HashSet};

use standoff_core::commands::OperatorCommand;
use standoff_core::config::SessionConfig;
use standoff_core::enums::*;
use standoff_core::events::LaunchEvent;
use standoff_core::types::{MarkerHandle, ObjectHandle, Position, Velocity};

use crate::assignment::{self, AssignmentMiss};
use crate::authorization::{self, admitted_count, LaunchRefusal};
use crate::engine::Session;
use crate::host::*;
use crate::registry::{Asset, AssetRegistry};
use crate::sandbox::SandboxHost;
use crate::targets::{is_designation_label, resolve_targets, Target};
use crate::tracking::{time_to_impact, TtiStep, TtiTracker};

// ---- Scripted host ----

#[derive(Default)]
struct FakeHost {
    units: Vec<(Faction, DiscoveredUnit)>,
    markers: Vec<MarkerRecord>,
    next_marker: u64,
    consumed: Vec<MarkerHandle>,
    fire_commands: Vec<(ObjectHandle, FireCommand)>,
    alive: HashSet<ObjectHandle>,
    positions: HashMap<ObjectHandle, Position>,
    velocities: HashMap<ObjectHandle, Velocity>,
    subscribers: Vec<LaunchSubscriber>,
    notifications: Vec<(Audience, String)>,
}

impl FakeHost {
    fn add_ship(&mut self, faction: Faction, name: &str, id: u64, armament: &[&str]) -> ObjectHandle {
        let handle = ObjectHandle(id);
        self.units.push((
            faction,
            DiscoveredUnit {
                name: name.to_string(),
                handle,
                armament: armament.iter().map(|t| t.to_string()).collect(),
            },
        ));
        self.alive.insert(handle);
        handle
    }

    /// Markers `NSGT<n>` strung out north of the origin, numbered from 1.
    fn add_markers(&mut self, count: u64) {
        for _ in 0..count {
            self.next_marker += 1;
            let i = self.next_marker;
            self.markers.push(MarkerRecord {
                handle: MarkerHandle(i),
                label: format!("NSGT{i}"),
                position: Position::new(0.0, 10_000.0 * i as f64, 0.0),
            });
        }
    }

    fn add_munition(&mut self, id: u64, position: Position, velocity: Option<Velocity>) -> ObjectHandle {
        let handle = ObjectHandle(id);
        self.alive.insert(handle);
        self.positions.insert(handle, position);
        if let Some(v) = velocity {
            self.velocities.insert(handle, v);
        }
        handle
    }

    fn destroy(&mut self, handle: ObjectHandle) {
        self.alive.remove(&handle);
    }

    fn launch(&mut self, unit: &str, weapon: ObjectHandle) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(LaunchEvent {
                firing_unit: unit.to_string(),
                weapon,
            });
        }
    }

    fn texts(&self) -> Vec<&str> {
        self.notifications.iter().map(|(_, t)| t.as_str()).collect()
    }

    fn last_text(&self) -> &str {
        self.notifications.last().map(|(_, t)| t.as_str()).unwrap_or("")
    }
}

impl CapabilityDiscovery for FakeHost {
    fn list_units(&self, faction: Faction) -> Vec<DiscoveredUnit> {
        self.units
            .iter()
            .filter(|(f, _)| *f == faction)
            .map(|(_, u)| u.clone())
            .collect()
    }
}

impl TargetResolver for FakeHost {
    fn list_pending_markers(&self) -> Vec<MarkerRecord> {
        self.markers.clone()
    }

    fn consume_marker(&mut self, marker: MarkerHandle) {
        self.consumed.push(marker);
        self.markers.retain(|m| m.handle != marker);
    }
}

impl WeaponTasking for FakeHost {
    fn issue_fire_command(&mut self, asset: ObjectHandle, command: FireCommand) {
        self.fire_commands.push((asset, command));
    }
}

impl Telemetry for FakeHost {
    fn object_exists(&self, object: ObjectHandle) -> bool {
        self.alive.contains(&object)
    }

    fn position(&self, object: ObjectHandle) -> Option<Position> {
        self.positions.get(&object).copied()
    }

    fn velocity(&self, object: ObjectHandle) -> Option<Velocity> {
        self.velocities.get(&object).copied()
    }
}

impl LaunchEventFeed for FakeHost {
    fn subscribe(&mut self, subscriber: LaunchSubscriber) {
        self.subscribers.push(subscriber);
    }
}

impl NotificationSink for FakeHost {
    fn notify(&mut self, audience: Audience, text: &str) {
        self.notifications.push((audience, text.to_string()));
    }
}

fn blue_host() -> FakeHost {
    let mut host = FakeHost::default();
    host.add_ship(Faction::Blue, "CG-52", 1, &["BGM-109B", "RIM-66"]);
    host
}

fn asset_with_inventory(host: &FakeHost, inventory: u32) -> Asset {
    let (faction, unit) = &host.units[0];
    Asset::new(unit.name.clone(), *faction, unit.handle, inventory)
}

fn target(marker: u64, y: f64) -> Target {
    Target {
        position: Position::new(0.0, y, 0.0),
        marker: MarkerHandle(marker),
    }
}

// ---- Registry ----

#[test]
fn test_discovery_registers_only_allow_listed_units() {
    let mut host = FakeHost::default();
    host.add_ship(Faction::Blue, "CG-52", 1, &["BGM-109B"]);
    host.add_ship(Faction::Blue, "FFG-7", 2, &["RIM-66", "Mk 75"]);
    host.add_ship(Faction::Red, "Moskva", 3, &["SS-N-12 Sandbox"]);
    // Red tag on a blue hull does not qualify.
    host.add_ship(Faction::Blue, "Oddity", 4, &["SS-N-22"]);

    let config = SessionConfig::default();
    let registry = AssetRegistry::discover(&config, &host);

    assert_eq!(registry.len(), 2);
    let blue: Vec<&str> = registry.list_assets(Faction::Blue).map(|a| a.name.as_str()).collect();
    assert_eq!(blue, vec!["CG-52"]);
    let red = registry.lookup(Faction::Red, "Moskva").unwrap();
    assert_eq!(red.remaining_inventory(), config.inventory_ceiling);
    assert!(red.pending_targets().is_empty());
}

#[test]
fn test_lookup_requires_matching_faction() {
    let host = blue_host();
    let registry = AssetRegistry::discover(&SessionConfig::default(), &host);
    assert!(registry.lookup(Faction::Blue, "CG-52").is_some());
    assert!(registry.lookup(Faction::Red, "CG-52").is_none());
    assert!(registry.lookup(Faction::Blue, "DDG-51").is_none());
}

#[test]
fn test_untrackable_is_sticky() {
    let mut host = blue_host();
    let mut asset = asset_with_inventory(&host, 22);
    assert!(asset.is_available(&host));

    host.destroy(asset.handle);
    assert!(!asset.is_available(&host));
    assert!(asset.is_untrackable());

    // Even if the host reports the object again, the asset stays excluded.
    host.alive.insert(asset.handle);
    assert!(!asset.is_available(&host));
}

// ---- Target resolution ----

#[test]
fn test_designation_labels() {
    assert!(is_designation_label("NSGT1", "NSGT"));
    assert!(is_designation_label("nsgt42", "NSGT"));
    assert!(is_designation_label(" NsGt7 ", "NSGT"));
    assert!(!is_designation_label("NSGT", "NSGT"));
    assert!(!is_designation_label("NSGTx1", "NSGT"));
    assert!(!is_designation_label("NSGT1a", "NSGT"));
    assert!(!is_designation_label("XNSGT1", "NSGT"));
    assert!(!is_designation_label("", "NSGT"));
    // Multibyte labels must not panic on slicing.
    assert!(!is_designation_label("ÑSGT1", "NSGT"));
    assert!(!is_designation_label("NSG€1", "NSGT"));
}

#[test]
fn test_resolve_targets_keeps_host_order() {
    let mut host = blue_host();
    host.markers.push(MarkerRecord {
        handle: MarkerHandle(9),
        label: "NSGT9".into(),
        position: Position::new(9.0, 0.0, 0.0),
    });
    host.markers.push(MarkerRecord {
        handle: MarkerHandle(5),
        label: "rally point".into(),
        position: Position::new(5.0, 0.0, 0.0),
    });
    host.markers.push(MarkerRecord {
        handle: MarkerHandle(2),
        label: "nsgt2".into(),
        position: Position::new(2.0, 0.0, 0.0),
    });

    let targets = resolve_targets(&host, "NSGT");
    let markers: Vec<u64> = targets.iter().map(|t| t.marker.0).collect();
    assert_eq!(markers, vec![9, 2]);
}

// ---- Launch authorization ----

#[test]
fn test_admitted_count_is_three_way_minimum() {
    assert_eq!(admitted_count(15, 22, 10), 10);
    assert_eq!(admitted_count(5, 3, 10), 3);
    assert_eq!(admitted_count(4, 22, 10), 4);
    assert_eq!(admitted_count(0, 22, 10), 0);
}

#[test]
fn test_authorize_capped_by_launch_cap() {
    let mut host = blue_host();
    host.add_markers(15);
    let config = SessionConfig::default();
    let mut asset = asset_with_inventory(&host, 22);
    let targets = resolve_targets(&host, &config.marker_prefix);

    let launched = authorization::authorize(&mut asset, &targets, &config, &mut host);

    assert_eq!(launched, 10);
    assert_eq!(asset.remaining_inventory(), 12);
    assert_eq!(asset.pending_targets().len(), 10);
    assert_eq!(host.fire_commands.len(), 10);
    assert_eq!(host.markers.len(), 5, "5 markers must remain untouched");
    let remaining: Vec<u64> = host.markers.iter().map(|m| m.handle.0).collect();
    assert_eq!(remaining, vec![11, 12, 13, 14, 15]);

    // Fire commands carry the first ten targets, in resolver order.
    for (i, (asset_handle, cmd)) in host.fire_commands.iter().enumerate() {
        assert_eq!(*asset_handle, asset.handle);
        assert_eq!(cmd.target, targets[i].position);
        assert_eq!(cmd.expend, 1);
        assert_eq!(cmd.radius_m, config.fire_radius_m);
    }
    assert_eq!(host.last_text(), "CG-52 launched 10 missile(s), 12 remaining");
}

#[test]
fn test_authorize_capped_by_inventory() {
    let mut host = blue_host();
    host.add_markers(5);
    let config = SessionConfig::default();
    let mut asset = asset_with_inventory(&host, 3);
    let targets = resolve_targets(&host, &config.marker_prefix);

    let launched = authorization::authorize(&mut asset, &targets, &config, &mut host);

    assert_eq!(launched, 3);
    assert_eq!(asset.remaining_inventory(), 0);
    assert_eq!(host.markers.len(), 2);
    assert_eq!(host.consumed, vec![MarkerHandle(1), MarkerHandle(2), MarkerHandle(3)]);
}

#[test]
fn test_authorize_without_targets_changes_nothing() {
    let mut host = blue_host();
    let config = SessionConfig::default();
    let mut asset = asset_with_inventory(&host, 22);

    let launched = authorization::authorize(&mut asset, &[], &config, &mut host);

    assert_eq!(launched, 0);
    assert_eq!(asset.remaining_inventory(), 22);
    assert!(asset.pending_targets().is_empty());
    assert!(host.fire_commands.is_empty());
    assert_eq!(host.notifications.len(), 1);
    assert!(host.last_text().starts_with("No valid targets found"));
    assert_eq!(host.notifications[0].0, Audience::Faction(Faction::Blue));
}

#[test]
fn test_authorize_refusals() {
    let mut host = blue_host();
    let config = SessionConfig::default();
    let targets = vec![target(1, 1000.0)];

    let mut empty = asset_with_inventory(&host, 0);
    let err = authorization::launch(&mut empty, &targets, &config, &mut host).unwrap_err();
    assert_eq!(
        err,
        LaunchRefusal::NoMissilesRemaining {
            asset: "CG-52".into()
        }
    );
    assert_eq!(err.to_string(), "CG-52 has no missiles remaining");

    let mut sunk = asset_with_inventory(&host, 22);
    host.destroy(sunk.handle);
    let launched = authorization::authorize(&mut sunk, &targets, &config, &mut host);
    assert_eq!(launched, 0);
    assert_eq!(sunk.remaining_inventory(), 22);
    assert_eq!(host.last_text(), "CG-52 is not available");
    assert!(host.fire_commands.is_empty());
    assert!(host.consumed.is_empty());
}

#[test]
fn test_inventory_monotonic_and_never_negative() {
    let mut host = blue_host();
    let config = SessionConfig::default();
    let mut asset = asset_with_inventory(&host, 22);

    let mut history = vec![asset.remaining_inventory()];
    let mut launches = Vec::new();
    for _ in 0..4 {
        host.add_markers(12);
        let targets = resolve_targets(&host, &config.marker_prefix);
        launches.push(authorization::authorize(&mut asset, &targets, &config, &mut host));
        history.push(asset.remaining_inventory());
    }

    assert_eq!(launches, vec![10, 10, 2, 0]);
    assert_eq!(history, vec![22, 12, 2, 0, 0]);
    assert!(history.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(host.fire_commands.len(), 22);
    assert_eq!(host.last_text(), "CG-52 has no missiles remaining");

    // Every consumed marker consumed exactly once.
    let unique: HashSet<MarkerHandle> = host.consumed.iter().copied().collect();
    assert_eq!(unique.len(), host.consumed.len());
    assert_eq!(host.consumed.len(), 22);
}

// ---- Assignment ----

#[test]
fn test_assignment_is_lifo() {
    let host = blue_host();
    let mut registry = AssetRegistry::discover(&SessionConfig::default(), &host);
    let mut tracker = TtiTracker::new(10.0);
    {
        let asset = registry.by_identity_mut("CG-52").unwrap();
        asset.queue_target(target(1, 1000.0)); // A
        asset.queue_target(target(2, 2000.0)); // B
    }

    let first = LaunchEvent {
        firing_unit: "CG-52".into(),
        weapon: ObjectHandle(100),
    };
    let second = LaunchEvent {
        firing_unit: "CG-52".into(),
        weapon: ObjectHandle(101),
    };
    let b = assignment::assign(&first, &mut registry, &mut tracker, 0).unwrap();
    let a = assignment::assign(&second, &mut registry, &mut tracker, 0).unwrap();

    assert_eq!(b.target, Position::new(0.0, 2000.0, 0.0));
    assert_eq!(a.target, Position::new(0.0, 1000.0, 0.0));
    assert_eq!((b.id, a.id), (1, 2));
    assert_eq!(tracker.get(ObjectHandle(100)).unwrap().target.y, 2000.0);
    assert_eq!(tracker.get(ObjectHandle(101)).unwrap().target.y, 1000.0);
}

#[test]
fn test_launch_with_empty_queue_is_reported_and_dropped() {
    let mut host = blue_host();
    let mut registry = AssetRegistry::discover(&SessionConfig::default(), &host);
    let mut tracker = TtiTracker::new(10.0);
    let event = LaunchEvent {
        firing_unit: "CG-52".into(),
        weapon: ObjectHandle(100),
    };

    let result = assignment::on_weapon_launched(&event, &mut registry, &mut tracker, 0, &mut host);

    assert!(matches!(result, Err(AssignmentMiss::NoPendingTarget { .. })));
    assert!(tracker.is_empty());
    assert_eq!(
        host.texts(),
        vec!["No target position found for munition launched by CG-52"]
    );
}

#[test]
fn test_launch_from_unmanaged_unit_is_silent() {
    let mut host = blue_host();
    let mut registry = AssetRegistry::discover(&SessionConfig::default(), &host);
    let mut tracker = TtiTracker::new(10.0);
    let event = LaunchEvent {
        firing_unit: "F/A-18C #4".into(),
        weapon: ObjectHandle(100),
    };

    let result = assignment::on_weapon_launched(&event, &mut registry, &mut tracker, 0, &mut host);

    assert!(matches!(result, Err(AssignmentMiss::UnknownAsset { .. })));
    assert!(tracker.is_empty());
    assert!(host.notifications.is_empty());
}

// ---- TTI kinematics ----

#[test]
fn test_tti_distance_1000_closing_250() {
    let step = time_to_impact(
        Position::new(0.0, 0.0, 0.0),
        Velocity::new(0.0, 250.0, 0.0),
        Position::new(0.0, 1000.0, 0.0),
    );
    match step {
        TtiStep::Closing { tti_secs, distance, closing_speed } => {
            assert_eq!(tti_secs, 4.0);
            assert_eq!(distance, 1000.0);
            assert_eq!(closing_speed, 250.0);
        }
        other => panic!("expected Closing, got {other:?}"),
    }
    assert_eq!(step.message(7), "Munition #7 TTI 4.0 seconds");
}

#[test]
fn test_tti_uses_only_closing_component() {
    // Crossing velocity contributes nothing; 3-4-5 geometry.
    let step = time_to_impact(
        Position::new(0.0, 0.0, 0.0),
        Velocity::new(300.0, 400.0, 0.0),
        Position::new(0.0, 2000.0, 0.0),
    );
    let TtiStep::Closing { tti_secs, .. } = step else {
        panic!("expected Closing, got {step:?}");
    };
    assert!((tti_secs - 5.0).abs() < 1e-9);
}

#[test]
fn test_tti_terminal_geometries() {
    let here = Position::new(10.0, 20.0, 30.0);
    assert_eq!(time_to_impact(here, Velocity::new(1.0, 0.0, 0.0), here), TtiStep::Arrived);

    let receding = time_to_impact(
        Position::new(0.0, 0.0, 0.0),
        Velocity::new(0.0, -50.0, 0.0),
        Position::new(0.0, 500.0, 0.0),
    );
    assert_eq!(receding, TtiStep::NotClosing { closing_speed: -50.0 });
    assert_eq!(receding.state(), MunitionState::Unresolvable);

    let crossing = time_to_impact(
        Position::new(0.0, 0.0, 0.0),
        Velocity::new(100.0, 0.0, 0.0),
        Position::new(0.0, 500.0, 0.0),
    );
    assert_eq!(crossing.state(), MunitionState::Unresolvable);
}

// ---- TTI tracker ----

fn enroll_one(host: &mut FakeHost, position: Position, velocity: Option<Velocity>, target: Position) -> TtiTracker {
    let handle = host.add_munition(100, position, velocity);
    let mut tracker = TtiTracker::new(10.0);
    tracker.enroll(handle, target, Audience::Faction(Faction::Blue), "CG-52", 0);
    tracker
}

#[test]
fn test_first_check_due_one_interval_after_enrollment() {
    let mut host = FakeHost::default();
    let mut tracker = enroll_one(
        &mut host,
        Position::new(0.0, 0.0, 0.0),
        Some(Velocity::new(0.0, 250.0, 0.0)),
        Position::new(0.0, 1000.0, 0.0),
    );
    assert_eq!(tracker.interval_ticks(), 100);

    assert!(tracker.run_due(99, &mut host).is_empty());
    assert!(host.notifications.is_empty());

    assert!(tracker.run_due(100, &mut host).is_empty());
    assert_eq!(host.texts(), vec!["Munition #1 TTI 4.0 seconds"]);
    assert_eq!(host.notifications[0].0, Audience::Faction(Faction::Blue));
    assert_eq!(tracker.get(ObjectHandle(100)).unwrap().last_tti_secs, Some(4.0));

    // Next check one interval after the last one, not before.
    tracker.run_due(199, &mut host);
    assert_eq!(host.notifications.len(), 1);
    tracker.run_due(200, &mut host);
    assert_eq!(host.notifications.len(), 2);
}

#[test]
fn test_huge_interval_schedules_without_overflow() {
    let mut host = FakeHost::default();
    let handle = host.add_munition(
        100,
        Position::new(0.0, 0.0, 0.0),
        Some(Velocity::new(0.0, 250.0, 0.0)),
    );
    let mut tracker = TtiTracker::new(1e20);
    assert_eq!(tracker.interval_ticks(), u64::MAX);

    tracker.enroll(handle, Position::new(0.0, 1000.0, 0.0), Audience::Faction(Faction::Blue), "CG-52", 5);

    // The check saturates to the far future instead of wrapping to "now".
    assert!(tracker.run_due(1_000_000, &mut host).is_empty());
    assert!(host.notifications.is_empty());
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_recomputation_keeps_enrollment_target() {
    let mut host = FakeHost::default();
    let mut tracker = enroll_one(
        &mut host,
        Position::new(0.0, 0.0, 0.0),
        Some(Velocity::new(0.0, 250.0, 0.0)),
        Position::new(0.0, 1000.0, 0.0),
    );
    tracker.run_due(100, &mut host);

    // Munition maneuvers; TTI may grow, target stays fixed.
    host.positions.insert(ObjectHandle(100), Position::new(0.0, 500.0, 0.0));
    host.velocities.insert(ObjectHandle(100), Velocity::new(0.0, 50.0, 0.0));
    tracker.run_due(200, &mut host);

    assert_eq!(
        host.texts(),
        vec!["Munition #1 TTI 4.0 seconds", "Munition #1 TTI 10.0 seconds"]
    );
    assert_eq!(tracker.get(ObjectHandle(100)).unwrap().target, Position::new(0.0, 1000.0, 0.0));
}

#[test]
fn test_receding_munition_is_unresolvable_once() {
    let mut host = FakeHost::default();
    let mut tracker = enroll_one(
        &mut host,
        Position::new(0.0, 0.0, 0.0),
        Some(Velocity::new(0.0, -50.0, 0.0)),
        Position::new(0.0, 500.0, 0.0),
    );

    let resolved = tracker.run_due(100, &mut host);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].state, MunitionState::Unresolvable);
    assert!(tracker.is_empty());

    for tick in [200, 300, 10_000] {
        assert!(tracker.run_due(tick, &mut host).is_empty());
    }
    assert_eq!(host.texts(), vec!["Munition #1: unable to calculate TTI"]);
}

#[test]
fn test_vanished_munition_is_lost() {
    let mut host = FakeHost::default();
    let mut tracker = enroll_one(
        &mut host,
        Position::new(0.0, 0.0, 0.0),
        Some(Velocity::new(0.0, 250.0, 0.0)),
        Position::new(0.0, 1000.0, 0.0),
    );
    host.destroy(ObjectHandle(100));

    let resolved = tracker.run_due(100, &mut host);
    assert_eq!(resolved[0].state, MunitionState::Lost);
    assert_eq!(host.texts(), vec!["Munition #1 no longer exists"]);
}

#[test]
fn test_missing_velocity_is_lost() {
    let mut host = FakeHost::default();
    let mut tracker = enroll_one(
        &mut host,
        Position::new(0.0, 0.0, 0.0),
        None,
        Position::new(0.0, 1000.0, 0.0),
    );

    let resolved = tracker.run_due(100, &mut host);
    assert_eq!(resolved[0].state, MunitionState::Lost);
    assert_eq!(host.texts(), vec!["Munition #1: unable to retrieve velocity"]);
}

#[test]
fn test_munition_on_target_is_impacted() {
    let mut host = FakeHost::default();
    let aim = Position::new(0.0, 1000.0, 0.0);
    let mut tracker = enroll_one(&mut host, aim, Some(Velocity::new(0.0, 250.0, 0.0)), aim);

    let resolved = tracker.run_due(100, &mut host);
    assert_eq!(resolved[0].state, MunitionState::Impacted);
    assert_eq!(host.texts(), vec!["Munition #1 has reached its target"]);
}

#[test]
fn test_reenrolled_handle_is_checked_once_per_interval() {
    let mut host = FakeHost::default();
    let handle = host.add_munition(
        100,
        Position::new(0.0, 0.0, 0.0),
        Some(Velocity::new(0.0, 250.0, 0.0)),
    );
    let mut tracker = TtiTracker::new(10.0);
    let audience = Audience::Faction(Faction::Blue);
    tracker.enroll(handle, Position::new(0.0, 1000.0, 0.0), audience, "CG-52", 0);
    let second = tracker.enroll(handle, Position::new(0.0, 2000.0, 0.0), audience, "CG-52", 50);

    tracker.run_due(100, &mut host);
    assert!(host.notifications.is_empty(), "stale check must be a no-op");

    tracker.run_due(150, &mut host);
    let expected = format!("Munition #{second} TTI 8.0 seconds");
    assert_eq!(host.texts(), vec![expected.as_str()]);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_ids_are_monotonic() {
    let mut tracker = TtiTracker::new(10.0);
    let audience = Audience::Everyone;
    let ids: Vec<u32> = (0..5)
        .map(|i| tracker.enroll(ObjectHandle(i), Position::default(), audience, "CG-52", 0))
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

// ---- Session ----

fn started_session(host: &mut FakeHost) -> Session {
    Session::start(SessionConfig::default(), host).unwrap()
}

#[test]
fn test_session_start_reports_assets_per_faction() {
    let mut host = blue_host();
    host.add_ship(Faction::Red, "Moskva", 3, &["SS-N-12"]);
    host.add_ship(Faction::Red, "Slava", 4, &["SS-N-12"]);
    let session = started_session(&mut host);

    assert_eq!(session.registry().len(), 3);
    assert_eq!(host.subscribers.len(), 1);
    assert_eq!(
        host.notifications,
        vec![
            (
                Audience::Faction(Faction::Red),
                "Standoff strike ready: 2 launch asset(s) available".to_string()
            ),
            (
                Audience::Faction(Faction::Blue),
                "Standoff strike ready: 1 launch asset(s) available".to_string()
            ),
        ]
    );
}

#[test]
fn test_session_rejects_invalid_config() {
    let mut host = blue_host();
    let config = SessionConfig {
        launch_cap: 0,
        ..Default::default()
    };
    assert!(Session::start(config, &mut host).is_err());
    assert!(host.subscribers.is_empty());
}

#[test]
fn test_session_authorize_then_launch_events_enroll() {
    let mut host = blue_host();
    host.add_markers(2);
    let mut session = started_session(&mut host);

    session.queue_command(OperatorCommand::Authorize {
        faction: Faction::Blue,
        asset: "CG-52".into(),
    });
    let snap = session.tick(&mut host);
    assert_eq!(snap.stats.launches_authorized, 2);
    assert_eq!(snap.assets[0].pending_targets, 2);
    assert_eq!(snap.assets[0].remaining_inventory, 20);

    // Both launches surface through the subscription, newest target first.
    let m1 = host.add_munition(200, Position::new(0.0, 0.0, 0.0), Some(Velocity::new(0.0, 200.0, 0.0)));
    let m2 = host.add_munition(201, Position::new(0.0, 0.0, 0.0), Some(Velocity::new(0.0, 200.0, 0.0)));
    host.launch("CG-52", m1);
    host.launch("CG-52", m2);
    let snap = session.tick(&mut host);

    assert_eq!(snap.stats.munitions_enrolled, 2);
    assert_eq!(snap.assets[0].pending_targets, 0);
    assert_eq!(snap.munitions.len(), 2);
    assert_eq!(snap.munitions[0].target, Position::new(0.0, 20_000.0, 0.0));
    assert_eq!(snap.munitions[1].target, Position::new(0.0, 10_000.0, 0.0));
    assert!(host.texts().contains(&"CG-52 fired munition #1"));
    assert!(host.texts().contains(&"CG-52 fired munition #2"));
}

#[test]
fn test_session_tracks_until_resolution() {
    let mut host = blue_host();
    host.add_markers(1);
    let mut session = started_session(&mut host);
    session.authorize(Faction::Blue, "CG-52", &mut host);

    let m = host.add_munition(200, Position::new(0.0, 0.0, 0.0), Some(Velocity::new(0.0, 250.0, 0.0)));
    host.launch("CG-52", m);
    session.tick(&mut host); // enrolled at tick 0

    let interval = session.tracker().interval_ticks();
    for _ in 0..interval {
        session.tick(&mut host);
    }
    assert_eq!(host.last_text(), "Munition #1 TTI 40.0 seconds");

    host.destroy(m);
    for _ in 0..interval - 1 {
        session.tick(&mut host);
    }
    let snap = session.tick(&mut host);
    assert_eq!(host.last_text(), "Munition #1 no longer exists");
    assert!(snap.munitions.is_empty());
    assert_eq!(snap.stats.lost, 1);

    let count = host.notifications.len();
    for _ in 0..interval * 3 {
        session.tick(&mut host);
    }
    assert_eq!(host.notifications.len(), count, "no ticks after resolution");
}

#[test]
fn test_session_authorize_unknown_asset() {
    let mut host = blue_host();
    host.add_markers(3);
    let mut session = started_session(&mut host);

    assert_eq!(session.authorize(Faction::Red, "CG-52", &mut host), 0);
    assert_eq!(host.last_text(), "CG-52 is not available");
    assert_eq!(host.markers.len(), 3);
}

#[test]
fn test_session_status_queries() {
    let mut host = blue_host();
    host.add_ship(Faction::Blue, "DDG-51", 2, &["BGM-109E"]);
    host.add_markers(4);
    let mut session = started_session(&mut host);
    session.authorize(Faction::Blue, "CG-52", &mut host);

    session.queue_commands([
        OperatorCommand::ReportInventory {
            faction: Faction::Blue,
            asset: "CG-52".into(),
        },
        OperatorCommand::ListAssets {
            faction: Faction::Blue,
        },
        OperatorCommand::ListTracked {
            faction: Faction::Blue,
        },
    ]);
    session.tick(&mut host);
    let texts = host.texts();
    let tail = &texts[texts.len() - 3..];
    assert_eq!(tail[0], "CG-52: 18 missile(s) remaining, 4 launch(es) pending");
    assert_eq!(tail[1], "Available standoff assets: CG-52 (18), DDG-51 (22)");
    assert_eq!(tail[2], "No munitions in flight");

    // A sunk asset drops out of status queries but keeps its registry entry.
    host.destroy(ObjectHandle(2));
    session.queue_commands([
        OperatorCommand::ListAssets {
            faction: Faction::Blue,
        },
        OperatorCommand::ReportInventory {
            faction: Faction::Blue,
            asset: "DDG-51".into(),
        },
    ]);
    let snap = session.tick(&mut host);
    let texts = host.texts();
    assert_eq!(texts[texts.len() - 2], "Available standoff assets: CG-52 (18)");
    assert_eq!(texts[texts.len() - 1], "DDG-51 is not available");
    assert_eq!(snap.assets.len(), 2);
    assert!(!snap.assets.iter().find(|a| a.name == "DDG-51").unwrap().available);
}

#[test]
fn test_session_list_tracked_shows_tti() {
    let mut host = blue_host();
    host.add_markers(1);
    let mut session = started_session(&mut host);
    session.authorize(Faction::Blue, "CG-52", &mut host);
    let m = host.add_munition(200, Position::new(0.0, 0.0, 0.0), Some(Velocity::new(0.0, 250.0, 0.0)));
    host.launch("CG-52", m);
    session.tick(&mut host);

    session.queue_command(OperatorCommand::ListTracked {
        faction: Faction::Blue,
    });
    session.tick(&mut host);
    assert_eq!(host.last_text(), "Munitions in flight: #1 (CG-52, TTI pending)");

    session.queue_command(OperatorCommand::ListTracked {
        faction: Faction::Red,
    });
    session.tick(&mut host);
    assert_eq!(host.last_text(), "No munitions in flight");
}

#[test]
fn test_session_counts_unmatched_launches() {
    let mut host = blue_host();
    let mut session = started_session(&mut host);
    host.launch("CG-52", ObjectHandle(300));
    host.launch("Some Tanker", ObjectHandle(301));
    let snap = session.tick(&mut host);

    assert_eq!(snap.stats.unmatched_launches, 1);
    assert_eq!(snap.stats.munitions_enrolled, 0);
    assert!(snap.munitions.is_empty());
}

// ---- Determinism ----

fn run_sandbox(seed: u64, ticks: usize) -> Vec<String> {
    let mut host = SandboxHost::new(seed);
    host.spawn_ship("CG-52", Faction::Blue, &["BGM-109B"], Position::new(0.0, 0.0, 0.0));
    for i in 1..=6 {
        host.place_marker(&format!("NSGT{i}"), Position::new(2_000.0 * i as f64, 20_000.0, 0.0));
    }
    let mut session = Session::start(SessionConfig::default(), &mut host).unwrap();
    session.queue_command(OperatorCommand::Authorize {
        faction: Faction::Blue,
        asset: "CG-52".into(),
    });

    let mut out = Vec::with_capacity(ticks);
    for _ in 0..ticks {
        host.step();
        let snap = session.tick(&mut host);
        out.push(serde_json::to_string(&snap).unwrap());
    }
    out
}

#[test]
fn test_sandbox_same_seed_is_deterministic() {
    assert_eq!(run_sandbox(7, 400), run_sandbox(7, 400));
}
