//! Asset registry: launch-capable units, their inventory and pending targets.
//!
//! Owned by the session and mutated only from its thread, so no locking.
//! Authorization charges inventory and pushes pending targets; assignment
//! pops them.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use standoff_core::config::SessionConfig;
use standoff_core::enums::Faction;
use standoff_core::types::ObjectHandle;

use crate::host::{CapabilityDiscovery, DiscoveredUnit, Telemetry};
use crate::targets::Target;

/// One launch-capable unit.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub faction: Faction,
    pub handle: ObjectHandle,
    remaining_inventory: u32,
    /// Authorized but not yet observed launches, oldest first.
    pending_targets: Vec<Target>,
    untrackable: bool,
}

impl Asset {
    pub fn new(name: impl Into<String>, faction: Faction, handle: ObjectHandle, inventory: u32) -> Self {
        Self {
            name: name.into(),
            faction,
            handle,
            remaining_inventory: inventory,
            pending_targets: Vec::new(),
            untrackable: false,
        }
    }

    pub fn remaining_inventory(&self) -> u32 {
        self.remaining_inventory
    }

    pub fn pending_targets(&self) -> &[Target] {
        &self.pending_targets
    }

    /// True once the backing object has been seen missing. Sticky.
    pub fn is_untrackable(&self) -> bool {
        self.untrackable
    }

    /// Whether the backing object still exists. A failed check marks the
    /// asset untrackable for the rest of the session.
    pub fn is_available(&mut self, telemetry: &impl Telemetry) -> bool {
        if self.untrackable {
            return false;
        }
        if !telemetry.object_exists(self.handle) {
            self.untrackable = true;
            info!(asset = %self.name, faction = %self.faction, "asset no longer exists, marked untrackable");
            return false;
        }
        true
    }

    /// Charge `count` launches against inventory. Never goes below zero.
    pub(crate) fn charge(&mut self, count: u32) {
        debug_assert!(count <= self.remaining_inventory);
        self.remaining_inventory = self.remaining_inventory.saturating_sub(count);
    }

    pub(crate) fn queue_target(&mut self, target: Target) {
        self.pending_targets.push(target);
    }

    /// Take the most recently authorized pending target.
    pub(crate) fn pop_latest_target(&mut self) -> Option<Target> {
        self.pending_targets.pop()
    }
}

/// Every asset known to the session, keyed by unit name.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<String, Asset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from capability discovery: a unit qualifies when
    /// any of its armament tags is on its faction's allow-list.
    pub fn discover(config: &SessionConfig, discovery: &impl CapabilityDiscovery) -> Self {
        let mut registry = Self::new();
        for faction in Faction::ALL {
            let units = discovery.list_units(faction);
            let total = units.len();
            let mut eligible = 0usize;
            for unit in units {
                if !is_eligible(config, faction, &unit) {
                    continue;
                }
                eligible += 1;
                registry.insert(Asset::new(
                    unit.name,
                    faction,
                    unit.handle,
                    config.inventory_ceiling,
                ));
            }
            info!(%faction, eligible, total, "discovered standoff assets");
        }
        registry
    }

    /// Register an asset, replacing any previous entry with the same name.
    pub fn insert(&mut self, asset: Asset) {
        if let Some(previous) = self.assets.insert(asset.name.clone(), asset) {
            warn!(asset = %previous.name, "duplicate asset name, previous entry replaced");
        }
    }

    /// All assets of `faction`, ordered by name. Includes untrackable ones.
    pub fn list_assets(&self, faction: Faction) -> impl Iterator<Item = &Asset> {
        self.assets.values().filter(move |a| a.faction == faction)
    }

    pub fn list_assets_mut(&mut self, faction: Faction) -> impl Iterator<Item = &mut Asset> {
        self.assets.values_mut().filter(move |a| a.faction == faction)
    }

    pub fn lookup(&self, faction: Faction, name: &str) -> Option<&Asset> {
        self.assets.get(name).filter(|a| a.faction == faction)
    }

    pub fn lookup_mut(&mut self, faction: Faction, name: &str) -> Option<&mut Asset> {
        self.assets.get_mut(name).filter(|a| a.faction == faction)
    }

    /// Look up by unit identity alone, as launch events carry no faction.
    pub fn by_identity_mut(&mut self, name: &str) -> Option<&mut Asset> {
        self.assets.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn is_eligible(config: &SessionConfig, faction: Faction, unit: &DiscoveredUnit) -> bool {
    let eligible = unit
        .armament
        .iter()
        .any(|tag| config.allow_list.recognizes(faction, tag));
    if !eligible {
        debug!(unit = %unit.name, %faction, "unit carries no recognized standoff weapon");
    }
    eligible
}
