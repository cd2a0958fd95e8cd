//! Snapshot builder: reads session state into a `SessionSnapshot`.
//!
//! Read-only; never queries the host.

use standoff_core::enums::MunitionState;
use standoff_core::state::{AssetView, MunitionView, SessionSnapshot, StatsView};
use standoff_core::types::SimTime;

use crate::registry::AssetRegistry;
use crate::tracking::TtiTracker;

pub fn build_snapshot(
    time: &SimTime,
    registry: &AssetRegistry,
    tracker: &TtiTracker,
    stats: &StatsView,
) -> SessionSnapshot {
    SessionSnapshot {
        time: *time,
        assets: build_assets(registry),
        munitions: build_munitions(tracker),
        stats: stats.clone(),
    }
}

fn build_assets(registry: &AssetRegistry) -> Vec<AssetView> {
    registry
        .iter()
        .map(|asset| AssetView {
            name: asset.name.clone(),
            faction: asset.faction,
            remaining_inventory: asset.remaining_inventory(),
            pending_targets: asset.pending_targets().len() as u32,
            available: !asset.is_untrackable(),
        })
        .collect()
}

fn build_munitions(tracker: &TtiTracker) -> Vec<MunitionView> {
    tracker
        .munitions()
        .into_iter()
        .map(|m| MunitionView {
            id: m.id,
            handle: m.handle,
            launched_by: m.launched_by.clone(),
            target: m.target,
            // Resolved entries leave the tracker, so everything left is active.
            state: MunitionState::Active,
            last_tti_secs: m.last_tti_secs,
        })
        .collect()
}
