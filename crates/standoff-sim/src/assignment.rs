//! Launch-to-munition assignment: binds an observed launch back to the
//! target that authorized it and enrolls the munition for TTI tracking.
//!
//! Matching is last-in-first-out: the next observed launch from an asset
//! takes its most recently queued target. Launch events for one salvo can
//! arrive in any order and carry nothing that identifies the fire command
//! behind them, so strict issue-order matching is not observable. LIFO is
//! kept for compatibility with existing mission behaviour; it is not a
//! tactical choice and should be revisited if the host ever reports the
//! commanded aim point with the launch.

use tracing::{trace, warn};

use standoff_core::enums::Faction;
use standoff_core::events::LaunchEvent;
use standoff_core::types::Position;

use crate::host::NotificationSink;
use crate::registry::AssetRegistry;
use crate::tracking::TtiTracker;

/// Why a launch event produced no tracked munition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentMiss {
    /// Ordinary traffic from a unit the engine does not manage.
    #[error("{unit} is not a registered standoff asset")]
    UnknownAsset { unit: String },

    /// More launches observed than targets queued.
    #[error("No target position found for munition launched by {asset}")]
    NoPendingTarget { asset: String, faction: Faction },
}

/// A launch matched to its target and enrolled.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub id: u32,
    pub asset: String,
    pub faction: Faction,
    pub target: Position,
}

/// Match `event` to a pending target and enroll the munition.
pub fn assign(
    event: &LaunchEvent,
    registry: &mut AssetRegistry,
    tracker: &mut TtiTracker,
    now_tick: u64,
) -> Result<Enrollment, AssignmentMiss> {
    let asset = registry
        .by_identity_mut(&event.firing_unit)
        .ok_or_else(|| AssignmentMiss::UnknownAsset {
            unit: event.firing_unit.clone(),
        })?;

    let target = asset
        .pop_latest_target()
        .ok_or_else(|| AssignmentMiss::NoPendingTarget {
            asset: asset.name.clone(),
            faction: asset.faction,
        })?;

    let id = tracker.enroll(
        event.weapon,
        target.position,
        asset.faction.into(),
        &asset.name,
        now_tick,
    );

    Ok(Enrollment {
        id,
        asset: asset.name.clone(),
        faction: asset.faction,
        target: target.position,
    })
}

/// Handle one launch event end to end, reporting to the asset's faction.
/// Returns the enrolled munition id; a miss has already been reported.
pub fn on_weapon_launched<H: NotificationSink>(
    event: &LaunchEvent,
    registry: &mut AssetRegistry,
    tracker: &mut TtiTracker,
    now_tick: u64,
    host: &mut H,
) -> Result<u32, AssignmentMiss> {
    match assign(event, registry, tracker, now_tick) {
        Ok(enrollment) => {
            let text = format!("{} fired munition #{}", enrollment.asset, enrollment.id);
            host.notify(enrollment.faction.into(), &text);
            Ok(enrollment.id)
        }
        Err(miss @ AssignmentMiss::UnknownAsset { .. }) => {
            trace!(%miss, "launch from unmanaged unit ignored");
            Err(miss)
        }
        Err(miss @ AssignmentMiss::NoPendingTarget { faction, .. }) => {
            warn!(weapon = %event.weapon, %miss, "launch with no pending target dropped");
            host.notify(faction.into(), &miss.to_string());
            Err(miss)
        }
    }
}
