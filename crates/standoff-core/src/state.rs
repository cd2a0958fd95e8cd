//! Session snapshot: the visible engine state after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::{Faction, MunitionState};
use crate::types::{ObjectHandle, Position, SimTime};

/// Complete engine state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub assets: Vec<AssetView>,
    pub munitions: Vec<MunitionView>,
    pub stats: StatsView,
}

/// One registered launch asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetView {
    pub name: String,
    pub faction: Faction,
    pub remaining_inventory: u32,
    /// Launches authorized but not yet observed.
    pub pending_targets: u32,
    /// False once the backing object has been found missing.
    pub available: bool,
}

/// One munition under TTI observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MunitionView {
    pub id: u32,
    pub handle: ObjectHandle,
    pub launched_by: String,
    pub target: Position,
    pub state: MunitionState,
    /// Most recent time-to-impact estimate (seconds), if one was computed.
    pub last_tti_secs: Option<f64>,
}

/// Running session counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub launches_authorized: u32,
    pub munitions_enrolled: u32,
    pub unmatched_launches: u32,
    pub impacted: u32,
    pub lost: u32,
    pub unresolvable: u32,
}
