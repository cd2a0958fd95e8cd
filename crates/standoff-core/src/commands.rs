//! Operator commands sent from the menu surface to the session.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::Faction;

/// All operator actions the engine understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperatorCommand {
    /// Fire the named asset at every pending designation marker it can cover.
    Authorize { faction: Faction, asset: String },
    /// Report the named asset's remaining missiles.
    ReportInventory { faction: Faction, asset: String },
    /// List the faction's available assets with their inventory.
    ListAssets { faction: Faction },
    /// List the faction's munitions currently under TTI observation.
    ListTracked { faction: Faction },
}
