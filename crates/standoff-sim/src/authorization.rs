//! Launch authorization: admission control against inventory and the
//! per-call launch cap, then fire-command issuance.

use tracing::{debug, info};

use standoff_core::config::SessionConfig;
use standoff_core::constants::FIRE_EXPEND_QUANTITY;
use standoff_core::types::MarkerHandle;

use crate::host::{FireCommand, NotificationSink, TargetResolver, Telemetry, WeaponTasking};
use crate::registry::Asset;
use crate::targets::Target;

/// Why an authorization launched nothing. The message is shown to the
/// asset's faction verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchRefusal {
    #[error("{asset} is not available")]
    AssetUnavailable { asset: String },

    #[error("{asset} has no missiles remaining")]
    NoMissilesRemaining { asset: String },

    #[error("No valid targets found. Mark targets as {prefix}1, {prefix}2, ...")]
    NoValidTargets { prefix: String },
}

/// Outcome of a granted authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchGrant {
    pub launched: u32,
    pub remaining: u32,
    /// Markers whose targets went into this batch.
    pub consumed: Vec<MarkerHandle>,
}

/// How many launches one call may grant.
pub fn admitted_count(available_targets: usize, remaining_inventory: u32, launch_cap: u32) -> u32 {
    let targets = u32::try_from(available_targets).unwrap_or(u32::MAX);
    targets.min(remaining_inventory).min(launch_cap)
}

/// Authorize `asset` against `targets` and report the outcome to its faction.
/// Returns the number of fire commands issued.
pub fn authorize<H>(asset: &mut Asset, targets: &[Target], config: &SessionConfig, host: &mut H) -> u32
where
    H: Telemetry + WeaponTasking + TargetResolver + NotificationSink,
{
    match launch(asset, targets, config, host) {
        Ok(grant) => {
            let text = format!(
                "{} launched {} missile(s), {} remaining",
                asset.name, grant.launched, grant.remaining
            );
            host.notify(asset.faction.into(), &text);
            for marker in &grant.consumed {
                host.consume_marker(*marker);
            }
            grant.launched
        }
        Err(refusal) => {
            info!(asset = %asset.name, %refusal, "authorization refused");
            host.notify(asset.faction.into(), &refusal.to_string());
            0
        }
    }
}

/// Admit, charge inventory and issue fire commands. No notifications and no
/// marker consumption; the caller reports the grant.
///
/// Inventory is charged for the whole batch before the first fire command
/// goes out, so a batch that fails midway is never charged twice.
pub fn launch<H>(
    asset: &mut Asset,
    targets: &[Target],
    config: &SessionConfig,
    host: &mut H,
) -> Result<LaunchGrant, LaunchRefusal>
where
    H: Telemetry + WeaponTasking,
{
    if !asset.is_available(&*host) {
        return Err(LaunchRefusal::AssetUnavailable {
            asset: asset.name.clone(),
        });
    }
    if asset.remaining_inventory() == 0 {
        return Err(LaunchRefusal::NoMissilesRemaining {
            asset: asset.name.clone(),
        });
    }
    if targets.is_empty() {
        return Err(LaunchRefusal::NoValidTargets {
            prefix: config.marker_prefix.clone(),
        });
    }

    let count = admitted_count(targets.len(), asset.remaining_inventory(), config.launch_cap);
    asset.charge(count);

    let batch = &targets[..count as usize];
    for target in batch {
        asset.queue_target(*target);
        host.issue_fire_command(
            asset.handle,
            FireCommand {
                target: target.position,
                radius_m: config.fire_radius_m,
                expend: FIRE_EXPEND_QUANTITY,
            },
        );
        debug!(asset = %asset.name, marker = %target.marker, "fire command issued");
    }

    info!(
        asset = %asset.name,
        launched = count,
        offered = targets.len(),
        remaining = asset.remaining_inventory(),
        "launch authorized"
    );

    Ok(LaunchGrant {
        launched: count,
        remaining: asset.remaining_inventory(),
        consumed: batch.iter().map(|t| t.marker).collect(),
    })
}
