//! Enumeration types used throughout the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Red,
    Blue,
}

impl Faction {
    /// Every faction that can own standoff assets.
    pub const ALL: [Faction; 2] = [Faction::Red, Faction::Blue];
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Red => f.write_str("red"),
            Faction::Blue => f.write_str("blue"),
        }
    }
}

/// Who receives a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "faction")]
pub enum Audience {
    Faction(Faction),
    Everyone,
}

impl Audience {
    /// Whether a member of `faction` sees notifications sent to this audience.
    pub fn includes(&self, faction: Faction) -> bool {
        match self {
            Audience::Faction(f) => *f == faction,
            Audience::Everyone => true,
        }
    }
}

impl From<Faction> for Audience {
    fn from(faction: Faction) -> Self {
        Audience::Faction(faction)
    }
}

/// Lifecycle of a tracked munition. Every state except `Active` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MunitionState {
    /// In flight, closing on its target, TTI being recomputed.
    #[default]
    Active,
    /// Reached its target point.
    Impacted,
    /// The physical object vanished or stopped reporting velocity.
    Lost,
    /// Not closing on the target; TTI cannot be computed.
    Unresolvable,
}

impl MunitionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MunitionState::Active)
    }
}
