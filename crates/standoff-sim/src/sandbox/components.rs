//! ECS components for sandbox entities.
//!
//! Plain data; behaviour lives in the sandbox systems.

use standoff_core::enums::Faction;
use standoff_core::types::Position;

/// A surface unit that may carry standoff weapons.
#[derive(Debug, Clone)]
pub struct Ship {
    pub name: String,
    pub faction: Faction,
    pub armament: Vec<String>,
}

/// A weapon in flight toward a fixed aim point.
#[derive(Debug, Clone)]
pub struct Munition {
    pub launched_by: String,
    pub aim: Position,
    pub speed: f64,
}
