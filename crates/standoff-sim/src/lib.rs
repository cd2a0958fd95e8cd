//! Standoff strike engine.
//!
//! Tracks launch-capable assets per faction, meters launches against
//! inventory and a per-call cap, matches observed launches back to the
//! targets that authorized them, and recomputes time-to-impact for every
//! munition in flight until it resolves. Headless: everything physical is
//! reached through the [`host`] traits.

pub mod assignment;
pub mod authorization;
pub mod engine;
pub mod host;
pub mod registry;
pub mod sandbox;
pub mod snapshot;
pub mod targets;
pub mod tracking;

pub use engine::Session;
pub use standoff_core as core;

#[cfg(test)]
mod tests;
