//! STANDOFF headless runner.
//!
//! Wires the engine to the sandbox host and drives it from a fixed-rate
//! loop thread fed over a channel.

pub mod demo;
pub mod session_loop;
pub mod state;

pub use standoff_core as core;
