//! Core types and definitions for the STANDOFF strike engine.
//!
//! This crate defines the vocabulary shared by the engine and its runner:
//! geometry, handles, operator commands, notifications, state snapshots,
//! constants and session configuration. It holds no engine logic.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
