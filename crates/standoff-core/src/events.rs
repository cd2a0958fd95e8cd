//! Events crossing the engine boundary: launch observations in, notifications out.

use serde::{Deserialize, Serialize};

use crate::enums::Audience;
use crate::types::ObjectHandle;

/// Pushed by the host whenever any unit in the session fires any weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchEvent {
    /// Name of the unit that fired.
    pub firing_unit: String,
    /// The newly created weapon object.
    pub weapon: ObjectHandle,
}

/// A text event delivered to an audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub audience: Audience,
    pub text: String,
    pub tick: u64,
}
