//! Session configuration, fixed for the lifetime of a session.
//!
//! Loaded from TOML. Every field is optional and falls back to the
//! defaults in [`crate::constants`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Faction;

/// Tunables for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Missiles each asset starts the session with.
    pub inventory_ceiling: u32,
    /// Maximum launches granted by a single authorization.
    pub launch_cap: u32,
    /// Designation marker label prefix, matched case-insensitively.
    pub marker_prefix: String,
    /// Seconds between TTI recomputations of a tracked munition.
    pub tti_interval_secs: f64,
    /// Aim radius carried by fire commands (meters).
    pub fire_radius_m: f64,
    /// Armament tags that make a unit launch-capable, per faction.
    pub allow_list: FactionAllowList,
}

/// Declared mapping from faction to recognized weapon-type tag prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactionAllowList {
    pub red: Vec<String>,
    pub blue: Vec<String>,
}

/// Errors raised while loading or validating a [`SessionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inventory_ceiling: DEFAULT_INVENTORY_CEILING,
            launch_cap: DEFAULT_LAUNCH_CAP,
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            tti_interval_secs: DEFAULT_TTI_INTERVAL_SECS,
            fire_radius_m: DEFAULT_FIRE_RADIUS_M,
            allow_list: FactionAllowList::default(),
        }
    }
}

impl Default for FactionAllowList {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_WEAPON_TAGS.iter().map(|t| t.to_string()).collect(),
            blue: DEFAULT_BLUE_WEAPON_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.launch_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "launch_cap",
                reason: "must be at least 1",
            });
        }
        if self.marker_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "marker_prefix",
                reason: "must not be empty",
            });
        }
        if !self.tti_interval_secs.is_finite() || self.tti_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "tti_interval_secs",
                reason: "must be a positive number of seconds",
            });
        }
        if self.tti_interval_secs > MAX_TTI_INTERVAL_SECS {
            return Err(ConfigError::Invalid {
                field: "tti_interval_secs",
                reason: "too long to schedule",
            });
        }
        if !self.fire_radius_m.is_finite() || self.fire_radius_m <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "fire_radius_m",
                reason: "must be a positive distance",
            });
        }
        Ok(())
    }
}

impl FactionAllowList {
    /// Recognized tag prefixes for `faction`.
    pub fn tags(&self, faction: Faction) -> &[String] {
        match faction {
            Faction::Red => &self.red,
            Faction::Blue => &self.blue,
        }
    }

    /// True if `tag` starts with one of the faction's recognized prefixes.
    pub fn recognizes(&self, faction: Faction, tag: &str) -> bool {
        self.tags(faction)
            .iter()
            .any(|prefix| !prefix.is_empty() && tag.starts_with(prefix.as_str()))
    }
}
