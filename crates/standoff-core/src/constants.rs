//! Engine constants and configuration defaults.

/// Session tick rate (Hz).
pub const TICK_RATE: u32 = 10;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Session defaults ---

/// Missiles loaded on each asset at session start. Never resupplied.
pub const DEFAULT_INVENTORY_CEILING: u32 = 22;

/// Maximum munitions one asset may be authorized to fire per authorization.
pub const DEFAULT_LAUNCH_CAP: u32 = 10;

/// Marker labels designating targets look like `NSGT1`, `nsgt42`, ...
pub const DEFAULT_MARKER_PREFIX: &str = "NSGT";

/// Seconds between TTI recomputations of one tracked munition.
pub const DEFAULT_TTI_INTERVAL_SECS: f64 = 10.0;

/// Longest accepted TTI interval: its length in ticks must fit a `u32`.
pub const MAX_TTI_INTERVAL_SECS: f64 = u32::MAX as f64 / TICK_RATE as f64;

/// Aim radius (meters) carried by every fire command.
pub const DEFAULT_FIRE_RADIUS_M: f64 = 1.0;

/// Rounds expended per fire command.
pub const FIRE_EXPEND_QUANTITY: u32 = 1;

/// Armament tag prefixes that make a red unit a standoff asset.
pub const DEFAULT_RED_WEAPON_TAGS: &[&str] = &["SS-N"];

/// Armament tag prefixes that make a blue unit a standoff asset.
pub const DEFAULT_BLUE_WEAPON_TAGS: &[&str] = &["BGM-109"];

// --- Sandbox host ---

/// Cruise speed of sandbox munitions (m/s, subsonic land-attack missile).
pub const SANDBOX_MUNITION_SPEED: f64 = 240.0;

/// Upper bound on the delay between a fire command and its launch (seconds).
pub const SANDBOX_MAX_LAUNCH_DELAY_SECS: f64 = 4.0;

/// Launch altitude above the firing ship (meters).
pub const SANDBOX_LAUNCH_HEIGHT: f64 = 20.0;
