//! Fixed compile-time configuration.
//!
//! The frame has no persisted settings and no configuration UI; everything
//! that tunes the slideshow lives here.

/// Root directory scanned for photos.
pub const PHOTO_ROOT: &str = "/";

/// Whether the scan descends into subdirectories.
pub const RECURSIVE_SCAN: bool = true;

/// Hard cap on catalog size. Traversal stops once this many photos are
/// collected; anything beyond it on the card is simply not visited.
pub const CATALOG_CAPACITY: usize = 100;

/// Height of the status bar at the bottom of the panel, in pixels.
pub const STATUS_BAR_HEIGHT: u32 = 40;

/// Time between automatic advances to the next photo.
pub const AUTO_ADVANCE_INTERVAL_MS: u64 = 10_000;

/// Inactivity after auto-advance is disabled before the frame deep-sleeps.
pub const SLEEP_TIMEOUT_MS: u64 = 60_000;

/// How often the power policy is re-evaluated with fresh readings.
pub const POLICY_EVAL_INTERVAL_MS: u64 = 30_000;

/// Minimum spacing between accepted button intents.
pub const DEBOUNCE_WINDOW_MS: u64 = 500;

/// Idle delay between control-loop ticks.
pub const TICK_DELAY_MS: u32 = 100;

/// Battery level below which auto-advance is forced off.
pub const LOW_BATTERY_PERCENT: u8 = 20;

/// Pack voltage treated as empty (0%).
pub const BATTERY_EMPTY_MV: u16 = 3300;

/// Pack voltage treated as full (100%).
pub const BATTERY_FULL_MV: u16 = 4350;
