//! Application configuration constants
//!
//! Central location for window geometry, opacity bounds, arrangement
//! parameters and auto-save limits used throughout the application.

// ===== Note Window Geometry =====

/// Default width for a new note window in logical pixels
pub const NOTE_DEFAULT_WIDTH: f64 = 300.0;
/// Default height for a new note window in logical pixels
pub const NOTE_DEFAULT_HEIGHT: f64 = 270.0;
/// Height of a collapsed note: the title bar only
pub const COLLAPSED_HEIGHT: f64 = 30.0;
/// Gap kept between a freshly spawned note and the display edge
pub const SPAWN_MARGIN: f64 = 20.0;

// ===== Opacity =====

/// Lowest opacity a note window may be set to
pub const MIN_OPACITY: f64 = 0.5;
/// Fully opaque
pub const MAX_OPACITY: f64 = 1.0;
/// Value a note switches to when its opacity is toggled away from opaque
pub const TOGGLED_OPACITY: f64 = 0.8;

// ===== Rearrange =====

/// Horizontal origin of the rearranged stack
pub const REARRANGE_ORIGIN_X: f64 = 20.0;
/// Vertical origin of the rearranged stack
pub const REARRANGE_ORIGIN_Y: f64 = 20.0;
/// Vertical distance between stacked collapsed notes
pub const REARRANGE_SPACING: f64 = 40.0;

// ===== Defaults =====

pub const DEFAULT_BACKGROUND_COLOR: &str = "rgba(255, 235, 59, 1.0)";
/// Older stores saved the default color as hex; migrated on load.
pub const LEGACY_DEFAULT_BACKGROUND_COLOR: &str = "#ffeb3b";
pub const DEFAULT_OPACITY: f64 = 0.8;
pub const DEFAULT_ALWAYS_ON_TOP: bool = true;
pub const DEFAULT_GROUP_NAME: &str = "New Group";
pub const DEFAULT_GROUP_COLOR: &str = "#2196f3";

// ===== Auto-save =====

/// Debounce delay applied to editor content changes
pub const DEFAULT_AUTO_SAVE_DELAY_MS: u32 = 1000;

/// Minimum auto-save delay in milliseconds.
/// Values below this cause excessive disk I/O.
pub const MIN_AUTO_SAVE_DELAY_MS: u32 = 100;

/// Maximum auto-save delay in milliseconds (5 minutes).
/// Values above this risk data loss on unexpected shutdown.
pub const MAX_AUTO_SAVE_DELAY_MS: u32 = 300_000;

// ===== Storage =====

/// Name of the persisted document inside the app data directory
pub const STORE_FILE_NAME: &str = "markies.json";
