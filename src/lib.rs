//! Snap Pals - a two-piece character puzzle for small hands
//!
//! Core modules:
//! - `sim`: Deterministic puzzle core (layout, drag, stage sequencing, timers)
//! - `audio`: Sound cues for core events (Web Audio synth on wasm)
//! - `settings`: Tunable geometry, timing and volume
//! - `roster`: The character rotation

pub mod audio;
pub mod error;
pub mod roster;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use roster::{Character, Roster};
pub use settings::Settings;

use glam::Vec2;

/// Reference configuration constants
pub mod consts {
    /// Width of the full character image (and of each piece)
    pub const IMAGE_WIDTH: f32 = 250.0;
    /// Image height = width * aspect ratio
    pub const ASPECT_RATIO: f32 = 1.9;

    /// Drop closer than this to the slot and the piece snaps
    pub const SNAP_THRESHOLD: f32 = 120.0;

    /// Target image is centered on this fraction of the surface width
    pub const TARGET_X_FRACTION: f32 = 0.25;

    /// Staging region inset from every surface edge
    pub const EDGE_MARGIN: f32 = 50.0;
    /// Vertical gap between the upper and lower staging zones
    pub const STAGING_GAP: f32 = 24.0;
    /// Staging columns never get narrower than this fraction of the image width
    pub const MIN_STAGING_WIDTH_FRACTION: f32 = 0.15;
    /// Staging left edge keeps at least this much room before the right edge
    pub const STAGING_LEFT_SLACK: f32 = 20.0;

    /// Redraws allowed when the two fresh pieces overlap each other
    pub const MUTUAL_RETRIES: u32 = 50;
    /// Redraws allowed when a returning piece must also avoid its sibling
    pub const AVOID_RETRIES: u32 = 40;

    /// Both pieces snapped -> next-stage popup (ms)
    pub const POPUP_DELAY_MS: f64 = 3000.0;
    /// Celebration overlay display cycle (ms)
    pub const CELEBRATION_MS: f64 = 3000.0;
    /// Hold this long on the background to open the menu (ms)
    pub const LONG_PRESS_MS: f64 = 800.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Linear interpolation inside `[min, min + span]` by `t` in `[0, 1)`
#[inline]
pub fn lerp_span(min: f32, span: f32, t: f32) -> f32 {
    min + t * span.max(0.0)
}
