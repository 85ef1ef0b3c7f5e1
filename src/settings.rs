//! Puzzle settings
//!
//! Every geometry, timing and volume knob in one serde struct. Defaults are
//! the reference values from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable puzzle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Geometry ===
    /// Full image width (each piece is this wide)
    pub image_width: f32,
    /// Image height / width
    pub aspect_ratio: f32,
    /// Fraction of surface width the target image is centered on
    pub target_x_fraction: f32,
    /// Staging region inset from the surface edges
    pub edge_margin: f32,
    /// Gap between upper and lower staging zones
    pub staging_gap: f32,
    /// Minimum staging column width, as a fraction of image width
    pub min_staging_width_fraction: f32,

    // === Snapping ===
    /// Maximum drop distance (exclusive) that still snaps
    pub snap_threshold: f32,

    // === Placement retries ===
    pub mutual_retries: u32,
    pub avoid_retries: u32,

    // === Timing (ms) ===
    pub popup_delay_ms: f64,
    pub celebration_ms: f64,
    pub long_press_ms: f64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_width: IMAGE_WIDTH,
            aspect_ratio: ASPECT_RATIO,
            target_x_fraction: TARGET_X_FRACTION,
            edge_margin: EDGE_MARGIN,
            staging_gap: STAGING_GAP,
            min_staging_width_fraction: MIN_STAGING_WIDTH_FRACTION,

            snap_threshold: SNAP_THRESHOLD,

            mutual_retries: MUTUAL_RETRIES,
            avoid_retries: AVOID_RETRIES,

            popup_delay_ms: POPUP_DELAY_MS,
            celebration_ms: CELEBRATION_MS,
            long_press_ms: LONG_PRESS_MS,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Full image height
    #[inline]
    pub fn image_height(&self) -> f32 {
        self.image_width * self.aspect_ratio
    }

    /// Height of one piece (half the image)
    #[inline]
    pub fn piece_height(&self) -> f32 {
        self.image_height() / 2.0
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make layout or snapping meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::InvalidSetting { field, reason });

        if !(self.image_width > 0.0) {
            return invalid("image_width", "must be positive");
        }
        if !(self.aspect_ratio > 0.0) {
            return invalid("aspect_ratio", "must be positive");
        }
        if !(self.snap_threshold > 0.0) {
            return invalid("snap_threshold", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.target_x_fraction) {
            return invalid("target_x_fraction", "must be within 0..=1");
        }
        if !(self.edge_margin >= 0.0) {
            return invalid("edge_margin", "must not be negative");
        }
        if !(self.staging_gap >= 0.0) {
            return invalid("staging_gap", "must not be negative");
        }
        if !(self.min_staging_width_fraction >= 0.0) {
            return invalid("min_staging_width_fraction", "must not be negative");
        }
        if self.mutual_retries == 0 {
            return invalid("mutual_retries", "must be at least 1");
        }
        if !(self.popup_delay_ms >= 0.0) {
            return invalid("popup_delay_ms", "must not be negative");
        }
        if !(self.long_press_ms >= 0.0) {
            return invalid("long_press_ms", "must not be negative");
        }
        if !(self.celebration_ms >= 0.0) {
            return invalid("celebration_ms", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return invalid("master_volume", "must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.sfx_volume) {
            return invalid("sfx_volume", "must be within 0..=1");
        }
        Ok(())
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Volume actually applied to sound cues
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let s = Settings::default();
        assert_eq!(s.image_height(), 475.0);
        assert_eq!(s.piece_height(), 237.5);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "snap_threshold": 80.0, "muted": true }"#).unwrap();
        assert_eq!(s.snap_threshold, 80.0);
        assert!(s.muted);
        assert_eq!(s.image_width, IMAGE_WIDTH);
        assert_eq!(s.effective_volume(), 0.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Settings::from_json(r#"{ "image_width": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting { field: "image_width", .. }
        ));

        let err = Settings::from_json(r#"{ "mutual_retries": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting { field: "mutual_retries", .. }
        ));

        assert!(matches!(
            Settings::from_json("not json").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_json() {
        let cases = [
            (r#"{ "master_volume": 1.5 }"#, "master_volume"),
            (r#"{ "sfx_volume": -0.1 }"#, "sfx_volume"),
            (r#"{ "celebration_ms": -1.0 }"#, "celebration_ms"),
            (r#"{ "min_staging_width_fraction": -0.2 }"#, "min_staging_width_fraction"),
        ];
        for (json, expected) in cases {
            match Settings::from_json(json) {
                Err(ConfigError::InvalidSetting { field, .. }) => assert_eq!(field, expected),
                other => panic!("{} should be rejected, got {:?}", json, other),
            }
        }
        assert!(Settings::from_json(r#"{ "master_volume": 0.0, "sfx_volume": 1.0 }"#).is_ok());
    }

    #[test]
    fn test_volume_clamp() {
        let mut s = Settings::default();
        s.set_master_volume(2.0);
        s.set_sfx_volume(-1.0);
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
    }
}
