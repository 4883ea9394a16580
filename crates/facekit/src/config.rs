//! Engine configuration marshaled into `initEngine`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Orientation applied to every frame before detection, with the
/// engine's numeric tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Rotation {
    #[default]
    None = 0,
    Clockwise90 = 1,
    Clockwise180 = 2,
    Clockwise270 = 3,
    HorizontalFlip = 4,
    VerticalFlip = 5,
}

/// Engine configuration. Defaults match the stock binding: detection and
/// recognition are both off until explicitly enabled, so an unedited
/// config produces an engine that loads no models.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest detectable face as a fraction of the image short side
    /// (a face is found down to short_side / scale pixels).
    pub detect_face_scale: i32,
    /// Upper bound on faces returned per frame.
    pub detect_face_max_num: i32,
    /// Detection confidence threshold.
    pub prob_threshold: f32,
    /// Non-maximum-suppression IoU threshold.
    pub nms_threshold: f32,
    /// Load the detection model.
    pub support_face_detect: bool,
    /// Load the recognition model.
    pub support_face_recognition: bool,
    pub rotation: Rotation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detect_face_scale: 10,
            detect_face_max_num: 4,
            prob_threshold: 0.6,
            nms_threshold: 0.45,
            support_face_detect: false,
            support_face_recognition: false,
            rotation: Rotation::None,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            tracing::warn!(path = %path.as_ref().display(), error = %err, "config read failed");
            Error::InvalidParam
        })?;
        toml::from_str(&text).map_err(|err| {
            tracing::warn!(path = %path.as_ref().display(), error = %err, "config parse failed");
            Error::InvalidParam
        })
    }

    /// Fold the model flags into the engine's runtime bitmask.
    pub fn combined_mask(&self) -> i32 {
        let mut mask = 0;
        if self.support_face_detect {
            mask |= facekit_sys::RUNTIME_FACE_DETECTION;
        }
        if self.support_face_recognition {
            mask |= facekit_sys::RUNTIME_FACE_RECOGNITION;
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_binding() {
        let config = EngineConfig::default();
        assert_eq!(config.detect_face_scale, 10);
        assert_eq!(config.detect_face_max_num, 4);
        assert!((config.prob_threshold - 0.6).abs() < 1e-6);
        assert!((config.nms_threshold - 0.45).abs() < 1e-6);
        assert_eq!(config.combined_mask(), 0);
        assert_eq!(config.rotation, Rotation::None);
    }

    #[test]
    fn test_combined_mask_folds_flags() {
        let mut config = EngineConfig::default();
        config.support_face_detect = true;
        assert_eq!(config.combined_mask(), 0b01);
        config.support_face_recognition = true;
        assert_eq!(config.combined_mask(), 0b11);
        config.support_face_detect = false;
        assert_eq!(config.combined_mask(), 0b10);
    }

    #[test]
    fn test_toml_round_trip_with_partial_file() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            detect_face_max_num = 8
            support_face_detect = true
            rotation = "clockwise90"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.detect_face_max_num, 8);
        assert!(parsed.support_face_detect);
        assert_eq!(parsed.rotation, Rotation::Clockwise90);
        // Unspecified fields keep their defaults.
        assert_eq!(parsed.detect_face_scale, 10);
    }

    #[test]
    fn test_rotation_native_tags() {
        assert_eq!(Rotation::None as i32, 0);
        assert_eq!(Rotation::Clockwise270 as i32, 3);
        assert_eq!(Rotation::VerticalFlip as i32, 5);
    }
}
