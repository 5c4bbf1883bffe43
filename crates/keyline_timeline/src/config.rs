// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline configuration.
//!
//! Settings are stored as RON:
//!
//! ```ron
//! (
//!     version: 1,
//!     duration: 10.0,
//!     frame_rate: 30.0,
//!     rotation: Linear,
//!     color_space: Srgb,
//! )
//! ```

use crate::error::{Result, TimelineError};
use crate::interpolation::{BlendOptions, ColorSpace, RotationPath};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Timeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Format version
    pub version: u32,
    /// Timeline duration in seconds; the seek cursor never leaves `[0, duration]`
    pub duration: f32,
    /// Frames per second used for frame/time conversion
    pub frame_rate: f32,
    /// Rotation policy for new tracks
    pub rotation: RotationPath,
    /// Color policy for new tracks
    pub color_space: ColorSpace,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            duration: 10.0,
            frame_rate: 30.0,
            rotation: RotationPath::Linear,
            color_space: ColorSpace::Srgb,
        }
    }
}

/// Reject durations whose last frame number does not fit in a `u32`
pub(crate) fn check_frame_span(duration: f32, frame_rate: f32) -> Result<()> {
    if duration * frame_rate >= u32::MAX as f32 {
        return Err(TimelineError::InvalidValue(format!(
            "duration {duration}s at {frame_rate} fps exceeds the frame range"
        )));
    }
    Ok(())
}

impl TimelineConfig {
    /// Blend options handed to newly created tracks
    pub fn blend_options(&self) -> BlendOptions {
        BlendOptions {
            rotation: self.rotation,
            color_space: self.color_space,
        }
    }

    /// Check duration and frame rate
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(TimelineError::InvalidValue(format!(
                "duration {} must be finite and non-negative",
                self.duration
            )));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(TimelineError::InvalidValue(format!(
                "frame rate {} must be finite and positive",
                self.frame_rate
            )));
        }
        check_frame_span(self.duration, self.frame_rate)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> std::result::Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        // Version check
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Timeline config version {} is newer than supported version {}",
                    config.version, CONFIG_FORMAT_VERSION
                ),
            ));
        }

        config.validate().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        tracing::debug!("Loaded timeline config from {}", path.display());
        Ok(config)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = self.to_ron().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
