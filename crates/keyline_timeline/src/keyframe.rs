// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the timeline.

use crate::interpolation::Interpolation;
use serde::{Deserialize, Serialize};

/// Interpolation mode between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum InterpolationMode {
    /// Constant (step): hold this keyframe's value until the next one
    Constant,
    /// Linear interpolation
    #[default]
    Linear,
    /// Cubic ease in
    EaseIn,
    /// Cubic ease out
    EaseOut,
    /// Cubic ease in and out
    EaseInOut,
}

impl InterpolationMode {
    /// Map a segment fraction in `[0, 1]` through this mode's curve
    pub fn ease(&self, t: f32) -> f32 {
        match self {
            Self::Constant => 0.0,
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let mt = 1.0 - t;
                1.0 - mt * mt * mt
            }
            Self::EaseInOut => Interpolation::bezier(0.0, 0.0, 1.0, 1.0, t),
        }
    }
}

/// A keyframe in a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<V> {
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: V,
    /// Interpolation mode to next keyframe
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

impl<V> Keyframe<V> {
    /// Create a new keyframe
    pub fn new(time: f32, value: V) -> Self {
        Self {
            time,
            value,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }
}
