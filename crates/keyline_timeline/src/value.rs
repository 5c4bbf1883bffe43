// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value kinds that tracks can animate.

use crate::interpolation::Animatable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Create a point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Create a size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Angle in degrees.
///
/// Angles are not normalized; 370 and 10 are distinct keyframe values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub f32);

impl Angle {
    /// Create an angle from degrees
    pub const fn degrees(degrees: f32) -> Self {
        Self(degrees)
    }

    /// Create an angle from radians
    pub fn from_radians(radians: f32) -> Self {
        Self(radians.to_degrees())
    }

    /// Angle in radians
    pub fn radians(&self) -> f32 {
        self.0.to_radians()
    }
}

/// RGBA color with gamma-encoded sRGB channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha (always linear)
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    /// Create a color from sRGB channels
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit sRGB channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Quantize to 8-bit sRGB channels
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Decode the color channels to linear light
    pub fn to_linear(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        ]
    }

    /// Encode linear-light channels back to sRGB
    pub fn from_linear(linear: [f32; 4]) -> Self {
        Self::rgba(
            linear_to_srgb(linear[0]),
            linear_to_srgb(linear[1]),
            linear_to_srgb(linear[2]),
            linear[3],
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Opacity in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Closed set of value kinds a track can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Plain number
    Scalar,
    /// 2D point
    Point,
    /// 2D size
    Size,
    /// Angle in degrees
    Rotation,
    /// RGBA color
    Color,
    /// Opacity
    Opacity,
}

impl ValueKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "Scalar",
            Self::Point => "Point",
            Self::Size => "Size",
            Self::Rotation => "Rotation",
            Self::Color => "Color",
            Self::Opacity => "Opacity",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of any kind, as passed to and read from the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KeyframeValue {
    /// Plain number
    Scalar(f32),
    /// 2D point
    Point(Point),
    /// 2D size
    Size(Size),
    /// Angle in degrees
    Rotation(Angle),
    /// RGBA color
    Color(Color),
    /// Opacity
    Opacity(Opacity),
}

impl KeyframeValue {
    /// Kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Point(_) => ValueKind::Point,
            Self::Size(_) => ValueKind::Size,
            Self::Rotation(_) => ValueKind::Rotation,
            Self::Color(_) => ValueKind::Color,
            Self::Opacity(_) => ValueKind::Opacity,
        }
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(v) => Animatable::is_finite(v),
            Self::Point(v) => v.is_finite(),
            Self::Size(v) => v.is_finite(),
            Self::Rotation(v) => v.is_finite(),
            Self::Color(v) => v.is_finite(),
            Self::Opacity(v) => v.is_finite(),
        }
    }

    /// Get as scalar if possible
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as point if possible
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as color if possible
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for KeyframeValue {
    fn from(value: f32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Point> for KeyframeValue {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<Size> for KeyframeValue {
    fn from(value: Size) -> Self {
        Self::Size(value)
    }
}

impl From<Angle> for KeyframeValue {
    fn from(value: Angle) -> Self {
        Self::Rotation(value)
    }
}

impl From<Color> for KeyframeValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<Opacity> for KeyframeValue {
    fn from(value: Opacity) -> Self {
        Self::Opacity(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(KeyframeValue::from(1.0_f32).kind(), ValueKind::Scalar);
        assert_eq!(KeyframeValue::from(Point::new(1.0, 2.0)).kind(), ValueKind::Point);
        assert_eq!(KeyframeValue::from(Angle(90.0)).kind(), ValueKind::Rotation);
        assert_eq!(KeyframeValue::from(Opacity(0.5)).kind(), ValueKind::Opacity);
    }

    #[test]
    fn test_finite() {
        assert!(KeyframeValue::from(Size::new(10.0, 20.0)).is_finite());
        assert!(!KeyframeValue::from(Point::new(f32::NAN, 0.0)).is_finite());
        assert!(!KeyframeValue::from(Color::rgba(0.0, f32::INFINITY, 0.0, 1.0)).is_finite());
        assert!(!KeyframeValue::from(f32::NAN).is_finite());
        assert!(!KeyframeValue::from(Size::new(1.0, f32::NEG_INFINITY)).is_finite());
        assert!(!KeyframeValue::from(Angle(f32::INFINITY)).is_finite());
        assert!(!KeyframeValue::from(Opacity(f32::NAN)).is_finite());
        assert!(!KeyframeValue::from(Color::rgba(0.0, 0.0, 0.0, f32::NAN)).is_finite());
        assert!(KeyframeValue::from(Color::WHITE).is_finite());
    }

    #[test]
    fn test_srgb_round_trip() {
        let color = Color::rgba(0.2, 0.5, 0.8, 0.4);
        let back = Color::from_linear(color.to_linear());
        assert!((back.r - color.r).abs() < 1e-5);
        assert!((back.g - color.g).abs() < 1e-5);
        assert!((back.b - color.b).abs() < 1e-5);
        assert_eq!(back.a, color.a);
    }

    #[test]
    fn test_rgba8() {
        let color = Color::from_rgba8(255, 128, 0, 255);
        assert_eq!(color.to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(Color::rgba(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_angle_radians() {
        let angle = Angle::from_radians(std::f32::consts::PI);
        assert!((angle.0 - 180.0).abs() < 1e-4);
        assert!((Angle::degrees(90.0).radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
