// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interpolation strategies for every value kind.
//!
//! Blending is pure: `blend(a, b, 0.0)` yields `a` and `blend(a, b, 1.0)`
//! yields `b` for every kind and every [`BlendOptions`].

use crate::track::{AnyTrack, Track};
use crate::value::{Angle, Color, KeyframeValue, Opacity, Point, Size, ValueKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How rotation tracks travel between two angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationPath {
    /// Blend the raw degree values (350 to 10 turns back through 180)
    #[default]
    Linear,
    /// Take the shortest arc (350 to 10 passes through 360).
    ///
    /// Intermediate values are not wrapped: 350 to 10 approaches 370 within
    /// the segment, then reads the stored 10 at the keyframe. The angles are
    /// equivalent, but differencing successive samples sees a 360 jump.
    Shortest,
}

/// Channel space color tracks blend in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Blend the stored gamma-encoded sRGB channels
    #[default]
    Srgb,
    /// Decode to linear light, blend, then re-encode
    Linear,
}

/// Per-track blending policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlendOptions {
    /// Rotation policy
    #[serde(default)]
    pub rotation: RotationPath,
    /// Color policy
    #[serde(default)]
    pub color_space: ColorSpace,
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    #[inline]
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cubic bezier interpolation
    pub fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
    }

    /// Interpolate a point component-wise
    pub fn lerp_point(a: Point, b: Point, t: f32) -> Point {
        Point::new(Self::lerp(a.x, b.x, t), Self::lerp(a.y, b.y, t))
    }

    /// Interpolate a size component-wise
    pub fn lerp_size(a: Size, b: Size, t: f32) -> Size {
        Size::new(
            Self::lerp(a.width, b.width, t),
            Self::lerp(a.height, b.height, t),
        )
    }

    /// Interpolate an angle in degrees
    pub fn lerp_angle(a: Angle, b: Angle, t: f32, path: RotationPath) -> Angle {
        match path {
            RotationPath::Linear => Angle(Self::lerp(a.0, b.0, t)),
            RotationPath::Shortest => {
                if t == 1.0 {
                    return b;
                }
                Angle(a.0 + Self::wrap_degrees(b.0 - a.0) * t)
            }
        }
    }

    /// Wrap a degree delta into `(-180, 180]`
    pub fn wrap_degrees(delta: f32) -> f32 {
        let wrapped = (delta + 180.0).rem_euclid(360.0) - 180.0;
        if wrapped == -180.0 {
            180.0
        } else {
            wrapped
        }
    }

    /// Interpolate a color per channel
    pub fn lerp_color(a: Color, b: Color, t: f32, space: ColorSpace) -> Color {
        match space {
            ColorSpace::Srgb => Color::rgba(
                Self::lerp(a.r, b.r, t),
                Self::lerp(a.g, b.g, t),
                Self::lerp(a.b, b.b, t),
                Self::lerp(a.a, b.a, t),
            ),
            ColorSpace::Linear => {
                if t == 0.0 {
                    return a;
                }
                if t == 1.0 {
                    return b;
                }
                let (la, lb) = (a.to_linear(), b.to_linear());
                Color::from_linear([
                    Self::lerp(la[0], lb[0], t),
                    Self::lerp(la[1], lb[1], t),
                    Self::lerp(la[2], lb[2], t),
                    Self::lerp(la[3], lb[3], t),
                ])
            }
        }
    }
}

/// A value type that can live in a [`Track`].
///
/// Implemented for each member of the closed [`ValueKind`] set. The
/// narrowing methods map between the typed and the type-erased forms.
pub trait Animatable:
    Copy + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind tag of this value type
    const KIND: ValueKind;

    /// Blend `a` towards `b` at fraction `t`
    fn blend(a: &Self, b: &Self, t: f32, options: &BlendOptions) -> Self;

    /// Whether every component is finite
    fn is_finite(&self) -> bool;

    /// Wrap into the type-erased value
    fn into_value(self) -> KeyframeValue;

    /// Narrow a type-erased value
    fn from_value(value: KeyframeValue) -> Option<Self>;

    /// Wrap a typed track into the type-erased track
    fn into_any(track: Track<Self>) -> AnyTrack;

    /// Narrow a type-erased track
    fn track_ref(track: &AnyTrack) -> Option<&Track<Self>>;

    /// Narrow a type-erased track mutably
    fn track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>>;
}

macro_rules! narrowing {
    ($variant:ident) => {
        fn into_value(self) -> KeyframeValue {
            KeyframeValue::$variant(self)
        }

        fn from_value(value: KeyframeValue) -> Option<Self> {
            match value {
                KeyframeValue::$variant(v) => Some(v),
                _ => None,
            }
        }

        fn into_any(track: Track<Self>) -> AnyTrack {
            AnyTrack::$variant(track)
        }

        fn track_ref(track: &AnyTrack) -> Option<&Track<Self>> {
            match track {
                AnyTrack::$variant(t) => Some(t),
                _ => None,
            }
        }

        fn track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>> {
            match track {
                AnyTrack::$variant(t) => Some(t),
                _ => None,
            }
        }
    };
}

impl Animatable for f32 {
    const KIND: ValueKind = ValueKind::Scalar;

    fn blend(a: &Self, b: &Self, t: f32, _options: &BlendOptions) -> Self {
        Interpolation::lerp(*a, *b, t)
    }

    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }

    narrowing!(Scalar);
}

impl Animatable for Point {
    const KIND: ValueKind = ValueKind::Point;

    fn blend(a: &Self, b: &Self, t: f32, _options: &BlendOptions) -> Self {
        Interpolation::lerp_point(*a, *b, t)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    narrowing!(Point);
}

impl Animatable for Size {
    const KIND: ValueKind = ValueKind::Size;

    fn blend(a: &Self, b: &Self, t: f32, _options: &BlendOptions) -> Self {
        Interpolation::lerp_size(*a, *b, t)
    }

    fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }

    narrowing!(Size);
}

impl Animatable for Angle {
    const KIND: ValueKind = ValueKind::Rotation;

    fn blend(a: &Self, b: &Self, t: f32, options: &BlendOptions) -> Self {
        Interpolation::lerp_angle(*a, *b, t, options.rotation)
    }

    fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    narrowing!(Rotation);
}

impl Animatable for Color {
    const KIND: ValueKind = ValueKind::Color;

    fn blend(a: &Self, b: &Self, t: f32, options: &BlendOptions) -> Self {
        Interpolation::lerp_color(*a, *b, t, options.color_space)
    }

    fn is_finite(&self) -> bool {
        [self.r, self.g, self.b, self.a].into_iter().all(f32::is_finite)
    }

    narrowing!(Color);
}

impl Animatable for Opacity {
    const KIND: ValueKind = ValueKind::Opacity;

    fn blend(a: &Self, b: &Self, t: f32, _options: &BlendOptions) -> Self {
        Opacity(Interpolation::lerp(a.0, b.0, t))
    }

    fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    narrowing!(Opacity);
}
