// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe animation timeline for Keyline.
//!
//! This crate provides the animation core shared by every Keyline host:
//! - Typed value tracks (scalar, point, size, rotation, color, opacity)
//! - Keyframe insertion, replacement, removal and retiming
//! - Interpolation strategies per value kind
//! - A timeline registry with a clamped seek cursor
//!
//! ## Architecture
//!
//! The timeline is built on:
//! - `Track<V>` holding strictly ordered keyframes of one value kind
//! - `AnyTrack`, a closed union over the supported kinds
//! - `TrackId`, the `(entity, property)` pair that keys every track
//! - Pull-based evaluation: hosts `seek` and then read values
//!
//! ```
//! use keyline_timeline::{EntityId, Point, PropertyKind, Timeline, TrackId};
//!
//! let mut timeline = Timeline::default();
//! timeline.setup(5.0).unwrap();
//!
//! let id = TrackId::new(EntityId::new(), PropertyKind::Position);
//! timeline.create_track(id, Point::new(200.0, 300.0)).unwrap();
//! timeline.add_keyframe(id, 2.0, Point::new(300.0, 400.0)).unwrap();
//!
//! timeline.seek(1.0).unwrap();
//! assert_eq!(timeline.value_as::<Point>(id).unwrap(), Point::new(250.0, 350.0));
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod interpolation;
pub mod keyframe;
pub mod provider;
pub mod timeline;
pub mod track;
pub mod value;

pub use binding::{EntityId, PropertyKind, TrackId};
pub use config::{TimelineConfig, CONFIG_FORMAT_VERSION};
pub use error::{Result, TimelineError};
pub use interpolation::{Animatable, BlendOptions, ColorSpace, Interpolation, RotationPath};
pub use keyframe::{InterpolationMode, Keyframe};
pub use provider::ElementProvider;
pub use timeline::Timeline;
pub use track::{AnyTrack, KeyframeSnapshot, Track};
pub use value::{Angle, Color, KeyframeValue, Opacity, Point, Size, ValueKind};
