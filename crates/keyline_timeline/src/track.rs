// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions for the timeline.
//!
//! A [`Track`] owns strictly time-ordered keyframes of a single value kind
//! and is never empty. [`AnyTrack`] is the closed union the timeline stores.

use crate::error::{checked_time, Result, TimelineError};
use crate::interpolation::{Animatable, BlendOptions};
use crate::keyframe::{InterpolationMode, Keyframe};
use crate::value::{Angle, Color, KeyframeValue, Opacity, Point, Size, ValueKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// A keyframed value track.
///
/// Keyframes live in a shared buffer that is copied on the first write
/// after a [`KeyframeSnapshot`] was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Track<V: Animatable> {
    keyframes: Arc<Vec<Keyframe<V>>>,
    options: BlendOptions,
}

fn check_value<V: Animatable>(value: &V) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TimelineError::InvalidValue(format!(
            "{} value {value:?} is not finite",
            V::KIND
        )))
    }
}

impl<V: Animatable> Track<V> {
    /// Create a track seeded with one keyframe at time 0
    pub fn new(initial: V) -> Result<Self> {
        Self::with_options(initial, BlendOptions::default())
    }

    /// Create a seeded track with explicit blend options
    pub fn with_options(initial: V, options: BlendOptions) -> Result<Self> {
        check_value(&initial)?;
        Ok(Self {
            keyframes: Arc::new(vec![Keyframe::new(0.0, initial)]),
            options,
        })
    }

    /// Rebuild a track from persisted keyframes.
    ///
    /// The keyframes must be non-empty, finite and strictly ascending.
    pub fn from_keyframes(keyframes: Vec<Keyframe<V>>, options: BlendOptions) -> Result<Self> {
        if keyframes.is_empty() {
            return Err(TimelineError::CannotEmptyTrack);
        }
        let mut checked = Vec::with_capacity(keyframes.len());
        for kf in keyframes {
            let time = checked_time(kf.time)?;
            check_value(&kf.value)?;
            if checked.last().is_some_and(|prev: &Keyframe<V>| prev.time >= time) {
                return Err(TimelineError::InvalidValue(format!(
                    "keyframe at {time} is out of order; times must be strictly ascending"
                )));
            }
            checked.push(Keyframe { time, ..kf });
        }
        Ok(Self {
            keyframes: Arc::new(checked),
            options,
        })
    }

    /// Blend options used for evaluation
    pub fn options(&self) -> BlendOptions {
        self.options
    }

    /// Replace the blend options
    pub fn set_options(&mut self, options: BlendOptions) {
        self.options = options;
    }

    fn search(&self, time: f32) -> std::result::Result<usize, usize> {
        // stored times never hold -0.0
        let time = if time == 0.0 { 0.0 } else { time };
        self.keyframes.binary_search_by(|k| k.time.total_cmp(&time))
    }

    fn insert(&mut self, time: f32, value: V, mode: Option<InterpolationMode>) -> Result<()> {
        let time = checked_time(time)?;
        check_value(&value)?;

        let idx = self.search(time);
        let keyframes = Arc::make_mut(&mut self.keyframes);
        match idx {
            Ok(idx) => {
                let kf = &mut keyframes[idx];
                kf.value = value;
                if let Some(mode) = mode {
                    kf.interpolation = mode;
                }
            }
            Err(idx) => {
                let kf = Keyframe::new(time, value).with_interpolation(mode.unwrap_or_default());
                keyframes.insert(idx, kf);
            }
        }
        Ok(())
    }

    /// Insert a keyframe, or replace the value of the keyframe at `time`.
    ///
    /// A replaced keyframe keeps its interpolation mode.
    pub fn add_keyframe(&mut self, time: f32, value: V) -> Result<()> {
        self.insert(time, value, None)
    }

    /// Insert or replace a keyframe together with its interpolation mode
    pub fn add_keyframe_with(&mut self, time: f32, value: V, mode: InterpolationMode) -> Result<()> {
        self.insert(time, value, Some(mode))
    }

    /// Remove the keyframe at exactly `time`.
    ///
    /// Returns `Ok(None)` if there is none. The last remaining keyframe
    /// cannot be removed.
    pub fn remove_keyframe(&mut self, time: f32) -> Result<Option<Keyframe<V>>> {
        let time = checked_time(time)?;
        let Ok(idx) = self.search(time) else {
            return Ok(None);
        };
        if self.keyframes.len() == 1 {
            return Err(TimelineError::CannotEmptyTrack);
        }
        Ok(Some(Arc::make_mut(&mut self.keyframes).remove(idx)))
    }

    /// Change the interpolation mode of the keyframe at `time`
    pub fn set_interpolation(&mut self, time: f32, mode: InterpolationMode) -> Result<bool> {
        let time = checked_time(time)?;
        let Ok(idx) = self.search(time) else {
            return Ok(false);
        };
        Arc::make_mut(&mut self.keyframes)[idx].interpolation = mode;
        Ok(true)
    }

    /// Move the keyframe at `from` to `to`.
    ///
    /// A keyframe already sitting at `to` is replaced. Returns whether a
    /// keyframe was found at `from`.
    pub fn move_keyframe(&mut self, from: f32, to: f32) -> Result<bool> {
        let from = checked_time(from)?;
        let to = checked_time(to)?;
        let Ok(src) = self.search(from) else {
            return Ok(false);
        };
        if from == to {
            return Ok(true);
        }

        let keyframes = Arc::make_mut(&mut self.keyframes);
        let mut kf = keyframes.remove(src);
        kf.time = to;
        match keyframes.binary_search_by(|k| k.time.total_cmp(&to)) {
            Ok(dst) => keyframes[dst] = kf,
            Err(dst) => keyframes.insert(dst, kf),
        }
        Ok(true)
    }

    /// Snapshot of all keyframes in ascending time order
    pub fn keyframes(&self) -> KeyframeSnapshot<V> {
        KeyframeSnapshot {
            keyframes: Arc::clone(&self.keyframes),
        }
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// First keyframe
    pub fn first(&self) -> &Keyframe<V> {
        &self.keyframes[0]
    }

    /// Last keyframe
    pub fn last(&self) -> &Keyframe<V> {
        &self.keyframes[self.keyframes.len() - 1]
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.last().time
    }

    /// Times of all keyframes in ascending order
    pub fn keyframe_times(&self) -> impl Iterator<Item = f32> + '_ {
        self.keyframes.iter().map(|k| k.time)
    }

    /// Get keyframe at exactly `time`
    pub fn keyframe_at(&self, time: f32) -> Option<&Keyframe<V>> {
        self.search(time).ok().map(|idx| &self.keyframes[idx])
    }

    /// Get keyframes in the inclusive range `[start, end]`
    pub fn keyframes_in_range(&self, start: f32, end: f32) -> &[Keyframe<V>] {
        let lo = self.keyframes.partition_point(|k| k.time < start);
        let hi = self.keyframes.partition_point(|k| k.time <= end);
        if lo >= hi {
            return &[];
        }
        &self.keyframes[lo..hi]
    }

    /// Get nearest keyframe to time (the earlier one on a tie)
    pub fn nearest_keyframe(&self, time: f32) -> &Keyframe<V> {
        let next = self.keyframes.partition_point(|k| k.time < time);
        if next == 0 {
            return self.first();
        }
        if next == self.keyframes.len() {
            return self.last();
        }
        let (before, after) = (&self.keyframes[next - 1], &self.keyframes[next]);
        if after.time - time < time - before.time {
            after
        } else {
            before
        }
    }

    /// Time of the first keyframe strictly after `time`
    pub fn next_keyframe_time(&self, time: f32) -> Option<f32> {
        let idx = self.keyframes.partition_point(|k| k.time <= time);
        self.keyframes.get(idx).map(|k| k.time)
    }

    /// Time of the last keyframe strictly before `time`
    pub fn previous_keyframe_time(&self, time: f32) -> Option<f32> {
        let idx = self.keyframes.partition_point(|k| k.time < time);
        idx.checked_sub(1).map(|i| self.keyframes[i].time)
    }

    /// Evaluate the track at `time`.
    ///
    /// Times outside the keyframe range hold the first or last value, and
    /// a time that hits a keyframe returns its value unchanged. A NaN time
    /// yields the first value; use [`Track::try_value_at`] to reject it.
    pub fn value_at(&self, time: f32) -> V {
        let keyframes = self.keyframes.as_slice();
        let first = self.first();
        let last = self.last();

        if time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // first.time < time < last.time, so 1 <= next < len
        let next = keyframes.partition_point(|k| k.time <= time);
        let (a, b) = (&keyframes[next - 1], &keyframes[next]);
        if a.time == time || a.interpolation == InterpolationMode::Constant {
            return a.value;
        }

        let t = (time - a.time) / (b.time - a.time);
        V::blend(&a.value, &b.value, a.interpolation.ease(t), &self.options)
    }

    /// Evaluate the track, rejecting a non-finite time
    pub fn try_value_at(&self, time: f32) -> Result<V> {
        if !time.is_finite() {
            return Err(TimelineError::InvalidValue(format!(
                "query time {time} is not finite"
            )));
        }
        Ok(self.value_at(time))
    }
}

/// Read-only view of a track's keyframes at one point in time.
///
/// Iterating is lazy and can be repeated; later edits to the track are
/// not visible through an existing snapshot.
#[derive(Debug, Clone)]
pub struct KeyframeSnapshot<V> {
    keyframes: Arc<Vec<Keyframe<V>>>,
}

impl<V> KeyframeSnapshot<V> {
    /// Iterate the keyframes in ascending time order
    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe<V>> {
        self.keyframes.iter()
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false; tracks are never empty
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Keyframes as a slice
    pub fn as_slice(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }
}

impl<'a, V> IntoIterator for &'a KeyframeSnapshot<V> {
    type Item = &'a Keyframe<V>;
    type IntoIter = std::slice::Iter<'a, Keyframe<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Serialize)]
struct TrackRef<'a, V> {
    keyframes: &'a [Keyframe<V>],
    options: BlendOptions,
}

#[derive(Deserialize)]
struct TrackData<V> {
    keyframes: Vec<Keyframe<V>>,
    #[serde(default)]
    options: BlendOptions,
}

impl<V: Animatable> Serialize for Track<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        TrackRef {
            keyframes: self.keyframes.as_slice(),
            options: self.options,
        }
        .serialize(serializer)
    }
}

impl<'de, V: Animatable> Deserialize<'de> for Track<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let data = TrackData::<V>::deserialize(deserializer)?;
        Track::from_keyframes(data.keyframes, data.options).map_err(serde::de::Error::custom)
    }
}

/// Track of any value kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyTrack {
    /// Scalar track
    Scalar(Track<f32>),
    /// Point track
    Point(Track<Point>),
    /// Size track
    Size(Track<Size>),
    /// Rotation track
    Rotation(Track<Angle>),
    /// Color track
    Color(Track<Color>),
    /// Opacity track
    Opacity(Track<Opacity>),
}

macro_rules! with_track {
    ($any:expr, $track:ident => $body:expr) => {
        match $any {
            AnyTrack::Scalar($track) => $body,
            AnyTrack::Point($track) => $body,
            AnyTrack::Size($track) => $body,
            AnyTrack::Rotation($track) => $body,
            AnyTrack::Color($track) => $body,
            AnyTrack::Opacity($track) => $body,
        }
    };
}

fn narrow_value<V: Animatable>(value: KeyframeValue) -> Result<V> {
    let found = value.kind();
    V::from_value(value).ok_or(TimelineError::TypeConflict {
        expected: V::KIND,
        found,
    })
}

impl AnyTrack {
    /// Create a track seeded with `initial` at time 0; its kind is the value's kind
    pub fn seeded(initial: KeyframeValue, options: BlendOptions) -> Result<Self> {
        Ok(match initial {
            KeyframeValue::Scalar(v) => Self::Scalar(Track::with_options(v, options)?),
            KeyframeValue::Point(v) => Self::Point(Track::with_options(v, options)?),
            KeyframeValue::Size(v) => Self::Size(Track::with_options(v, options)?),
            KeyframeValue::Rotation(v) => Self::Rotation(Track::with_options(v, options)?),
            KeyframeValue::Color(v) => Self::Color(Track::with_options(v, options)?),
            KeyframeValue::Opacity(v) => Self::Opacity(Track::with_options(v, options)?),
        })
    }

    /// Value kind this track holds
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

    /// Narrow to a typed track
    pub fn as_track<V: Animatable>(&self) -> Result<&Track<V>> {
        V::track_ref(self).ok_or(TimelineError::TypeConflict {
            expected: self.kind(),
            found: V::KIND,
        })
    }

    /// Narrow to a typed track mutably
    pub fn as_track_mut<V: Animatable>(&mut self) -> Result<&mut Track<V>> {
        let kind = self.kind();
        V::track_mut(self).ok_or(TimelineError::TypeConflict {
            expected: kind,
            found: V::KIND,
        })
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        with_track!(self, t => t.keyframe_count())
    }

    /// Times of all keyframes in ascending order
    pub fn keyframe_times(&self) -> Vec<f32> {
        with_track!(self, t => t.keyframe_times().collect())
    }

    /// Whether a keyframe sits at exactly `time`
    pub fn has_keyframe_at(&self, time: f32) -> bool {
        with_track!(self, t => t.keyframe_at(time).is_some())
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f32 {
        with_track!(self, t => t.duration())
    }

    /// Time of the first keyframe strictly after `time`
    pub fn next_keyframe_time(&self, time: f32) -> Option<f32> {
        with_track!(self, t => t.next_keyframe_time(time))
    }

    /// Time of the last keyframe strictly before `time`
    pub fn previous_keyframe_time(&self, time: f32) -> Option<f32> {
        with_track!(self, t => t.previous_keyframe_time(time))
    }

    /// Blend options used for evaluation
    pub fn options(&self) -> BlendOptions {
        with_track!(self, t => t.options())
    }

    /// Replace the blend options
    pub fn set_options(&mut self, options: BlendOptions) {
        with_track!(self, t => t.set_options(options));
    }

    /// Evaluate the track at `time`
    pub fn value_at(&self, time: f32) -> KeyframeValue {
        with_track!(self, t => t.value_at(time).into_value())
    }

    /// Evaluate the track, rejecting a non-finite time
    pub fn try_value_at(&self, time: f32) -> Result<KeyframeValue> {
        with_track!(self, t => t.try_value_at(time).map(Animatable::into_value))
    }

    /// Insert or replace a keyframe; the value must match the track's kind
    pub fn add_keyframe(
        &mut self,
        time: f32,
        value: KeyframeValue,
        mode: Option<InterpolationMode>,
    ) -> Result<()> {
        with_track!(self, t => {
            let value = narrow_value(value)?;
            match mode {
                Some(mode) => t.add_keyframe_with(time, value, mode),
                None => t.add_keyframe(time, value),
            }
        })
    }

    /// Remove the keyframe at exactly `time`; returns whether one was removed
    pub fn remove_keyframe(&mut self, time: f32) -> Result<bool> {
        with_track!(self, t => t.remove_keyframe(time).map(|removed| removed.is_some()))
    }

    /// Move the keyframe at `from` to `to`
    pub fn move_keyframe(&mut self, from: f32, to: f32) -> Result<bool> {
        with_track!(self, t => t.move_keyframe(from, to))
    }

    /// Change the interpolation mode of the keyframe at `time`
    pub fn set_interpolation(&mut self, time: f32, mode: InterpolationMode) -> Result<bool> {
        with_track!(self, t => t.set_interpolation(time, mode))
    }
}

impl<V: Animatable> From<Track<V>> for AnyTrack {
    fn from(track: Track<V>) -> Self {
        V::into_any(track)
    }
}
