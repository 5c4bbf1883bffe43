// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline owning every track and the seek cursor.

use crate::binding::{EntityId, TrackId};
use crate::config::{check_frame_span, TimelineConfig};
use crate::error::{checked_time, Result, TimelineError};
use crate::interpolation::Animatable;
use crate::keyframe::InterpolationMode;
use crate::provider::ElementProvider;
use crate::track::{AnyTrack, Track};
use crate::value::KeyframeValue;
use indexmap::IndexMap;

/// Tolerance for time-to-frame conversion so `frame_to_time(n)` maps back to `n`
const FRAME_EPSILON: f32 = 1e-3;

/// Registry of animation tracks with a shared time cursor.
///
/// The timeline is the sole owner of its tracks; hosts keep [`TrackId`]s
/// and read values after each [`Timeline::seek`]. Evaluation is lazy, so
/// seeking only moves the cursor.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Tracks in creation order
    tracks: IndexMap<TrackId, AnyTrack>,
    /// Seek cursor, always within `[0, duration]`
    current_time: f32,
    config: TimelineConfig,
}

impl Timeline {
    /// Create an empty timeline from validated settings
    pub fn new(config: TimelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracks: IndexMap::new(),
            current_time: 0.0,
            config,
        })
    }

    /// Reset the timeline: drop all tracks, set the duration, rewind to 0
    pub fn setup(&mut self, duration: f32) -> Result<()> {
        let duration = checked_time(duration)?;
        check_frame_span(duration, self.config.frame_rate)?;
        tracing::debug!(
            "Timeline setup: duration {duration}s, dropping {} tracks",
            self.tracks.len()
        );
        self.tracks.clear();
        self.config.duration = duration;
        self.current_time = 0.0;
        Ok(())
    }

    /// Settings used for new tracks and frame conversion
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Timeline duration in seconds; keyframes may lie beyond it
    pub fn duration(&self) -> f32 {
        self.config.duration
    }

    /// Current seek position
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    fn build_track(&self, id: TrackId, initial: KeyframeValue) -> Result<AnyTrack> {
        if self.tracks.contains_key(&id) {
            return Err(TimelineError::DuplicateTrack(id));
        }
        let expected = id.property.value_kind();
        if initial.kind() != expected {
            return Err(TimelineError::TypeConflict {
                expected,
                found: initial.kind(),
            });
        }
        AnyTrack::seeded(initial, self.config.blend_options())
    }

    /// Create a track seeded with `initial` at time 0.
    ///
    /// The value kind must match the property's kind.
    pub fn create_track(&mut self, id: TrackId, initial: impl Into<KeyframeValue>) -> Result<()> {
        let track = self.build_track(id, initial.into())?;
        tracing::debug!("Created {} track {id}", track.kind());
        self.tracks.insert(id, track);
        Ok(())
    }

    /// Create one track per property offered by `element`.
    ///
    /// Either every track is created or none is.
    pub fn create_tracks(&mut self, element: &dyn ElementProvider) -> Result<Vec<TrackId>> {
        let owner = element.owner();
        let mut staged: Vec<(TrackId, AnyTrack)> = Vec::new();
        for (property, value) in element.initial_values() {
            let id = TrackId::new(owner, property);
            if staged.iter().any(|(staged_id, _)| *staged_id == id) {
                return Err(TimelineError::DuplicateTrack(id));
            }
            let track = self.build_track(id, value)?;
            staged.push((id, track));
        }

        tracing::debug!("Created {} tracks for entity {owner}", staged.len());
        let ids = staged.iter().map(|(id, _)| *id).collect();
        self.tracks.extend(staged);
        Ok(ids)
    }

    /// Whether a track is registered under `id`
    pub fn has_track(&self, id: TrackId) -> bool {
        self.tracks.contains_key(&id)
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Ids of all tracks in creation order
    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.keys().copied()
    }

    /// Tracks belonging to one entity
    pub fn tracks_for(&self, owner: EntityId) -> impl Iterator<Item = (TrackId, &AnyTrack)> + '_ {
        self.tracks
            .iter()
            .filter(move |(id, _)| id.owner == owner)
            .map(|(id, track)| (*id, track))
    }

    /// Get a track
    pub fn track(&self, id: TrackId) -> Result<&AnyTrack> {
        self.tracks.get(&id).ok_or(TimelineError::UnknownTrack(id))
    }

    /// Get a track narrowed to its value type
    pub fn track_as<V: Animatable>(&self, id: TrackId) -> Result<&Track<V>> {
        self.track(id)?.as_track()
    }

    fn track_mut(&mut self, id: TrackId) -> Result<&mut AnyTrack> {
        self.tracks.get_mut(&id).ok_or(TimelineError::UnknownTrack(id))
    }

    /// Insert a keyframe, or replace the value at an existing keyframe time
    pub fn add_keyframe(
        &mut self,
        id: TrackId,
        time: f32,
        value: impl Into<KeyframeValue>,
    ) -> Result<()> {
        self.track_mut(id)?.add_keyframe(time, value.into(), None)?;
        tracing::trace!("Keyframe set on {id} at {time}s");
        Ok(())
    }

    /// Insert or replace a keyframe together with its interpolation mode
    pub fn add_keyframe_with(
        &mut self,
        id: TrackId,
        time: f32,
        value: impl Into<KeyframeValue>,
        mode: InterpolationMode,
    ) -> Result<()> {
        self.track_mut(id)?.add_keyframe(time, value.into(), Some(mode))?;
        tracing::trace!("Keyframe set on {id} at {time}s ({mode:?})");
        Ok(())
    }

    /// Remove the keyframe at exactly `time`; returns whether one was removed
    pub fn remove_keyframe(&mut self, id: TrackId, time: f32) -> Result<bool> {
        let removed = self.track_mut(id)?.remove_keyframe(time)?;
        if removed {
            tracing::trace!("Keyframe removed from {id} at {time}s");
        }
        Ok(removed)
    }

    /// Move a keyframe to another time
    pub fn move_keyframe(&mut self, id: TrackId, from: f32, to: f32) -> Result<bool> {
        self.track_mut(id)?.move_keyframe(from, to)
    }

    /// Change the interpolation mode of the keyframe at `time`
    pub fn set_interpolation(
        &mut self,
        id: TrackId,
        time: f32,
        mode: InterpolationMode,
    ) -> Result<bool> {
        self.track_mut(id)?.set_interpolation(time, mode)
    }

    /// Remove a track
    pub fn remove_track(&mut self, id: TrackId) -> Result<AnyTrack> {
        let track = self
            .tracks
            .shift_remove(&id)
            .ok_or(TimelineError::UnknownTrack(id))?;
        tracing::debug!("Removed track {id}");
        Ok(track)
    }

    /// Remove every track of an entity; returns how many were removed
    pub fn remove_owner(&mut self, owner: EntityId) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|id, _| id.owner != owner);
        let removed = before - self.tracks.len();
        if removed > 0 {
            tracing::debug!("Removed {removed} tracks of entity {owner}");
        }
        removed
    }

    /// Move the cursor to `time`, clamped into `[0, duration]`.
    ///
    /// Returns the clamped time. Seeking to the same time twice produces
    /// identical values on every track.
    pub fn seek(&mut self, time: f32) -> Result<f32> {
        if !time.is_finite() {
            return Err(TimelineError::InvalidValue(format!(
                "seek time {time} is not finite"
            )));
        }
        let clamped = time.clamp(0.0, self.config.duration);
        // stored times never hold -0.0
        let clamped = if clamped == 0.0 { 0.0 } else { clamped };
        if clamped != time {
            tracing::trace!("Seek to {time}s clamped to {clamped}s");
        }
        self.current_time = clamped;
        Ok(clamped)
    }

    /// Value of a track at the cursor
    pub fn value(&self, id: TrackId) -> Result<KeyframeValue> {
        Ok(self.track(id)?.value_at(self.current_time))
    }

    /// Value of a track at an arbitrary time
    pub fn value_at(&self, id: TrackId, time: f32) -> Result<KeyframeValue> {
        self.track(id)?.try_value_at(time)
    }

    /// Typed value of a track at the cursor
    pub fn value_as<V: Animatable>(&self, id: TrackId) -> Result<V> {
        Ok(self.track_as::<V>(id)?.value_at(self.current_time))
    }

    /// Evaluate all tracks at the cursor, in creation order
    pub fn sample_all(&self) -> Vec<(TrackId, KeyframeValue)> {
        self.tracks
            .iter()
            .map(|(id, track)| (*id, track.value_at(self.current_time)))
            .collect()
    }

    /// Ascending, deduplicated keyframe times across all tracks
    pub fn all_keyframe_times(&self) -> Vec<f32> {
        let mut times: Vec<f32> = self
            .tracks
            .values()
            .flat_map(AnyTrack::keyframe_times)
            .collect();
        times.sort_by(f32::total_cmp);
        times.dedup();
        times
    }

    /// First keyframe time strictly after `time` on any track
    pub fn next_keyframe_time(&self, time: f32) -> Option<f32> {
        self.tracks
            .values()
            .filter_map(|track| track.next_keyframe_time(time))
            .min_by(f32::total_cmp)
    }

    /// Last keyframe time strictly before `time` on any track
    pub fn previous_keyframe_time(&self, time: f32) -> Option<f32> {
        self.tracks
            .values()
            .filter_map(|track| track.previous_keyframe_time(time))
            .max_by(f32::total_cmp)
    }

    /// Convert time to frame number
    pub fn time_to_frame(&self, time: f32) -> u32 {
        (time * self.config.frame_rate + FRAME_EPSILON).floor() as u32
    }

    /// Convert frame number to time
    pub fn frame_to_time(&self, frame: u32) -> f32 {
        frame as f32 / self.config.frame_rate
    }

    /// Number of frames covering `[0, duration]`
    pub fn frame_count(&self) -> u32 {
        self.time_to_frame(self.config.duration).saturating_add(1)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            tracks: IndexMap::new(),
            current_time: 0.0,
            config: TimelineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::PropertyKind;
    use crate::interpolation::RotationPath;
    use crate::value::{Angle, Color, Opacity, Point, Size, ValueKind};

    struct Rect {
        id: EntityId,
        origin: Point,
        size: Size,
        fill: Color,
    }

    impl ElementProvider for Rect {
        fn owner(&self) -> EntityId {
            self.id
        }

        fn initial_values(&self) -> Vec<(PropertyKind, KeyframeValue)> {
            vec![
                (PropertyKind::Position, self.origin.into()),
                (PropertyKind::Size, self.size.into()),
                (PropertyKind::Color, self.fill.into()),
                (PropertyKind::Opacity, Opacity(1.0).into()),
            ]
        }
    }

    fn rect() -> Rect {
        Rect {
            id: EntityId::new(),
            origin: Point::new(200.0, 300.0),
            size: Size::new(50.0, 80.0),
            fill: Color::WHITE,
        }
    }

    fn timeline() -> Timeline {
        let mut timeline = Timeline::default();
        timeline.setup(5.0).unwrap();
        timeline
    }

    #[test]
    fn test_setup_resets() {
        let mut timeline = timeline();
        let id = TrackId::new(EntityId::new(), PropertyKind::Scale);
        timeline.create_track(id, 1.0_f32).unwrap();
        timeline.seek(3.0).unwrap();

        timeline.setup(8.0).unwrap();
        assert_eq!(timeline.track_count(), 0);
        assert_eq!(timeline.current_time(), 0.0);
        assert_eq!(timeline.duration(), 8.0);

        assert_eq!(timeline.config().duration, 8.0);

        assert!(timeline.setup(f32::NAN).is_err());
        assert_eq!(timeline.duration(), 8.0);
    }

    #[test]
    fn test_setup_rejects_unframeable_duration() {
        let mut timeline = timeline();
        assert!(matches!(timeline.setup(2.0e8), Err(TimelineError::InvalidValue(_))));
        assert_eq!(timeline.duration(), 5.0);

        timeline.setup(1.0e8).unwrap();
        assert_eq!(timeline.frame_count(), 3_000_000_001);
    }

    #[test]
    fn test_create_track_checks() {
        let mut timeline = timeline();
        let id = TrackId::new(EntityId::new(), PropertyKind::Rotation);

        timeline.create_track(id, Angle(45.0)).unwrap();
        assert_eq!(timeline.create_track(id, Angle(0.0)), Err(TimelineError::DuplicateTrack(id)));

        let position = TrackId::new(id.owner, PropertyKind::Position);
        assert_eq!(
            timeline.create_track(position, 3.0_f32),
            Err(TimelineError::TypeConflict {
                expected: ValueKind::Point,
                found: ValueKind::Scalar,
            })
        );
        assert!(matches!(
            timeline.create_track(position, Point::new(f32::NAN, 0.0)),
            Err(TimelineError::InvalidValue(_))
        ));
        assert_eq!(timeline.track_count(), 1);
    }

    #[test]
    fn test_create_tracks_from_element() {
        let mut timeline = timeline();
        let element = rect();
        let ids = timeline.create_tracks(&element).unwrap();

        assert_eq!(ids.len(), 4);
        assert_eq!(timeline.tracks_for(element.id).count(), 4);
        assert_eq!(
            timeline.value(TrackId::new(element.id, PropertyKind::Size)).unwrap(),
            KeyframeValue::Size(Size::new(50.0, 80.0))
        );

        // A second attempt fails as a whole
        assert!(matches!(
            timeline.create_tracks(&element),
            Err(TimelineError::DuplicateTrack(_))
        ));
        assert_eq!(timeline.track_count(), 4);
    }

    #[test]
    fn test_create_tracks_is_atomic() {
        struct Broken(EntityId);

        impl ElementProvider for Broken {
            fn owner(&self) -> EntityId {
                self.0
            }

            fn initial_values(&self) -> Vec<(PropertyKind, KeyframeValue)> {
                vec![
                    (PropertyKind::Opacity, Opacity(0.5).into()),
                    (PropertyKind::Rotation, Point::new(0.0, 0.0).into()),
                ]
            }
        }

        let mut timeline = timeline();
        assert!(timeline.create_tracks(&Broken(EntityId::new())).is_err());
        assert_eq!(timeline.track_count(), 0);
    }

    #[test]
    fn test_unknown_track() {
        let mut timeline = timeline();
        let id = TrackId::new(EntityId::new(), PropertyKind::Opacity);

        assert_eq!(
            timeline.add_keyframe(id, 1.0, Opacity(0.0)),
            Err(TimelineError::UnknownTrack(id))
        );
        assert_eq!(timeline.track_count(), 0);
        assert!(!timeline.has_track(id));
        assert!(timeline.track(id).is_err());
        assert!(timeline.remove_track(id).is_err());
    }

    #[test]
    fn test_seek_clamps() {
        let mut timeline = timeline();
        assert_eq!(timeline.seek(-1.0), Ok(0.0));
        assert_eq!(timeline.seek(9.0), Ok(5.0));
        assert_eq!(timeline.seek(2.5), Ok(2.5));
        assert!(matches!(timeline.seek(f32::NAN), Err(TimelineError::InvalidValue(_))));
        assert_eq!(timeline.current_time(), 2.5);

        let time = timeline.seek(-0.0).unwrap();
        assert!(time.is_sign_positive());
        assert!(timeline.current_time().is_sign_positive());
    }

    #[test]
    fn test_keyframes_beyond_duration_are_kept() {
        let mut timeline = timeline();
        let id = TrackId::new(EntityId::new(), PropertyKind::Scale);
        timeline.create_track(id, 0.0_f32).unwrap();
        timeline.add_keyframe(id, 10.0, 10.0_f32).unwrap();

        assert_eq!(timeline.all_keyframe_times(), vec![0.0, 10.0]);
        timeline.seek(100.0).unwrap();
        assert_eq!(timeline.value_as::<f32>(id), Ok(5.0));
        assert_eq!(timeline.value_at(id, 10.0), Ok(KeyframeValue::Scalar(10.0)));
    }

    #[test]
    fn test_remove_owner() {
        let mut timeline = timeline();
        let a = rect();
        let b = rect();
        timeline.create_tracks(&a).unwrap();
        timeline.create_tracks(&b).unwrap();

        assert_eq!(timeline.remove_owner(a.id), 4);
        assert_eq!(timeline.track_count(), 4);
        assert!(timeline.tracks_for(a.id).next().is_none());
        assert_eq!(timeline.remove_owner(a.id), 0);
    }

    #[test]
    fn test_track_order_is_creation_order() {
        let mut timeline = timeline();
        let element = rect();
        let ids = timeline.create_tracks(&element).unwrap();
        timeline.remove_track(ids[1]).unwrap();

        let remaining: Vec<TrackId> = timeline.track_ids().collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
        let sampled: Vec<TrackId> = timeline.sample_all().into_iter().map(|(id, _)| id).collect();
        assert_eq!(sampled, remaining);
    }

    #[test]
    fn test_keyframe_navigation() {
        let mut timeline = timeline();
        let element = rect();
        timeline.create_tracks(&element).unwrap();
        let position = TrackId::new(element.id, PropertyKind::Position);
        let opacity = TrackId::new(element.id, PropertyKind::Opacity);
        timeline.add_keyframe(position, 2.0, Point::new(0.0, 0.0)).unwrap();
        timeline.add_keyframe(opacity, 1.0, Opacity(0.0)).unwrap();
        timeline.add_keyframe(opacity, 2.0, Opacity(1.0)).unwrap();

        assert_eq!(timeline.all_keyframe_times(), vec![0.0, 1.0, 2.0]);
        assert_eq!(timeline.next_keyframe_time(0.0), Some(1.0));
        assert_eq!(timeline.next_keyframe_time(2.0), None);
        assert_eq!(timeline.previous_keyframe_time(2.0), Some(1.0));
        assert_eq!(timeline.previous_keyframe_time(0.0), None);
    }

    #[test]
    fn test_remove_keyframe_through_timeline() {
        let mut timeline = timeline();
        let id = TrackId::new(EntityId::new(), PropertyKind::Scale);
        timeline.create_track(id, 1.0_f32).unwrap();
        timeline.add_keyframe(id, 1.0, 2.0_f32).unwrap();

        assert_eq!(timeline.remove_keyframe(id, 0.5), Ok(false));
        assert_eq!(timeline.remove_keyframe(id, 1.0), Ok(true));
        assert_eq!(timeline.remove_keyframe(id, 0.0), Err(TimelineError::CannotEmptyTrack));
    }

    #[test]
    fn test_config_drives_new_tracks() {
        let config = TimelineConfig {
            rotation: RotationPath::Shortest,
            ..TimelineConfig::default()
        };
        let mut timeline = Timeline::new(config).unwrap();
        let id = TrackId::new(EntityId::new(), PropertyKind::Rotation);
        timeline.create_track(id, Angle(350.0)).unwrap();
        timeline.add_keyframe(id, 2.0, Angle(10.0)).unwrap();
        timeline.seek(1.0).unwrap();

        let angle = timeline.value_as::<Angle>(id).unwrap();
        assert!((angle.0 - 360.0).abs() < 1e-4);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = TimelineConfig {
            frame_rate: -1.0,
            ..TimelineConfig::default()
        };
        assert!(Timeline::new(config).is_err());
    }

    #[test]
    fn test_frames() {
        let timeline = timeline();
        assert_eq!(timeline.frame_to_time(15), 0.5);
        assert_eq!(timeline.time_to_frame(0.5), 15);
        assert_eq!(timeline.time_to_frame(0.1), 3);
        assert_eq!(timeline.frame_count(), 151);
        for frame in 0..150 {
            assert_eq!(timeline.time_to_frame(timeline.frame_to_time(frame)), frame);
        }
    }
}
