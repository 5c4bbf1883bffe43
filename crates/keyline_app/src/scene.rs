// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene files: the elements to animate and their keyframes.
//!
//! ```ron
//! (
//!     duration: Some(4.0),
//!     elements: [
//!         (
//!             name: "box",
//!             initial: {
//!                 Position: Point((x: 200.0, y: 300.0)),
//!                 Rotation: Rotation(45.0),
//!             },
//!             keyframes: [
//!                 (property: Position, time: 2.0, value: Point((x: 300.0, y: 400.0))),
//!                 (property: Rotation, time: 2.0, value: Rotation(90.0), interpolation: EaseInOut),
//!             ],
//!         ),
//!     ],
//! )
//! ```

use crate::error::AppError;
use indexmap::IndexMap;
use keyline_timeline::{
    ElementProvider, EntityId, InterpolationMode, KeyframeValue, PropertyKind, Timeline,
    TimelineConfig, TimelineError, TrackId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A scene to play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Overrides the configured timeline duration
    #[serde(default)]
    pub duration: Option<f32>,
    /// Elements in the scene
    pub elements: Vec<SceneElement>,
}

/// An animatable element and its keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneElement {
    /// Runtime identity, assigned on load
    #[serde(skip)]
    pub id: EntityId,
    /// Element name used in the output
    pub name: String,
    /// Current property values; each becomes a track
    pub initial: IndexMap<PropertyKind, KeyframeValue>,
    /// Keyframes to apply after the tracks are seeded
    #[serde(default)]
    pub keyframes: Vec<SceneKeyframe>,
}

/// A keyframe on one of the element's properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneKeyframe {
    /// Animated property
    pub property: PropertyKind,
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: KeyframeValue,
    /// Interpolation mode to the next keyframe
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

impl ElementProvider for SceneElement {
    fn owner(&self) -> EntityId {
        self.id
    }

    fn initial_values(&self) -> Vec<(PropertyKind, KeyframeValue)> {
        self.initial.iter().map(|(p, v)| (*p, *v)).collect()
    }
}

impl Scene {
    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load a scene from file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_ron(&contents)?)
    }

    /// Seed a timeline with every element and apply the keyframes
    pub fn build_timeline(&self, config: TimelineConfig) -> Result<Timeline, TimelineError> {
        let mut timeline = Timeline::new(config)?;

        for element in &self.elements {
            timeline.create_tracks(element)?;
            for kf in &element.keyframes {
                let id = TrackId::new(element.id, kf.property);
                timeline.add_keyframe_with(id, kf.time, kf.value, kf.interpolation)?;
            }
            tracing::debug!(
                "Element {} seeded with {} keyframes",
                element.name,
                element.keyframes.len()
            );
        }

        Ok(timeline)
    }

    /// Names of all elements by entity
    pub fn element_names(&self) -> HashMap<EntityId, String> {
        self.elements
            .iter()
            .map(|e| (e.id, e.name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyline_timeline::{Angle, Point};

    const SCENE: &str = r#"(
        duration: Some(4.0),
        elements: [
            (
                name: "box",
                initial: {
                    Position: Point((x: 200.0, y: 300.0)),
                    Rotation: Rotation(45.0),
                },
                keyframes: [
                    (property: Position, time: 2.0, value: Point((x: 300.0, y: 400.0))),
                    (property: Rotation, time: 2.0, value: Rotation(90.0)),
                ],
            ),
            (
                name: "fade",
                initial: { Opacity: Opacity(1.0) },
            ),
        ],
    )"#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_ron(SCENE).unwrap();
        assert_eq!(scene.duration, Some(4.0));
        assert_eq!(scene.elements.len(), 2);
        assert_eq!(scene.elements[0].initial.len(), 2);
        assert_eq!(scene.elements[0].keyframes[1].interpolation, InterpolationMode::Linear);
        assert!(scene.elements[1].keyframes.is_empty());
        assert_ne!(scene.elements[0].id, scene.elements[1].id);
    }

    #[test]
    fn test_build_timeline() {
        let scene = Scene::from_ron(SCENE).unwrap();
        let config = TimelineConfig {
            duration: 4.0,
            ..TimelineConfig::default()
        };
        let mut timeline = scene.build_timeline(config).unwrap();
        assert_eq!(timeline.track_count(), 3);

        let element = scene.elements[0].id;
        timeline.seek(1.0).unwrap();
        assert_eq!(
            timeline.value_as::<Point>(TrackId::new(element, PropertyKind::Position)),
            Ok(Point::new(250.0, 350.0))
        );
        assert_eq!(
            timeline.value_as::<Angle>(TrackId::new(element, PropertyKind::Rotation)),
            Ok(Angle(67.5))
        );
    }

    #[test]
    fn test_demo_scene_builds() {
        let scene = Scene::from_ron(include_str!("../scenes/demo.ron")).unwrap();
        let config =
            TimelineConfig::from_ron(include_str!("../scenes/timeline.ron")).unwrap();
        let timeline = scene.build_timeline(config).unwrap();
        assert_eq!(timeline.track_count(), 6);
        assert_eq!(timeline.all_keyframe_times(), vec![0.0, 1.0, 1.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_mismatched_keyframe_is_rejected() {
        let scene = Scene::from_ron(
            r#"(elements: [(
                name: "bad",
                initial: { Scale: Scalar(1.0) },
                keyframes: [(property: Scale, time: 1.0, value: Color((r: 1.0, g: 0.0, b: 0.0, a: 1.0)))],
            )])"#,
        )
        .unwrap();
        let result = scene.build_timeline(TimelineConfig::default());
        assert!(matches!(result, Err(TimelineError::TypeConflict { .. })));
    }

    #[test]
    fn test_keyframe_for_missing_property() {
        let scene = Scene::from_ron(
            r#"(elements: [(
                name: "bad",
                initial: { Scale: Scalar(1.0) },
                keyframes: [(property: Opacity, time: 1.0, value: Opacity(0.0))],
            )])"#,
        )
        .unwrap();
        let result = scene.build_timeline(TimelineConfig::default());
        assert!(matches!(result, Err(TimelineError::UnknownTrack(_))));
    }
}
