// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track identifiers binding a track to an entity property.

use crate::value::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Entity ID for binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a fixed value
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Animatable property of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Position of the entity origin
    Position,
    /// Width and height
    Size,
    /// Rotation in degrees
    Rotation,
    /// Fill color
    Color,
    /// Opacity in `[0, 1]`
    Opacity,
    /// Uniform scale factor
    Scale,
}

impl PropertyKind {
    /// Every property kind, in display order
    pub const ALL: [PropertyKind; 6] = [
        Self::Position,
        Self::Size,
        Self::Rotation,
        Self::Color,
        Self::Opacity,
        Self::Scale,
    ];

    /// Value kind tracks of this property hold
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Position => ValueKind::Point,
            Self::Size => ValueKind::Size,
            Self::Rotation => ValueKind::Rotation,
            Self::Color => ValueKind::Color,
            Self::Opacity => ValueKind::Opacity,
            Self::Scale => ValueKind::Scalar,
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Size => "size",
            Self::Rotation => "rotation",
            Self::Color => "color",
            Self::Opacity => "opacity",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a track: one property of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId {
    /// Entity owning the animated property
    pub owner: EntityId,
    /// Property being animated
    pub property: PropertyKind,
}

impl TrackId {
    /// Create a track ID
    pub fn new(owner: EntityId, property: PropertyKind) -> Self {
        Self { owner, property }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_track_id_is_structured() {
        let a = EntityId::from_u128(1);
        let b = EntityId::from_u128(2);

        let ids: HashSet<TrackId> = [
            TrackId::new(a, PropertyKind::Position),
            TrackId::new(a, PropertyKind::Size),
            TrackId::new(b, PropertyKind::Position),
            TrackId::new(a, PropertyKind::Position),
        ]
        .into_iter()
        .collect();

        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_display() {
        let id = TrackId::new(EntityId::from_u128(0), PropertyKind::Rotation);
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000/rotation");
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(PropertyKind::Position.value_kind(), ValueKind::Point);
        assert_eq!(PropertyKind::Opacity.value_kind(), ValueKind::Opacity);
        assert_eq!(PropertyKind::Scale.value_kind(), ValueKind::Scalar);
        assert_eq!(PropertyKind::ALL.len(), 6);
    }
}
