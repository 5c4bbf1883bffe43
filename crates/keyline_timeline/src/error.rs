// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline errors.
//!
//! Every failure is recoverable. Operations that return an error leave the
//! timeline and its tracks exactly as they were before the call.

use crate::binding::TrackId;
use crate::value::ValueKind;

/// Error raised by track and timeline operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// No track is registered under this id
    #[error("Unknown track: {0}")]
    UnknownTrack(TrackId),

    /// A track is already registered under this id
    #[error("Duplicate track: {0}")]
    DuplicateTrack(TrackId),

    /// A value or track of the wrong kind was supplied or requested
    #[error("Type conflict: expected {expected}, found {found}")]
    TypeConflict {
        /// Kind the track (or property) holds
        expected: ValueKind,
        /// Kind that was supplied or requested
        found: ValueKind,
    },

    /// A time or value is non-finite or outside its domain
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Removing the keyframe would leave the track empty
    #[error("Cannot remove the only keyframe of a track")]
    CannotEmptyTrack,
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Validate a keyframe or seek time, folding `-0.0` into `0.0`.
pub(crate) fn checked_time(time: f32) -> Result<f32> {
    if !time.is_finite() || time < 0.0 {
        return Err(TimelineError::InvalidValue(format!(
            "time {time} must be finite and non-negative"
        )));
    }
    Ok(if time == 0.0 { 0.0 } else { time })
}
