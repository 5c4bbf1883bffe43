// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors surfaced by the scene player.

use keyline_timeline::TimelineError;

/// Error type for the scene player
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Reading a file or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene file is not valid RON
    #[error("Scene parse error: {0}")]
    Scene(#[from] ron::error::SpannedError),

    /// Timeline rejected the scene
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON output failed
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),
}
