// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drives the timeline frame by frame and writes what a renderer would read.

use crate::args::OutputFormat;
use crate::error::AppError;
use keyline_timeline::{EntityId, KeyframeValue, PropertyKind, Timeline};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// Every track value at one seek position
#[derive(Debug, Serialize)]
pub struct FrameSample<'a> {
    /// Frame number
    pub frame: u32,
    /// Seek time in seconds
    pub time: f32,
    /// Sampled values in track order
    pub values: Vec<PropertySample<'a>>,
}

/// One track value
#[derive(Debug, Serialize)]
pub struct PropertySample<'a> {
    /// Element name
    pub element: &'a str,
    /// Animated property
    pub property: PropertyKind,
    /// Value at the seek time
    pub value: KeyframeValue,
}

/// Seek times to sample: every frame, or only keyframe times within the duration.
///
/// Frame times are produced lazily, so long timelines never materialize
/// their whole frame range.
pub fn sample_times(timeline: &Timeline, keyframes_only: bool) -> Box<dyn Iterator<Item = f32>> {
    let duration = timeline.duration();
    if keyframes_only {
        let times = timeline.all_keyframe_times();
        return Box::new(times.into_iter().filter(move |t| *t <= duration));
    }
    let frame_rate = timeline.config().frame_rate;
    Box::new(
        (0..timeline.frame_count()).map(move |frame| (frame as f32 / frame_rate).min(duration)),
    )
}

/// Seek to each time and write one line per sample; returns the line count
pub fn write_samples<W: Write>(
    timeline: &mut Timeline,
    names: &HashMap<EntityId, String>,
    times: impl IntoIterator<Item = f32>,
    format: OutputFormat,
    out: &mut W,
) -> Result<usize, AppError> {
    let mut written = 0;
    for time in times {
        let time = timeline.seek(time)?;
        let values = timeline
            .sample_all()
            .into_iter()
            .map(|(id, value)| PropertySample {
                element: names.get(&id.owner).map_or("?", String::as_str),
                property: id.property,
                value,
            })
            .collect();
        let sample = FrameSample {
            frame: timeline.time_to_frame(time),
            time,
            values,
        };

        match format {
            OutputFormat::Json => serde_json::to_writer(&mut *out, &sample)?,
            OutputFormat::Ron => out.write_all(ron::to_string(&sample)?.as_bytes())?,
        }
        writeln!(out)?;
        written += 1;
    }
    Ok(written)
}
