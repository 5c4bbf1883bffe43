// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Play a Keyline scene and print the sampled values of every frame
#[derive(Parser, Debug)]
#[command(name = "keyline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about, long_about = None)]
pub struct Args {
    /// Scene description (RON)
    pub scene: PathBuf,

    /// Timeline config (RON); defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured frame rate
    #[arg(long)]
    pub fps: Option<f32>,

    /// Output format for sampled frames
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Sample only at keyframe times instead of every frame
    #[arg(long)]
    pub keyframes_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Line format for sampled frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// One RON value per line
    Ron,
}
