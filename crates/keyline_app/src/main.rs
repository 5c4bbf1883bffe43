// SPDX-License-Identifier: MIT OR Apache-2.0
//! `keyline` - scene player for the Keyline timeline.
//!
//! Loads a RON scene, seeds one track per element property, applies the
//! scene's keyframes, then seeks frame by frame and prints every sampled
//! value as one JSON or RON line per frame.
//!
//! Logs go to stderr so stdout stays machine readable.

mod args;
mod error;
mod sampler;
mod scene;

use args::Args;
use clap::Parser;
use error::AppError;
use keyline_timeline::TimelineConfig;
use scene::Scene;
use std::io::Write;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "keyline={default_level},keyline_app={default_level},keyline_timeline={default_level}"
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Keyline v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        tracing::error!("keyline failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => TimelineConfig::load(path)?,
        None => TimelineConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.frame_rate = fps;
    }

    let scene = Scene::load(&args.scene)?;
    if let Some(duration) = scene.duration {
        config.duration = duration;
    }

    let mut timeline = scene.build_timeline(config)?;
    tracing::info!(
        "Scene {} loaded: {} elements, {} tracks, {:.2}s",
        args.scene.display(),
        scene.elements.len(),
        timeline.track_count(),
        timeline.duration()
    );

    let times = sampler::sample_times(&timeline, args.keyframes_only);
    let names = scene.element_names();
    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    let written = sampler::write_samples(&mut timeline, &names, times, args.format, &mut out)?;
    out.flush()?;

    tracing::info!("Wrote {written} samples");
    Ok(())
}
