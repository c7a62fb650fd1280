//! Jord Application
//!
//! Replays a recorded tracking trace through the live-scan pipeline:
//! anchor events feed the mesh buffer, frames go through the capture gate
//! into a recording, and the results can be written out for inspection.

mod app;
mod errors;
mod trace;

use clap::Parser;
use jord_capture::{FrameRate, VideoCodec, VideoResolution};
use std::path::PathBuf;

/// Jord - live surface scan and recording replay
#[derive(Parser, Debug)]
#[command(name = "jord")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON tracking trace to replay
    pub trace: PathBuf,

    /// Scan config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the capture delay in seconds
    #[arg(long)]
    pub delay: Option<f64>,

    /// Recording resolution (1080p, 4k)
    #[arg(long)]
    pub resolution: Option<VideoResolution>,

    /// Recording frame rate (30, 60)
    #[arg(long)]
    pub fps: Option<FrameRate>,

    /// Recording codec (h264, prores)
    #[arg(long)]
    pub codec: Option<VideoCodec>,

    /// Directory to write camera transform tracks to, one file per recording
    #[arg(long)]
    pub transforms_out: Option<PathBuf>,

    /// Write the final merged scan mesh as JSON
    #[arg(long)]
    pub mesh_out: Option<PathBuf>,

    /// Write captured frame images as PNG sequences under this directory
    #[arg(long)]
    pub frames_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    if let Err(e) = app::run(&args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
