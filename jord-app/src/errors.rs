//! Error types for the replay application.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trace parse error: {0}")]
    Trace(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] jord_scan::ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] jord_capture::CaptureError),

    #[error("Anchor feed error: {0}")]
    Feed(#[from] jord_scan::FeedError),

    #[error("Failed to load frame image {path}: {source}")]
    FrameImage {
        path: String,
        #[source]
        source: image::ImageError,
    },
}
