//! Frame sinks and capture errors.

use crate::settings::RecordingSettings;
use glam::Mat4;
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while recording.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Already recording")]
    AlreadyRecording,

    #[error("Not recording")]
    NotRecording,

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Sink failed: {0}")]
    Sink(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One tracking frame offered to the recorder.
#[derive(Debug, Clone)]
pub struct TrackedFrame {
    /// Seconds on the tracking session clock.
    pub timestamp: f64,
    /// Camera-to-world transform at capture time.
    pub camera_transform: Mat4,
    /// Captured image, if the tracking source provides pixels.
    pub image: Option<RgbImage>,
}

impl TrackedFrame {
    pub fn new(timestamp: f64, camera_transform: Mat4) -> Self {
        Self {
            timestamp,
            camera_transform,
            image: None,
        }
    }

    pub fn with_image(timestamp: f64, camera_transform: Mat4, image: RgbImage) -> Self {
        Self {
            timestamp,
            camera_transform,
            image: Some(image),
        }
    }
}

/// Destination for admitted frames, e.g. a video writer.
///
/// `begin` is called once per recording, before the first admitted frame,
/// with the gate threshold as the session start time.
pub trait FrameSink {
    fn begin(&mut self, settings: &RecordingSettings, start_time: f64) -> Result<(), CaptureError>;

    fn append(&mut self, frame: &TrackedFrame) -> Result<(), CaptureError>;

    fn finish(&mut self) -> Result<(), CaptureError>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn begin(&mut self, settings: &RecordingSettings, start_time: f64) -> Result<(), CaptureError> {
        (**self).begin(settings, start_time)
    }

    fn append(&mut self, frame: &TrackedFrame) -> Result<(), CaptureError> {
        (**self).append(frame)
    }

    fn finish(&mut self) -> Result<(), CaptureError> {
        (**self).finish()
    }
}

/// Sink that keeps frames in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub start_time: Option<f64>,
    pub frames: Vec<TrackedFrame>,
    pub finished: bool,
}

impl FrameSink for MemorySink {
    fn begin(
        &mut self,
        _settings: &RecordingSettings,
        start_time: f64,
    ) -> Result<(), CaptureError> {
        self.start_time = Some(start_time);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn append(&mut self, frame: &TrackedFrame) -> Result<(), CaptureError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CaptureError> {
        self.finished = true;
        Ok(())
    }
}

/// Sink writing every admitted frame that carries an image as a numbered PNG.
///
/// Each recording gets its own `take_NNN` directory under the root.
#[derive(Debug)]
pub struct ImageSequenceSink {
    root: PathBuf,
    take: u32,
    current: Option<PathBuf>,
    written: u64,
}

impl ImageSequenceSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            take: 0,
            current: None,
            written: 0,
        }
    }

    /// Directory of the recording in progress.
    pub fn current_dir(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Images written in the current or last recording.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for ImageSequenceSink {
    fn begin(&mut self, settings: &RecordingSettings, start_time: f64) -> Result<(), CaptureError> {
        self.take += 1;
        let dir = self.root.join(format!("take_{:03}", self.take));
        std::fs::create_dir_all(&dir)?;
        debug!(
            "Image sequence at {} ({}, session start {:.3}s)",
            dir.display(),
            settings.details(),
            start_time
        );
        self.current = Some(dir);
        self.written = 0;
        Ok(())
    }

    fn append(&mut self, frame: &TrackedFrame) -> Result<(), CaptureError> {
        let dir = self
            .current
            .as_ref()
            .ok_or_else(|| CaptureError::Sink("append before begin".to_string()))?;
        let Some(image) = &frame.image else {
            trace!("Frame at {:.3}s has no image, skipping", frame.timestamp);
            return Ok(());
        };
        image.save(dir.join(format!("frame_{:06}.png", self.written)))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CaptureError> {
        if let Some(dir) = self.current.take() {
            debug!("Finished image sequence: {} frames in {}", self.written, dir.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_sequence_requires_begin() {
        let mut sink = ImageSequenceSink::new(std::env::temp_dir());
        let frame = TrackedFrame::new(0.0, Mat4::IDENTITY);
        assert!(matches!(sink.append(&frame), Err(CaptureError::Sink(_))));
    }

    #[test]
    fn test_image_sequence_writes_pngs() {
        let root = std::env::temp_dir().join(format!("jord-capture-{}", uuid::Uuid::new_v4()));
        let mut sink = ImageSequenceSink::new(&root);

        sink.begin(&RecordingSettings::default(), 1.0).unwrap();
        let dir = sink.current_dir().unwrap().to_path_buf();
        sink.append(&TrackedFrame::with_image(1.0, Mat4::IDENTITY, RgbImage::new(4, 4)))
            .unwrap();
        sink.append(&TrackedFrame::new(1.1, Mat4::IDENTITY)).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.written(), 1);
        assert!(dir.join("frame_000000.png").exists());
        assert!(!dir.join("frame_000001.png").exists());
        assert!(sink.current_dir().is_none());

        std::fs::remove_dir_all(root).unwrap();
    }
}
