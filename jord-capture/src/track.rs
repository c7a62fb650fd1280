//! Camera pose track recorded alongside admitted frames

use crate::sink::CaptureError;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Camera pose at one admitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub timestamp: f64,
    /// Camera-to-world matrix, column-major.
    pub transform: [f32; 16],
}

impl PoseSample {
    pub fn new(timestamp: f64, transform: Mat4) -> Self {
        Self {
            timestamp,
            transform: transform.to_cols_array(),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.transform)
    }
}

/// Ordered camera poses of one recording.
///
/// Serializes as a plain JSON array of `{ "timestamp", "transform" }` objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformTrack {
    samples: Vec<PoseSample>,
}

impl TransformTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timestamp: f64, transform: Mat4) {
        self.samples.push(PoseSample::new(timestamp, transform));
    }

    pub fn samples(&self) -> &[PoseSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Seconds between the first and last sample.
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), CaptureError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self, CaptureError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the track to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        info!("Camera transform data saved to: {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        Self::read_json(BufReader::new(File::open(path)?))
    }
}
