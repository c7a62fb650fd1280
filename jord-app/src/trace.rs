//! Recorded tracking traces
//!
//! A trace is a JSON document listing, in delivery order, everything a
//! tracking session reported plus the user actions taken during it.

use glam::{Mat4, Vec3};
use jord_data::RawGeometry;
use jord_scan::{AnchorEvent, AnchorId, MeshAnchor};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

fn identity() -> [f32; 16] {
    Mat4::IDENTITY.to_cols_array()
}

/// Anchor payload as stored in a trace: positions and triangles in anchor
/// space, plus a column-major model-to-world transform.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceAnchor {
    pub id: AnchorId,
    #[serde(default)]
    pub vertices: Vec<[f32; 3]>,
    #[serde(default)]
    pub faces: Vec<[u32; 3]>,
    #[serde(default = "identity")]
    pub transform: [f32; 16],
}

impl TraceAnchor {
    pub fn to_mesh_anchor(&self) -> MeshAnchor {
        let positions: Vec<Vec3> = self.vertices.iter().copied().map(Vec3::from_array).collect();
        MeshAnchor::new(
            self.id,
            RawGeometry::from_positions(&positions, &self.faces),
            Mat4::from_cols_array(&self.transform),
        )
    }
}

/// One step of a trace.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    StartScan,
    StopScan,
    ClearScan,
    Wireframe {
        visible: bool,
    },
    AnchorAdded(TraceAnchor),
    AnchorUpdated(TraceAnchor),
    AnchorRemoved {
        id: AnchorId,
    },
    AnchorsCleared,
    StartRecording {
        timestamp: f64,
    },
    StopRecording,
    Frame {
        timestamp: f64,
        #[serde(default = "identity")]
        camera: [f32; 16],
        /// PNG to use as the frame's pixels, relative to the trace file.
        #[serde(default)]
        image: Option<PathBuf>,
    },
}

impl TraceEvent {
    /// The anchor event this step carries, if it is one.
    pub fn anchor_event(&self) -> Option<AnchorEvent> {
        match self {
            TraceEvent::AnchorAdded(anchor) => Some(AnchorEvent::Added(anchor.to_mesh_anchor())),
            TraceEvent::AnchorUpdated(anchor) => {
                Some(AnchorEvent::Updated(anchor.to_mesh_anchor()))
            }
            TraceEvent::AnchorRemoved { id } => Some(AnchorEvent::Removed(*id)),
            TraceEvent::AnchorsCleared => Some(AnchorEvent::Cleared),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
