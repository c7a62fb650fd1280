//! Anchor identities and events from the tracking subsystem

use glam::Mat4;
use jord_data::RawGeometry;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a tracked surface patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(Uuid);

impl AnchorId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AnchorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One mesh anchor as delivered by tracking: identity, anchor-local
/// geometry, and its model-to-world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAnchor {
    pub id: AnchorId,
    pub geometry: RawGeometry,
    pub transform: Mat4,
}

impl MeshAnchor {
    pub fn new(id: AnchorId, geometry: RawGeometry, transform: Mat4) -> Self {
        Self {
            id,
            geometry,
            transform,
        }
    }
}

/// A single change reported by the tracking feed.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorEvent {
    Added(MeshAnchor),
    Updated(MeshAnchor),
    Removed(AnchorId),
    /// Drop every surface, e.g. when a scan is discarded.
    Cleared,
}

impl AnchorEvent {
    /// The anchor this event concerns, if any.
    pub fn anchor_id(&self) -> Option<AnchorId> {
        match self {
            AnchorEvent::Added(anchor) | AnchorEvent::Updated(anchor) => Some(anchor.id),
            AnchorEvent::Removed(id) => Some(*id),
            AnchorEvent::Cleared => None,
        }
    }
}
