//! Incremental mesh buffer fed by anchor events

use crate::ingest::{AnchorEvent, AnchorId, MeshAnchor};
use crate::mesh::{MeshRegistry, MeshSnapshot};
use glam::Mat4;
use jord_data::{GeometryError, RawGeometry, extract_surface};
use std::sync::mpsc::Receiver;
use tracing::{debug, trace, warn};

/// What applying one event did to the buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingest {
    /// A surface was stored for an anchor seen for the first time.
    Inserted,
    /// An existing anchor's surface was swapped for a new one.
    Replaced,
    /// An anchor's surface was deleted.
    Removed,
    /// Every surface was dropped; holds how many there were.
    Cleared(usize),
    /// The event had nothing to act on.
    Ignored,
    /// The geometry could not be extracted and the event was discarded.
    Dropped(GeometryError),
}

impl Ingest {
    /// True if the set of surfaces changed.
    pub fn changed(&self) -> bool {
        match self {
            Ingest::Inserted | Ingest::Replaced | Ingest::Removed => true,
            Ingest::Cleared(count) => *count > 0,
            Ingest::Ignored | Ingest::Dropped(_) => false,
        }
    }
}

/// Render-ready view of all tracked surface patches.
///
/// Mutations are expected from the single tracking callback stream, in
/// order. [`MeshBuffer::snapshot`] may run concurrently from a render
/// thread. Nothing here fails loudly: bad geometry is logged and dropped
/// so one broken anchor never stalls the frame loop.
#[derive(Debug, Default)]
pub struct MeshBuffer {
    registry: MeshRegistry,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract and store the surface for a newly seen anchor.
    pub fn on_anchor_added(&self, id: AnchorId, geometry: &RawGeometry, transform: Mat4) -> Ingest {
        self.store(id, geometry, transform, "add")
    }

    /// Re-extract and replace the surface for `id`, or insert it if unseen.
    pub fn on_anchor_updated(
        &self,
        id: AnchorId,
        geometry: &RawGeometry,
        transform: Mat4,
    ) -> Ingest {
        self.store(id, geometry, transform, "update")
    }

    /// Forget the surface for `id`. Removing an unknown anchor is a no-op.
    pub fn on_anchor_removed(&self, id: AnchorId) -> Ingest {
        if self.registry.remove(&id) {
            debug!(anchor = %id, "Removed mesh anchor");
            Ingest::Removed
        } else {
            trace!(anchor = %id, "Removal for unknown anchor ignored");
            Ingest::Ignored
        }
    }

    /// Empty the buffer, e.g. when a scan is discarded and restarted.
    pub fn clear_all(&self) -> Ingest {
        let count = self.registry.clear();
        if count > 0 {
            debug!("Cleared {} mesh anchors", count);
        }
        Ingest::Cleared(count)
    }

    /// Current surfaces in first-observation order.
    pub fn snapshot(&self) -> MeshSnapshot {
        self.registry.snapshot()
    }

    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Apply one typed event from the tracking feed.
    pub fn apply(&self, event: &AnchorEvent) -> Ingest {
        match event {
            AnchorEvent::Added(MeshAnchor {
                id,
                geometry,
                transform,
            }) => self.on_anchor_added(*id, geometry, *transform),
            AnchorEvent::Updated(MeshAnchor {
                id,
                geometry,
                transform,
            }) => self.on_anchor_updated(*id, geometry, *transform),
            AnchorEvent::Removed(id) => self.on_anchor_removed(*id),
            AnchorEvent::Cleared => self.clear_all(),
        }
    }

    /// Apply every event already waiting on `receiver` without blocking.
    ///
    /// Returns the number of events applied.
    pub fn pump(&self, receiver: &Receiver<AnchorEvent>) -> usize {
        receiver.try_iter().map(|event| self.apply(&event)).count()
    }

    fn store(&self, id: AnchorId, geometry: &RawGeometry, transform: Mat4, kind: &str) -> Ingest {
        match extract_surface(geometry, transform) {
            Ok(surface) => {
                let (vertices, triangles) = (surface.vertex_count(), surface.triangle_count());
                let outcome = if self.registry.upsert(id, surface) {
                    Ingest::Replaced
                } else {
                    Ingest::Inserted
                };
                trace!(anchor = %id, kind, vertices, triangles, "Stored mesh anchor");
                outcome
            }
            Err(err) => {
                warn!(anchor = %id, kind, "Dropping mesh anchor: {}", err);
                Ingest::Dropped(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::AnchorFeed;
    use glam::Vec3;

    fn triangle_geometry() -> RawGeometry {
        RawGeometry::from_positions(&[Vec3::ZERO, Vec3::X, Vec3::Y], &[[0, 1, 2]])
    }

    #[test]
    fn test_add_then_update_replaces() {
        let buffer = MeshBuffer::new();
        let id = AnchorId::random();

        assert_eq!(
            buffer.on_anchor_added(id, &triangle_geometry(), Mat4::IDENTITY),
            Ingest::Inserted
        );
        assert_eq!(
            buffer.on_anchor_updated(id, &triangle_geometry(), Mat4::from_translation(Vec3::Z)),
            Ingest::Replaced
        );

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&id).unwrap().vertices()[0], Vec3::Z);
    }

    #[test]
    fn test_update_unknown_behaves_as_add() {
        let buffer = MeshBuffer::new();
        let id = AnchorId::random();
        assert_eq!(
            buffer.on_anchor_updated(id, &triangle_geometry(), Mat4::IDENTITY),
            Ingest::Inserted
        );
        assert!(buffer.registry().contains(&id));
    }

    #[test]
    fn test_malformed_add_is_dropped() {
        let buffer = MeshBuffer::new();
        let mut geometry = triangle_geometry();
        geometry.faces.bytes_per_index = 2;

        let outcome = buffer.on_anchor_added(AnchorId::random(), &geometry, Mat4::IDENTITY);
        assert_eq!(outcome, Ingest::Dropped(GeometryError::UnsupportedIndexWidth(2)));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_malformed_update_keeps_previous_surface() {
        let buffer = MeshBuffer::new();
        let id = AnchorId::random();
        buffer.on_anchor_added(id, &triangle_geometry(), Mat4::IDENTITY);

        let mut broken = triangle_geometry();
        broken.vertices.buffer.clear();
        assert!(matches!(
            buffer.on_anchor_updated(id, &broken, Mat4::from_translation(Vec3::X)),
            Ingest::Dropped(_)
        ));
        assert_eq!(buffer.snapshot().get(&id).unwrap().vertices()[0], Vec3::ZERO);
    }

    #[test]
    fn test_empty_geometry_is_stored_as_empty_surface() {
        let buffer = MeshBuffer::new();
        let id = AnchorId::random();
        assert_eq!(
            buffer.on_anchor_added(id, &RawGeometry::default(), Mat4::IDENTITY),
            Ingest::Inserted
        );
        assert!(buffer.snapshot().get(&id).unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_clear_are_idempotent() {
        let buffer = MeshBuffer::new();
        let id = AnchorId::random();
        assert_eq!(buffer.on_anchor_removed(id), Ingest::Ignored);
        assert_eq!(buffer.clear_all(), Ingest::Cleared(0));

        buffer.on_anchor_added(id, &triangle_geometry(), Mat4::IDENTITY);
        assert_eq!(buffer.on_anchor_removed(id), Ingest::Removed);
        assert_eq!(buffer.on_anchor_removed(id), Ingest::Ignored);
        assert!(buffer.snapshot().is_empty());
    }

    #[test]
    fn test_removing_unknown_anchor_leaves_snapshot_unchanged() {
        let buffer = MeshBuffer::new();
        let a = AnchorId::random();
        let b = AnchorId::random();
        buffer.on_anchor_added(a, &triangle_geometry(), Mat4::IDENTITY);
        buffer.on_anchor_added(b, &triangle_geometry(), Mat4::from_translation(Vec3::X));

        let before = buffer.snapshot();
        assert_eq!(buffer.on_anchor_removed(AnchorId::random()), Ingest::Ignored);
        let after = buffer.snapshot();

        assert_eq!(after.generation(), before.generation());
        assert_eq!(after.len(), 2);
        for (old, new) in before.entries().iter().zip(after.entries()) {
            assert_eq!(old.id, new.id);
            assert_eq!(old.surface, new.surface);
        }
    }

    #[test]
    fn test_clear_all_empties_snapshot() {
        let buffer = MeshBuffer::new();
        for _ in 0..3 {
            buffer.on_anchor_added(AnchorId::random(), &triangle_geometry(), Mat4::IDENTITY);
        }
        assert_eq!(buffer.clear_all(), Ingest::Cleared(3));
        assert!(buffer.snapshot().is_empty());
        assert!(!Ingest::Cleared(0).changed());
    }

    #[test]
    fn test_pump_applies_in_order() {
        let buffer = MeshBuffer::new();
        let (feed, rx) = AnchorFeed::channel();
        let keep = AnchorId::random();
        let gone = AnchorId::random();

        feed.added(MeshAnchor::new(gone, triangle_geometry(), Mat4::IDENTITY)).unwrap();
        feed.cleared().unwrap();
        feed.added(MeshAnchor::new(keep, triangle_geometry(), Mat4::IDENTITY)).unwrap();
        feed.removed(gone).unwrap();

        assert_eq!(buffer.pump(&rx), 4);
        let ids: Vec<_> = buffer.snapshot().entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![keep]);
        assert_eq!(buffer.pump(&rx), 0);
    }
}
