//! Registry of current surfaces keyed by anchor identity

use crate::ingest::AnchorId;
use jord_data::RenderableSurface;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct Entry {
    /// Order of first observation; kept across replacements.
    slot: u64,
    surface: Arc<RenderableSurface>,
}

#[derive(Debug, Default)]
struct RegistryState {
    entries: HashMap<AnchorId, Entry>,
    next_slot: u64,
    generation: u64,
}

/// Map from anchor identity to its current surface.
///
/// Holds at most one surface per anchor. Writers swap whole `Arc`s under a
/// write lock, so a reader sees either the previous surface or the new one,
/// never a mix.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    state: RwLock<RegistryState>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the surface for `id`. Returns `true` if an earlier
    /// surface was replaced.
    pub fn upsert(&self, id: AnchorId, surface: RenderableSurface) -> bool {
        let surface = Arc::new(surface);
        let mut state = self.state.write();
        state.generation += 1;
        if let Some(entry) = state.entries.get_mut(&id) {
            entry.surface = surface;
            return true;
        }
        let slot = state.next_slot;
        state.next_slot += 1;
        state.entries.insert(id, Entry { slot, surface });
        false
    }

    /// Remove the surface for `id`. Returns `false` if there was none.
    pub fn remove(&self, id: &AnchorId) -> bool {
        let mut state = self.state.write();
        let removed = state.entries.remove(id).is_some();
        if removed {
            state.generation += 1;
        }
        removed
    }

    /// Drop every surface, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut state = self.state.write();
        let count = state.entries.len();
        if count > 0 {
            state.entries.clear();
            state.generation += 1;
        }
        count
    }

    pub fn get(&self, id: &AnchorId) -> Option<Arc<RenderableSurface>> {
        self.state.read().entries.get(id).map(|e| Arc::clone(&e.surface))
    }

    pub fn contains(&self, id: &AnchorId) -> bool {
        self.state.read().entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Counter bumped by every change to the set of surfaces.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Consistent copy of all surfaces in first-observation order.
    pub fn snapshot(&self) -> MeshSnapshot {
        let state = self.state.read();
        let mut ordered: Vec<_> = state
            .entries
            .iter()
            .map(|(id, entry)| (entry.slot, *id, Arc::clone(&entry.surface)))
            .collect();
        let generation = state.generation;
        drop(state);

        ordered.sort_unstable_by_key(|(slot, _, _)| *slot);
        MeshSnapshot {
            generation,
            entries: ordered
                .into_iter()
                .map(|(_, id, surface)| SnapshotEntry { id, surface })
                .collect(),
        }
    }
}

/// One anchor's surface inside a [`MeshSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub id: AnchorId,
    pub surface: Arc<RenderableSurface>,
}

/// Point-in-time view of the registry for rendering and export.
///
/// Surfaces are shared, not copied; later registry writes do not affect a
/// snapshot already taken.
#[derive(Debug, Clone, Default)]
pub struct MeshSnapshot {
    generation: u64,
    entries: Vec<SnapshotEntry>,
}

impl MeshSnapshot {
    /// Registry generation this snapshot was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &RenderableSurface> {
        self.entries.iter().map(|e| e.surface.as_ref())
    }

    pub fn get(&self, id: &AnchorId) -> Option<&RenderableSurface> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.surface.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.surfaces().map(RenderableSurface::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.surfaces().map(RenderableSurface::triangle_count).sum()
    }

    /// All surfaces combined into one mesh, for export.
    pub fn merged(&self) -> RenderableSurface {
        RenderableSurface::merge(self.surfaces())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn point_surface(p: Vec3) -> RenderableSurface {
        RenderableSurface::new(vec![p], vec![[0, 0, 0]])
    }

    #[test]
    fn test_upsert_replaces_without_merging() {
        let registry = MeshRegistry::new();
        let id = AnchorId::random();

        assert!(!registry.upsert(id, point_surface(Vec3::X)));
        assert!(registry.upsert(id, point_surface(Vec3::Y)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&id).unwrap().vertices(), &[Vec3::Y]);
    }

    #[test]
    fn test_snapshot_keeps_first_observation_order() {
        let registry = MeshRegistry::new();
        let ids: Vec<_> = (0..5).map(|_| AnchorId::random()).collect();
        for (i, id) in ids.iter().enumerate() {
            registry.upsert(*id, point_surface(Vec3::splat(i as f32)));
        }
        // Replacing an early anchor keeps its slot.
        registry.upsert(ids[1], point_surface(Vec3::NEG_ONE));

        let snapshot = registry.snapshot();
        let order: Vec<_> = snapshot.entries().iter().map(|e| e.id).collect();
        assert_eq!(order, ids);
        assert_eq!(snapshot.get(&ids[1]).unwrap().vertices(), &[Vec3::NEG_ONE]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let registry = MeshRegistry::new();
        let id = AnchorId::random();
        registry.upsert(id, point_surface(Vec3::X));

        let before = registry.snapshot();
        registry.upsert(id, point_surface(Vec3::Z));
        registry.clear();

        assert_eq!(before.len(), 1);
        assert_eq!(before.get(&id).unwrap().vertices(), &[Vec3::X]);
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_noop_changes_keep_generation() {
        let registry = MeshRegistry::new();
        assert_eq!(registry.generation(), 0);

        assert!(!registry.remove(&AnchorId::random()));
        assert_eq!(registry.clear(), 0);
        assert_eq!(registry.generation(), 0);

        let id = AnchorId::random();
        registry.upsert(id, RenderableSurface::empty());
        assert_eq!(registry.generation(), 1);
        assert!(registry.remove(&id));
        assert_eq!(registry.generation(), 2);
    }

    #[test]
    fn test_snapshot_totals_and_merge() {
        let registry = MeshRegistry::new();
        registry.upsert(AnchorId::random(), point_surface(Vec3::X));
        registry.upsert(AnchorId::random(), point_surface(Vec3::Y));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.vertex_count(), 2);
        assert_eq!(snapshot.triangle_count(), 2);
        assert_eq!(snapshot.merged().indices(), &[[0, 0, 0], [1, 1, 1]]);
    }
}
