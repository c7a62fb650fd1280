//! Renderable surface produced from one mesh anchor.
//!
//! Surfaces are CPU-side and immutable once built. The registry hands them
//! out behind `Arc`, so a renderer holding one is never affected by a later
//! update for the same anchor.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Triangulated world-space geometry for a single tracked surface patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderableSurface {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl RenderableSurface {
    /// Build a surface from already transformed vertices and triangle index triples.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self { vertices, indices }
    }

    /// A surface that renders nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Resolve triangle `i` to its three positions.
    ///
    /// Returns `None` if `i` is past the end or the triangle references a
    /// vertex that does not exist.
    pub fn triangle(&self, i: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.indices.get(i)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for a surface without vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }

    /// Concatenate several surfaces into one, rebasing indices so each
    /// triangle still points at its own vertices.
    ///
    /// Used to export a whole scan as a single mesh. A surface whose
    /// vertices could no longer be addressed with `u32` indices is left out.
    pub fn merge<'a, I>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = &'a RenderableSurface>,
    {
        let mut merged = Self::default();
        for surface in surfaces {
            let existing = merged.vertices.len();
            let Some(indices) = rebased(&surface.indices, existing, surface.vertices.len()) else {
                warn!(
                    "Skipping surface of {} vertices: merged mesh already holds {}",
                    surface.vertices.len(),
                    existing
                );
                continue;
            };
            merged.vertices.extend_from_slice(&surface.vertices);
            merged.indices.extend(indices);
        }
        merged
    }
}

/// Shift `indices` past `existing` vertices, or `None` if the result would
/// not fit in `u32`.
fn rebased(indices: &[[u32; 3]], existing: usize, added: usize) -> Option<Vec<[u32; 3]>> {
    let base = u32::try_from(existing).ok()?;
    let last = existing.checked_add(added)?.saturating_sub(1);
    u32::try_from(last).ok()?;
    indices
        .iter()
        .map(|&[a, b, c]| Some([a.checked_add(base)?, b.checked_add(base)?, c.checked_add(base)?]))
        .collect()
}
