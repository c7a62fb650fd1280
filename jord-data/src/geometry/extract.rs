//! Surface extraction from raw anchor geometry

use crate::geometry::{GeometryError, RawGeometry};
use crate::types::RenderableSurface;
use glam::{Mat4, Vec3};
use tracing::trace;

/// Build a world-space [`RenderableSurface`] from one anchor's raw geometry.
///
/// Every vertex is read at `offset + i * stride` and moved through
/// `transform` (model-to-world, homogeneous divide). Faces are copied in
/// their original order with no reordering or degenerate filtering.
///
/// A geometry with zero vertices yields an empty surface; one with vertices
/// but zero faces keeps its vertices and has nothing to draw. Both succeed.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(vertices = raw.vertex_count(), faces = raw.face_count())
)]
pub fn extract_surface(
    raw: &RawGeometry,
    transform: Mat4,
) -> Result<RenderableSurface, GeometryError> {
    let vertex_count = raw.vertex_count();
    if vertex_count == 0 {
        trace!("No vertices, producing empty surface");
        return Ok(RenderableSurface::empty());
    }

    raw.vertices.validate()?;
    raw.faces.validate()?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let local: [f32; 3] = bytemuck::pod_read_unaligned(raw.vertices.position_bytes(i));
        let world = transform.project_point3(Vec3::from_array(local));
        if !world.is_finite() {
            return Err(GeometryError::NonFiniteVertex(i));
        }
        vertices.push(world);
    }

    let mut indices = Vec::with_capacity(raw.face_count());
    for face in 0..raw.face_count() {
        let triangle: [u32; 3] = bytemuck::pod_read_unaligned(raw.faces.face_bytes(face));
        if let Some(&index) = triangle.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
        indices.push(triangle);
    }

    trace!("Extracted {} vertices, {} triangles", vertices.len(), indices.len());
    Ok(RenderableSurface::new(vertices, indices))
}
