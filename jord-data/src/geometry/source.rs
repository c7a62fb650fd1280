//! Buffer descriptors for raw anchor geometry.
//!
//! Mirrors the way a surface-reconstruction subsystem hands out mesh data:
//! one byte buffer of vertex positions addressed by offset and stride, and
//! one tightly packed buffer of face indices.

use crate::geometry::GeometryError;
use glam::Vec3;

/// Size in bytes of one `float3` vertex position.
pub const POSITION_SIZE: usize = 3 * std::mem::size_of::<f32>();

/// Size in bytes of one face index.
pub const INDEX_SIZE: usize = std::mem::size_of::<u32>();

/// Index count per primitive for triangulated output.
pub const INDICES_PER_TRIANGLE: usize = 3;

/// Vertex positions inside a raw byte buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexSource {
    /// Backing bytes, native endian.
    pub buffer: Vec<u8>,
    /// Number of vertices.
    pub count: usize,
    /// Byte offset of the first position.
    pub offset: usize,
    /// Distance in bytes between consecutive positions.
    pub stride: usize,
}

impl VertexSource {
    /// Byte range of vertex `i`. Only valid after [`VertexSource::validate`].
    pub(crate) fn position_bytes(&self, i: usize) -> &[u8] {
        let start = self.offset + i * self.stride;
        &self.buffer[start..start + POSITION_SIZE]
    }

    /// Check that every addressed position lies inside the buffer.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.stride < POSITION_SIZE {
            return Err(GeometryError::StrideTooSmall {
                stride: self.stride,
                min: POSITION_SIZE,
            });
        }
        if self.count == 0 {
            return Ok(());
        }

        let needed = (self.count - 1)
            .checked_mul(self.stride)
            .and_then(|n| n.checked_add(self.offset))
            .and_then(|n| n.checked_add(POSITION_SIZE))
            .unwrap_or(usize::MAX);
        if needed > self.buffer.len() {
            return Err(GeometryError::VertexBufferOverrun {
                count: self.count,
                needed,
                available: self.buffer.len(),
            });
        }
        Ok(())
    }
}

/// Triangle indices inside a raw byte buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceElement {
    /// Backing bytes, native endian.
    pub buffer: Vec<u8>,
    /// Number of primitives.
    pub count: usize,
    pub bytes_per_index: usize,
    pub indices_per_primitive: usize,
}

impl Default for FaceElement {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            count: 0,
            bytes_per_index: INDEX_SIZE,
            indices_per_primitive: INDICES_PER_TRIANGLE,
        }
    }
}

impl FaceElement {
    fn face_size(&self) -> usize {
        self.bytes_per_index * self.indices_per_primitive
    }

    /// Byte range of face `f`. Only valid after [`FaceElement::validate`].
    pub(crate) fn face_bytes(&self, f: usize) -> &[u8] {
        let size = self.face_size();
        &self.buffer[f * size..(f + 1) * size]
    }

    /// Check the index layout and that every face lies inside the buffer.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.bytes_per_index != INDEX_SIZE {
            return Err(GeometryError::UnsupportedIndexWidth(self.bytes_per_index));
        }
        if self.indices_per_primitive != INDICES_PER_TRIANGLE {
            return Err(GeometryError::UnsupportedPrimitive(self.indices_per_primitive));
        }

        let needed = self.count.checked_mul(self.face_size()).unwrap_or(usize::MAX);
        if needed > self.buffer.len() {
            return Err(GeometryError::FaceBufferOverrun {
                count: self.count,
                needed,
                available: self.buffer.len(),
            });
        }
        Ok(())
    }
}

/// Geometry of one mesh anchor, in anchor-local space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeometry {
    pub vertices: VertexSource,
    pub faces: FaceElement,
}

impl RawGeometry {
    pub fn new(vertices: VertexSource, faces: FaceElement) -> Self {
        Self { vertices, faces }
    }

    /// Pack positions and triangles into tightly strided buffers.
    pub fn from_positions(positions: &[Vec3], triangles: &[[u32; 3]]) -> Self {
        let floats: Vec<[f32; 3]> = positions.iter().map(|p| p.to_array()).collect();
        Self {
            vertices: VertexSource {
                buffer: bytemuck::cast_slice(&floats).to_vec(),
                count: positions.len(),
                offset: 0,
                stride: POSITION_SIZE,
            },
            faces: FaceElement {
                buffer: bytemuck::cast_slice(triangles).to_vec(),
                count: triangles.len(),
                ..FaceElement::default()
            },
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.count
    }

    pub fn face_count(&self) -> usize {
        self.faces.count
    }
}
