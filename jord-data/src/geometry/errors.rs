//! Error types for geometry extraction.

use thiserror::Error;

/// Reasons a raw geometry blob cannot be turned into a surface.
///
/// None of these are fatal to a scan; the caller drops the anchor update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Unsupported index width: {0} bytes (expected 4)")]
    UnsupportedIndexWidth(usize),

    #[error("Unsupported primitive arity: {0} indices per face (expected 3)")]
    UnsupportedPrimitive(usize),

    #[error("Vertex stride {stride} is smaller than a position ({min} bytes)")]
    StrideTooSmall { stride: usize, min: usize },

    #[error("Vertex buffer overrun: {count} vertices need {needed} bytes, buffer has {available}")]
    VertexBufferOverrun {
        count: usize,
        needed: usize,
        available: usize,
    },

    #[error("Face buffer overrun: {count} faces need {needed} bytes, buffer has {available}")]
    FaceBufferOverrun {
        count: usize,
        needed: usize,
        available: usize,
    },

    #[error("Face {face} references vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Vertex {0} is not finite after transform")]
    NonFiniteVertex(usize),
}
