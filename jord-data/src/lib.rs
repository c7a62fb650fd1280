//! Jord Data Crate
//!
//! Geometry types for live surface scanning: the raw per-anchor buffers a
//! tracking subsystem hands over, and the world-space triangulated surfaces
//! derived from them. This crate is platform-agnostic and does no locking;
//! the registry that owns surfaces lives in jord-scan.

pub mod geometry;
pub mod types;

pub use geometry::{FaceElement, GeometryError, RawGeometry, VertexSource, extract_surface};
pub use types::RenderableSurface;
