//! Anchor-keyed surface storage
//!
//! [`MeshRegistry`] is the locked map from anchor identity to surface.
//! [`MeshBuffer`] sits on top of it and turns tracking events into registry
//! writes, extracting geometry on the way in.

pub mod buffer;
pub mod registry;

pub use buffer::{Ingest, MeshBuffer};
pub use registry::{MeshRegistry, MeshSnapshot, SnapshotEntry};
