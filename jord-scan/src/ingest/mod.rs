//! Anchor ingestion
//!
//! The tracking collaborator pushes typed [`AnchorEvent`]s into the mesh
//! buffer, either by direct calls or through an [`AnchorFeed`] channel.

pub mod anchor;
pub mod feed;

pub use anchor::{AnchorEvent, AnchorId, MeshAnchor};
pub use feed::{AnchorFeed, FeedError};
