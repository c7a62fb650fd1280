//! Jord Scan Crate
//!
//! Live surface-scan state driven by an external tracking feed. Anchor
//! add/update/remove events are turned into world-space surfaces and kept
//! in a registry that a renderer can snapshot from another thread.
//!
//! ## Modules
//!
//! - [`ingest`]: Anchor identities, typed anchor events, and the channel feed
//! - [`mesh`]: The anchor registry and the incremental mesh buffer over it
//! - [`gate`]: Timestamp gate deciding which frames a recording keeps
//! - [`session`]: Scan mode control with an explicit observer list

pub mod gate;
pub mod ingest;
pub mod mesh;
pub mod session;

pub use gate::CaptureGate;
pub use ingest::{AnchorEvent, AnchorFeed, AnchorId, FeedError, MeshAnchor};
pub use mesh::{Ingest, MeshBuffer, MeshRegistry, MeshSnapshot, SnapshotEntry};
pub use session::{ConfigError, ObserverId, ScanConfig, ScanMode, ScanSession, SessionEvent};
