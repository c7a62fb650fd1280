//! Scan session control
//!
//! [`ScanSession`] owns the mesh buffer for one scan and decides which
//! tracking events reach it depending on the scan mode. State changes are
//! reported to an explicit list of observers, called in registration order.

mod config;
mod observer;

pub use config::{ConfigError, ScanConfig};
pub use observer::{ObserverId, SessionEvent};

use crate::ingest::AnchorEvent;
use crate::mesh::{Ingest, MeshBuffer};
use observer::Observers;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Whether surface reconstruction is feeding the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanMode {
    /// Camera only, no reconstruction.
    #[default]
    Idle,
    /// Reconstruction running; every anchor event is applied.
    Scanning,
    /// Scan paused with its mesh kept. Known anchors may still be refined
    /// or removed, new ones are not picked up.
    Extended,
}

/// One live scan: mode, mesh, and the observers watching them.
#[derive(Debug)]
pub struct ScanSession {
    config: ScanConfig,
    mode: ScanMode,
    mesh: Arc<MeshBuffer>,
    wireframe_visible: bool,
    mesh_was_scanned: bool,
    observers: Observers,
}

impl ScanSession {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_mesh(config, Arc::new(MeshBuffer::new()))
    }

    /// Build a session around an existing buffer, e.g. one a renderer
    /// already holds.
    pub fn with_mesh(config: ScanConfig, mesh: Arc<MeshBuffer>) -> Self {
        Self {
            wireframe_visible: config.wireframe_visible,
            config,
            mode: ScanMode::Idle,
            mesh,
            mesh_was_scanned: false,
            observers: Observers::default(),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Shared handle for a render or export consumer.
    pub fn mesh(&self) -> &Arc<MeshBuffer> {
        &self.mesh
    }

    pub fn wireframe_visible(&self) -> bool {
        self.wireframe_visible
    }

    /// True if scanning ran at some point since the last clear.
    pub fn mesh_was_scanned(&self) -> bool {
        self.mesh_was_scanned
    }

    pub fn add_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        self.observers.add(Box::new(observer))
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Turn reconstruction on. Resuming from [`ScanMode::Extended`] keeps the mesh.
    pub fn start_scan(&mut self) -> bool {
        self.mesh_was_scanned = true;
        self.set_mode(ScanMode::Scanning)
    }

    /// Pause reconstruction but keep the mesh.
    pub fn stop_scan(&mut self) -> bool {
        if self.mode != ScanMode::Scanning {
            return false;
        }
        self.set_mode(ScanMode::Extended)
    }

    /// Discard the mesh and return to [`ScanMode::Idle`].
    ///
    /// Returns how many surfaces were dropped.
    pub fn clear_scan(&mut self) -> usize {
        let removed = match self.mesh.clear_all() {
            Ingest::Cleared(count) => count,
            _ => 0,
        };
        info!("Cleared scan ({} surfaces)", removed);
        self.mesh_was_scanned = false;
        self.observers.notify(&SessionEvent::MeshCleared { removed });
        self.set_mode(ScanMode::Idle);
        removed
    }

    /// Announce a wireframe visibility change to observers.
    pub fn set_wireframe_visible(&mut self, visible: bool) {
        if self.wireframe_visible == visible {
            return;
        }
        self.wireframe_visible = visible;
        self.observers.notify(&SessionEvent::WireframeVisibility(visible));
    }

    /// Route one tracking event to the mesh according to the current mode.
    pub fn handle(&mut self, event: &AnchorEvent) -> Ingest {
        let accepted = match (self.mode, event) {
            (_, AnchorEvent::Cleared) => true,
            (ScanMode::Idle, _) => false,
            (ScanMode::Scanning, _) => true,
            (ScanMode::Extended, AnchorEvent::Added(_)) => false,
            (ScanMode::Extended, AnchorEvent::Updated(anchor)) => {
                self.mesh.registry().contains(&anchor.id)
            }
            (ScanMode::Extended, AnchorEvent::Removed(_)) => true,
        };
        if !accepted {
            return Ingest::Ignored;
        }

        let outcome = self.mesh.apply(event);
        if let Ingest::Cleared(removed) = outcome {
            if removed > 0 {
                self.observers.notify(&SessionEvent::MeshCleared { removed });
            }
        }
        outcome
    }

    /// Drain pending events from an anchor feed without blocking.
    pub fn pump(&mut self, receiver: &Receiver<AnchorEvent>) -> usize {
        receiver.try_iter().map(|event| self.handle(&event)).count()
    }

    fn set_mode(&mut self, to: ScanMode) -> bool {
        let from = self.mode;
        if from == to {
            return false;
        }
        self.mode = to;
        debug!("Scan mode {:?} -> {:?}", from, to);
        self.observers.notify(&SessionEvent::ModeChanged { from, to });
        true
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{AnchorId, MeshAnchor};
    use glam::{Mat4, Vec3};
    use jord_data::RawGeometry;
    use std::sync::Mutex;

    fn anchor(id: AnchorId, offset: Vec3) -> MeshAnchor {
        MeshAnchor::new(
            id,
            RawGeometry::from_positions(&[Vec3::ZERO, Vec3::X, Vec3::Y], &[[0, 1, 2]]),
            Mat4::from_translation(offset),
        )
    }

    fn recording_observer(session: &mut ScanSession) -> Arc<Mutex<Vec<SessionEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.add_observer(move |event| sink.lock().unwrap().push(*event));
        seen
    }

    #[test]
    fn test_idle_ignores_anchor_events() {
        let mut session = ScanSession::default();
        let id = AnchorId::random();
        assert_eq!(session.handle(&AnchorEvent::Added(anchor(id, Vec3::ZERO))), Ingest::Ignored);
        assert!(session.mesh().is_empty());
    }

    #[test]
    fn test_mode_transitions_notify_observers() {
        let mut session = ScanSession::default();
        let seen = recording_observer(&mut session);

        assert!(session.start_scan());
        assert!(!session.start_scan());
        assert!(session.stop_scan());
        assert!(!session.stop_scan());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionEvent::ModeChanged {
                    from: ScanMode::Idle,
                    to: ScanMode::Scanning,
                },
                SessionEvent::ModeChanged {
                    from: ScanMode::Scanning,
                    to: ScanMode::Extended,
                },
            ]
        );
        assert!(session.mesh_was_scanned());
    }

    #[test]
    fn test_extended_refines_known_anchors_only() {
        let mut session = ScanSession::default();
        let known = AnchorId::random();
        let fresh = AnchorId::random();

        session.start_scan();
        session.handle(&AnchorEvent::Added(anchor(known, Vec3::ZERO)));
        session.stop_scan();

        assert_eq!(session.handle(&AnchorEvent::Added(anchor(fresh, Vec3::ZERO))), Ingest::Ignored);
        assert_eq!(
            session.handle(&AnchorEvent::Updated(anchor(fresh, Vec3::ZERO))),
            Ingest::Ignored
        );
        assert_eq!(session.handle(&AnchorEvent::Updated(anchor(known, Vec3::Z))), Ingest::Replaced);
        assert_eq!(session.mesh().snapshot().get(&known).unwrap().vertices()[0], Vec3::Z);

        assert_eq!(session.handle(&AnchorEvent::Removed(known)), Ingest::Removed);
        assert!(session.mesh().is_empty());
    }

    #[test]
    fn test_clear_scan_resets_everything() {
        let mut session = ScanSession::default();
        session.start_scan();
        session.handle(&AnchorEvent::Added(anchor(AnchorId::random(), Vec3::ZERO)));
        session.handle(&AnchorEvent::Added(anchor(AnchorId::random(), Vec3::ONE)));
        let seen = recording_observer(&mut session);

        assert_eq!(session.clear_scan(), 2);
        assert_eq!(session.mode(), ScanMode::Idle);
        assert!(!session.mesh_was_scanned());
        assert!(session.mesh().snapshot().is_empty());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionEvent::MeshCleared { removed: 2 },
                SessionEvent::ModeChanged {
                    from: ScanMode::Scanning,
                    to: ScanMode::Idle,
                },
            ]
        );
    }

    #[test]
    fn test_wireframe_toggle_only_reports_changes() {
        let mut session = ScanSession::default();
        let seen = recording_observer(&mut session);

        session.set_wireframe_visible(true);
        session.set_wireframe_visible(false);
        session.set_wireframe_visible(false);

        assert_eq!(*seen.lock().unwrap(), vec![SessionEvent::WireframeVisibility(false)]);
        assert!(!session.wireframe_visible());
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let mut session = ScanSession::default();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            session.add_observer(move |_| order.lock().unwrap().push(tag));
        }
        session.set_wireframe_visible(false);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_removed_observer_is_not_called() {
        let mut session = ScanSession::default();
        let seen = recording_observer(&mut session);
        let other = session.add_observer(|_| panic!("removed observer called"));

        assert!(session.remove_observer(other));
        assert!(!session.remove_observer(other));
        session.start_scan();

        assert_eq!(session.observer_count(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_feed_cleared_applies_in_any_mode() {
        let mut session = ScanSession::default();
        session.start_scan();
        session.handle(&AnchorEvent::Added(anchor(AnchorId::random(), Vec3::ZERO)));
        session.stop_scan();
        let seen = recording_observer(&mut session);

        assert_eq!(session.handle(&AnchorEvent::Cleared), Ingest::Cleared(1));
        assert_eq!(*seen.lock().unwrap(), vec![SessionEvent::MeshCleared { removed: 1 }]);
        assert_eq!(session.mode(), ScanMode::Extended);
    }
}
