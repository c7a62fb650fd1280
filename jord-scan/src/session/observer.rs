//! Session events and the observer list that receives them

use crate::session::ScanMode;

/// Notifications a [`ScanSession`](crate::ScanSession) sends to its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ModeChanged { from: ScanMode, to: ScanMode },
    /// The mesh was discarded; holds how many surfaces were dropped.
    MeshCleared { removed: usize },
    /// Presentation hint for mesh overlays. Does not touch geometry.
    WireframeVisibility(bool),
}

/// Handle returned by [`ScanSession::add_observer`](crate::ScanSession::add_observer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&SessionEvent) + Send>;

/// Callbacks notified synchronously in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    callbacks: Vec<(ObserverId, Callback)>,
}

impl Observers {
    pub(crate) fn add(&mut self, callback: Callback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn notify(&mut self, event: &SessionEvent) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
