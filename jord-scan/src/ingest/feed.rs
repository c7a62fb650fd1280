//! Channel-based delivery of anchor events

use crate::ingest::{AnchorEvent, AnchorId, MeshAnchor};
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

/// Errors from pushing into a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Mesh buffer side of the anchor feed was dropped")]
    Disconnected,
}

/// Sending half handed to the tracking collaborator.
///
/// The receiving half is drained on the mesh side with
/// [`MeshBuffer::pump`](crate::MeshBuffer::pump) or
/// [`ScanSession::pump`](crate::ScanSession::pump), which apply events in
/// the order they were sent.
#[derive(Debug, Clone)]
pub struct AnchorFeed {
    sender: Sender<AnchorEvent>,
}

impl AnchorFeed {
    /// Create a connected feed and its receiver.
    pub fn channel() -> (Self, Receiver<AnchorEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, event: AnchorEvent) -> Result<(), FeedError> {
        self.sender.send(event).map_err(|_| FeedError::Disconnected)
    }

    pub fn added(&self, anchor: MeshAnchor) -> Result<(), FeedError> {
        self.send(AnchorEvent::Added(anchor))
    }

    pub fn updated(&self, anchor: MeshAnchor) -> Result<(), FeedError> {
        self.send(AnchorEvent::Updated(anchor))
    }

    pub fn removed(&self, id: AnchorId) -> Result<(), FeedError> {
        self.send(AnchorEvent::Removed(id))
    }

    pub fn cleared(&self) -> Result<(), FeedError> {
        self.send(AnchorEvent::Cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (feed, rx) = AnchorFeed::channel();
        let id = AnchorId::random();
        feed.removed(id).unwrap();
        feed.cleared().unwrap();

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, vec![AnchorEvent::Removed(id), AnchorEvent::Cleared]);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (feed, rx) = AnchorFeed::channel();
        drop(rx);
        assert!(matches!(feed.cleared(), Err(FeedError::Disconnected)));
    }
}
