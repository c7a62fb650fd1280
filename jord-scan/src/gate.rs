//! Timestamp gate for recording frame admission
//!
//! Right after a recording starts, exposure and tracking have not settled
//! yet. The gate holds frames back until `start + delay`, then lets every
//! frame through until it is stopped.

/// Decides whether a tracking frame belongs in the active recording.
///
/// Timestamps are seconds on the tracking session clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaptureGate {
    threshold: Option<f64>,
    open: bool,
}

impl CaptureGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the gate at `timestamp + delay`. A negative delay counts as zero.
    ///
    /// Restarting an armed gate discards the previous session.
    pub fn start(&mut self, timestamp: f64, delay: f64) {
        self.threshold = Some(timestamp + delay.max(0.0));
        self.open = false;
    }

    /// True iff the gate is armed and `timestamp` has reached the threshold.
    ///
    /// Once a frame has been admitted the gate stays open for the rest of
    /// the session, so a late out-of-order frame is still kept.
    pub fn admit(&mut self, timestamp: f64) -> bool {
        let Some(threshold) = self.threshold else {
            return false;
        };
        if !self.open && timestamp >= threshold {
            self.open = true;
        }
        self.open
    }

    /// Disarm the gate; nothing is admitted until the next [`CaptureGate::start`].
    pub fn stop(&mut self) {
        self.threshold = None;
        self.open = false;
    }

    /// Admission threshold of the current session.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn is_active(&self) -> bool {
        self.threshold.is_some()
    }

    /// True once the first frame of the current session has been admitted.
    pub fn is_open(&self) -> bool {
        self.open
    }
}
