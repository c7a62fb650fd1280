//! Gated frame recording

use crate::settings::RecordingSettings;
use crate::sink::{CaptureError, FrameSink, TrackedFrame};
use crate::track::TransformTrack;
use jord_scan::CaptureGate;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What the recorder did with one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDisposition {
    /// No recording in progress.
    Idle,
    /// Recording, but the stabilisation delay has not passed yet.
    Gated,
    /// Pose recorded and frame offered to the sink.
    Captured,
}

#[derive(Debug)]
struct ActiveRecording {
    id: Uuid,
    started_at: f64,
    sink_started: bool,
    frames: u64,
    first_frame: Option<f64>,
    last_frame: Option<f64>,
    sink_error: Option<String>,
}

/// Result of a finished recording.
#[derive(Debug, Clone)]
pub struct RecordingSummary {
    pub id: Uuid,
    pub settings: RecordingSettings,
    /// When `start` was called.
    pub started_at: f64,
    /// First timestamp the gate would admit.
    pub threshold: f64,
    pub frames: u64,
    pub first_frame: Option<f64>,
    pub last_frame: Option<f64>,
    /// First sink failure, if any. Poses are tracked regardless.
    pub sink_error: Option<String>,
    pub track: TransformTrack,
}

impl RecordingSummary {
    /// Seconds covered by captured frames.
    pub fn duration(&self) -> f64 {
        match (self.first_frame, self.last_frame) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Feeds tracking frames into a [`FrameSink`] once the capture gate opens.
///
/// The sink session starts lazily on the first admitted frame, with the
/// gate threshold as its start time, so a recording stopped during the
/// delay never touches the sink.
#[derive(Debug)]
pub struct FrameRecorder<S: FrameSink> {
    settings: RecordingSettings,
    delay: f64,
    gate: CaptureGate,
    track: TransformTrack,
    sink: S,
    active: Option<ActiveRecording>,
}

impl<S: FrameSink> FrameRecorder<S> {
    /// `delay` is the stabilisation time in seconds applied at every start.
    pub fn new(settings: RecordingSettings, delay: f64, sink: S) -> Self {
        Self {
            settings,
            delay,
            gate: CaptureGate::new(),
            track: TransformTrack::new(),
            sink,
            active: None,
        }
    }

    pub fn settings(&self) -> &RecordingSettings {
        &self.settings
    }

    /// Change settings for the next recording.
    pub fn set_settings(&mut self, settings: RecordingSettings) -> Result<(), CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }
        self.settings = settings;
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn gate(&self) -> &CaptureGate {
        &self.gate
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Begin a recording at session time `now`. Frames are admitted from
    /// `now + delay` on.
    pub fn start(&mut self, now: f64) -> Result<Uuid, CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }
        let id = Uuid::new_v4();
        self.track.clear();
        self.gate.start(now, self.delay);
        self.active = Some(ActiveRecording {
            id,
            started_at: now,
            sink_started: false,
            frames: 0,
            first_frame: None,
            last_frame: None,
            sink_error: None,
        });
        info!(
            "Recording {} started at {:.3}s ({}), capturing from {:.3}s",
            id,
            now,
            self.settings.details(),
            now + self.delay.max(0.0)
        );
        Ok(id)
    }

    /// Offer one tracking frame to the current recording.
    ///
    /// The pose is recorded before the frame reaches the sink. A sink
    /// failure is logged and kept in the summary; the sink is not called
    /// again for the rest of the recording, but poses keep being tracked.
    pub fn handle_frame(&mut self, frame: &TrackedFrame) -> FrameDisposition {
        let Some(active) = self.active.as_mut() else {
            return FrameDisposition::Idle;
        };
        if !self.gate.admit(frame.timestamp) {
            return FrameDisposition::Gated;
        }

        self.track.push(frame.timestamp, frame.camera_transform);
        active.frames += 1;
        active.first_frame.get_or_insert(frame.timestamp);
        active.last_frame = Some(frame.timestamp);

        if active.sink_error.is_some() {
            return FrameDisposition::Captured;
        }
        if !active.sink_started {
            let start_time = self.gate.threshold().unwrap_or(frame.timestamp);
            if let Err(e) = self.sink.begin(&self.settings, start_time) {
                warn!("Recording {}: sink failed to start: {}", active.id, e);
                active.sink_error = Some(e.to_string());
                return FrameDisposition::Captured;
            }
            active.sink_started = true;
            debug!("Sink session started at {:.3}s", start_time);
        }
        if let Err(e) = self.sink.append(frame) {
            warn!("Recording {}: dropping frame at {:.3}s: {}", active.id, frame.timestamp, e);
            active.sink_error = Some(e.to_string());
        }
        FrameDisposition::Captured
    }

    /// Finish the current recording and hand back what was captured.
    ///
    /// The summary is returned even if the sink fails to finish; the
    /// failure is carried in [`RecordingSummary::sink_error`].
    pub fn stop(&mut self) -> Result<RecordingSummary, CaptureError> {
        let Some(mut active) = self.active.take() else {
            warn!("Not recording, skipping stop");
            return Err(CaptureError::NotRecording);
        };
        let threshold = self.gate.threshold().unwrap_or(active.started_at);
        self.gate.stop();

        if !active.sink_started {
            warn!("Recording {} stopped before the sink started", active.id);
        } else if let Err(e) = self.sink.finish() {
            warn!("Recording {}: skipping sink finish: {}", active.id, e);
            active.sink_error.get_or_insert(e.to_string());
        }

        info!("Recording {} finished: {} frames", active.id, active.frames);
        Ok(RecordingSummary {
            id: active.id,
            settings: self.settings,
            started_at: active.started_at,
            threshold,
            frames: active.frames,
            first_frame: active.first_frame,
            last_frame: active.last_frame,
            sink_error: active.sink_error,
            track: std::mem::take(&mut self.track),
        })
    }
}
