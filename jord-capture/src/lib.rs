//! Jord Capture - recording path for tracked camera frames
//!
//! Decides which frames of a live scan end up in a recording and hands
//! them to a pluggable [`FrameSink`]:
//!
//! - [`FrameRecorder`]: gates frames behind the stabilisation delay and
//!   keeps the camera pose of every admitted frame
//! - [`TransformTrack`]: per-frame camera poses, exportable as JSON
//! - [`ImageSequenceSink`] / [`MemorySink`]: ready-made sinks
//!
//! Video encoding and audio belong to whatever sink the application plugs in.
//!
//! ## Example
//!
//! ```ignore
//! use jord_capture::{FrameRecorder, MemorySink, RecordingSettings, TrackedFrame};
//!
//! let mut recorder = FrameRecorder::new(RecordingSettings::default(), 2.0, MemorySink::default());
//! recorder.start(now)?;
//! for frame in frames {
//!     recorder.handle_frame(&frame)?;
//! }
//! let summary = recorder.stop()?;
//! summary.track.save("camera_motion.json")?;
//! ```

mod recorder;
mod settings;
mod sink;
mod track;

pub use recorder::{FrameDisposition, FrameRecorder, RecordingSummary};
pub use settings::{FrameRate, RecordingSettings, VideoCodec, VideoResolution};
pub use sink::{CaptureError, FrameSink, ImageSequenceSink, MemorySink, TrackedFrame};
pub use track::{PoseSample, TransformTrack};

// Re-export the gate for callers that only need admission decisions
pub use jord_scan::CaptureGate;
