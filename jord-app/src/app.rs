//! Trace replay through scan session and recorder

use crate::Args;
use crate::errors::AppError;
use crate::trace::{Trace, TraceEvent};
use glam::Mat4;
use jord_capture::{
    FrameDisposition, FrameRecorder, FrameSink, ImageSequenceSink, MemorySink, RecordingSettings,
    RecordingSummary, TrackedFrame,
};
use jord_scan::{AnchorFeed, ScanConfig, ScanSession, SessionEvent};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Totals reported once a replay finishes.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub anchor_events: usize,
    pub frames_seen: usize,
    pub frames_gated: usize,
    pub recordings: Vec<RecordingSummary>,
}

pub fn run(args: &Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if let Some(delay) = args.delay {
        config.capture_delay_secs = delay;
        config.validate()?;
    }

    let defaults = RecordingSettings::default();
    let settings = RecordingSettings::new(
        args.resolution.unwrap_or(defaults.resolution),
        args.fps.unwrap_or(defaults.frame_rate),
        args.codec.unwrap_or(defaults.codec),
    );

    info!("Loading trace from: {}", args.trace.display());
    let trace = Trace::load(&args.trace)?;
    info!("Trace has {} events", trace.events.len());

    let sink: Box<dyn FrameSink> = match &args.frames_dir {
        Some(dir) => Box::new(ImageSequenceSink::new(dir)),
        None => Box::new(MemorySink::default()),
    };
    let base_dir = args.trace.parent().unwrap_or(Path::new("."));

    let mut session = ScanSession::new(config);
    let report = replay(&trace, &mut session, settings, sink, base_dir)?;

    let snapshot = session.mesh().snapshot();
    info!(
        "Scan finished in {:?} mode: {} surfaces, {} vertices, {} triangles",
        session.mode(),
        snapshot.len(),
        snapshot.vertex_count(),
        snapshot.triangle_count()
    );
    info!(
        "{} anchor events, {} frames ({} held back by the capture gate), {} recordings",
        report.anchor_events,
        report.frames_seen,
        report.frames_gated,
        report.recordings.len()
    );

    if let Some(path) = &args.mesh_out {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &snapshot.merged())?;
        writer.flush()?;
        info!("Merged mesh written to: {}", path.display());
    }

    if let Some(dir) = &args.transforms_out {
        std::fs::create_dir_all(dir)?;
        for summary in &report.recordings {
            summary.track.save(dir.join(format!("camera_motion_{}.json", summary.id)))?;
        }
    }

    Ok(())
}

/// Play every trace step in order. Anchor events travel through an
/// [`AnchorFeed`] and are pumped into the session as they arrive.
pub fn replay<S: FrameSink>(
    trace: &Trace,
    session: &mut ScanSession,
    settings: RecordingSettings,
    sink: S,
    base_dir: &Path,
) -> Result<ReplayReport, AppError> {
    session.add_observer(|event| match event {
        SessionEvent::ModeChanged { from, to } => info!("Scan mode: {:?} -> {:?}", from, to),
        SessionEvent::MeshCleared { removed } => info!("Cleared mesh nodes: {}", removed),
        SessionEvent::WireframeVisibility(visible) => info!("Wireframe visible: {}", visible),
    });

    let (feed, receiver) = AnchorFeed::channel();
    let mut recorder = FrameRecorder::new(settings, session.config().capture_delay_secs, sink);
    let mut report = ReplayReport::default();

    for event in &trace.events {
        match event {
            TraceEvent::AnchorAdded(_)
            | TraceEvent::AnchorUpdated(_)
            | TraceEvent::AnchorRemoved { .. }
            | TraceEvent::AnchorsCleared => {
                if let Some(anchor_event) = event.anchor_event() {
                    feed.send(anchor_event)?;
                }
                report.anchor_events += session.pump(&receiver);
            }
            TraceEvent::StartScan => {
                session.start_scan();
            }
            TraceEvent::StopScan => {
                session.stop_scan();
            }
            TraceEvent::ClearScan => {
                session.clear_scan();
            }
            TraceEvent::Wireframe { visible } => session.set_wireframe_visible(*visible),
            TraceEvent::StartRecording { timestamp } => {
                if let Err(e) = recorder.start(*timestamp) {
                    warn!("Ignoring start at {:.3}s: {}", timestamp, e);
                }
            }
            TraceEvent::StopRecording => match recorder.stop() {
                Ok(summary) => {
                    if let Some(err) = &summary.sink_error {
                        warn!(
                            "Recording {} kept its poses but the sink failed: {}",
                            summary.id, err
                        );
                    }
                    report.recordings.push(summary);
                }
                Err(e) => warn!("Ignoring stop: {}", e),
            },
            TraceEvent::Frame {
                timestamp,
                camera,
                image: image_path,
            } => {
                let camera = Mat4::from_cols_array(camera);
                let frame = match image_path {
                    Some(path) => {
                        let path = base_dir.join(path);
                        let pixels = image::open(&path)
                            .map_err(|source| AppError::FrameImage {
                                path: path.display().to_string(),
                                source,
                            })?
                            .to_rgb8();
                        TrackedFrame::with_image(*timestamp, camera, pixels)
                    }
                    None => TrackedFrame::new(*timestamp, camera),
                };
                report.frames_seen += 1;
                match recorder.handle_frame(&frame) {
                    FrameDisposition::Gated => report.frames_gated += 1,
                    FrameDisposition::Captured | FrameDisposition::Idle => {}
                }
            }
        }
        debug!("Mesh generation {}", session.mesh().registry().generation());
    }

    if recorder.is_recording() {
        warn!("Trace ended while recording, stopping");
        report.recordings.push(recorder.stop()?);
    }

    Ok(report)
}
