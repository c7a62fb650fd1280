//! Recording settings

use crate::sink::CaptureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output resolution of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoResolution {
    #[default]
    #[serde(rename = "1080p")]
    Hd1080p,
    #[serde(rename = "4K")]
    Uhd4k,
}

impl VideoResolution {
    pub const ALL: [VideoResolution; 2] = [VideoResolution::Hd1080p, VideoResolution::Uhd4k];

    /// Frame size (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            VideoResolution::Hd1080p => (1920, 1080),
            VideoResolution::Uhd4k => (3840, 2160),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoResolution::Hd1080p => "1080p",
            VideoResolution::Uhd4k => "4K",
        }
    }
}

/// Frames per second of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameRate {
    #[default]
    Fps30,
    Fps60,
}

impl FrameRate {
    pub const ALL: [FrameRate; 2] = [FrameRate::Fps30, FrameRate::Fps60];

    pub fn fps(&self) -> u32 {
        match self {
            FrameRate::Fps30 => 30,
            FrameRate::Fps60 => 60,
        }
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = CaptureError;

    fn try_from(fps: u32) -> Result<Self, Self::Error> {
        match fps {
            30 => Ok(FrameRate::Fps30),
            60 => Ok(FrameRate::Fps60),
            other => Err(CaptureError::InvalidSetting(format!(
                "unsupported frame rate {} (expected 30 or 60)",
                other
            ))),
        }
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> Self {
        rate.fps()
    }
}

/// Codec the recording sink is asked to encode with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoCodec {
    #[default]
    #[serde(rename = "H.264")]
    H264,
    #[serde(rename = "ProRes")]
    ProRes422,
}

impl VideoCodec {
    pub const ALL: [VideoCodec; 2] = [VideoCodec::H264, VideoCodec::ProRes422];

    pub fn label(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "H.264",
            VideoCodec::ProRes422 => "ProRes",
        }
    }

    /// Target average bitrate in bits per second.
    pub fn average_bitrate(&self) -> u32 {
        match self {
            VideoCodec::H264 => 12_000_000,
            VideoCodec::ProRes422 => 40_000_000,
        }
    }
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fps", self.fps())
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VideoResolution {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1080p" | "hd" => Ok(VideoResolution::Hd1080p),
            "4k" | "uhd" => Ok(VideoResolution::Uhd4k),
            _ => Err(CaptureError::InvalidSetting(format!("unknown resolution '{}'", s))),
        }
    }
}

impl FromStr for FrameRate {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fps: u32 = s
            .trim_end_matches("fps")
            .parse()
            .map_err(|_| CaptureError::InvalidSetting(format!("unknown frame rate '{}'", s)))?;
        FrameRate::try_from(fps)
    }
}

impl FromStr for VideoCodec {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h.264" | "h264" => Ok(VideoCodec::H264),
            "prores" | "prores422" => Ok(VideoCodec::ProRes422),
            _ => Err(CaptureError::InvalidSetting(format!("unknown codec '{}'", s))),
        }
    }
}

/// What a recording should look like. Passed through to the frame sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingSettings {
    pub resolution: VideoResolution,
    pub frame_rate: FrameRate,
    pub codec: VideoCodec,
}

impl RecordingSettings {
    pub fn new(resolution: VideoResolution, frame_rate: FrameRate, codec: VideoCodec) -> Self {
        Self {
            resolution,
            frame_rate,
            codec,
        }
    }

    /// Short human-readable summary, e.g. `1080p • 30fps • H.264`.
    pub fn details(&self) -> String {
        format!("{} • {} • {}", self.resolution, self.frame_rate, self.codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RecordingSettings::default();
        assert_eq!(settings.resolution.dimensions(), (1920, 1080));
        assert_eq!(settings.frame_rate.fps(), 30);
        assert_eq!(settings.codec.average_bitrate(), 12_000_000);
        assert_eq!(settings.details(), "1080p • 30fps • H.264");
    }

    #[test]
    fn test_json_uses_display_labels() {
        let settings = RecordingSettings::new(
            VideoResolution::Uhd4k,
            FrameRate::Fps60,
            VideoCodec::ProRes422,
        );
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"resolution":"4K","frame_rate":60,"codec":"ProRes"}"#);
        let back: RecordingSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_unsupported_frame_rate_in_json() {
        let result: Result<RecordingSettings, _> = serde_json::from_str(r#"{"frame_rate":24}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_from_cli_strings() {
        assert_eq!("4k".parse::<VideoResolution>().unwrap(), VideoResolution::Uhd4k);
        assert_eq!("60".parse::<FrameRate>().unwrap(), FrameRate::Fps60);
        assert_eq!("60fps".parse::<FrameRate>().unwrap(), FrameRate::Fps60);
        assert_eq!("h264".parse::<VideoCodec>().unwrap(), VideoCodec::H264);
        assert!("8k".parse::<VideoResolution>().is_err());
        assert!("25".parse::<FrameRate>().is_err());
    }
}
