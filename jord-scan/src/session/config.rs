//! Scan configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a [`ScanConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Capture delay must be finite and non-negative, got {0}")]
    InvalidDelay(f64),
}

/// Settings shared by the scan session and the recording path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Seconds to hold frames back after recording starts, while exposure
    /// and tracking settle.
    pub capture_delay_secs: f64,
    /// Initial wireframe visibility announced to observers.
    pub wireframe_visible: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            capture_delay_secs: 2.0,
            wireframe_visible: true,
        }
    }
}

impl ScanConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.capture_delay_secs.is_finite() || self.capture_delay_secs < 0.0 {
            return Err(ConfigError::InvalidDelay(self.capture_delay_secs));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.capture_delay_secs, 2.0);
        assert!(config.wireframe_visible);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ScanConfig::from_json_str(r#"{ "capture_delay_secs": 0.5 }"#).unwrap();
        assert_eq!(config.capture_delay_secs, 0.5);
        assert!(config.wireframe_visible);
    }

    #[test]
    fn test_negative_delay_rejected() {
        let err = ScanConfig::from_json_str(r#"{ "capture_delay_secs": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ScanConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
