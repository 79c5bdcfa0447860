//! Capture configuration

use crate::error::MediaError;
use crate::frame::Resolution;
use std::time::Duration;

/// Capture session configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Resolution requested from the device
    pub resolution: Resolution,
    /// Interval between frame samples
    pub sample_interval: Duration,
    /// JPEG quality for sampled frames (1-100)
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::HD,
            sample_interval: Duration::from_millis(500),
            jpeg_quality: 80,
        }
    }
}

impl CaptureConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), MediaError> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(MediaError::InvalidConfiguration {
                message: "Invalid resolution".to_string(),
            });
        }

        if self.sample_interval.is_zero() {
            return Err(MediaError::InvalidConfiguration {
                message: "Sample interval must be > 0".to_string(),
            });
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(MediaError::InvalidConfiguration {
                message: "JPEG quality must be in 1-100".to_string(),
            });
        }

        Ok(())
    }
}
