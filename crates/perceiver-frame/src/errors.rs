//! Error types for the perception seam

use thiserror::Error;

/// Frame capture failures. Treated as transient by the polling layers:
/// logged, recorded, and folded into the timeout clock.
#[derive(Debug, Error, Clone)]
pub enum CaptureError {
    /// Requested region is empty, negative, or outside the display
    #[error("Invalid capture region: {0}")]
    InvalidRegion(String),

    /// Backing display is gone or not reachable
    #[error("Display unavailable: {0}")]
    DisplayUnavailable(String),

    /// I/O failure while grabbing or encoding the frame
    #[error("Capture I/O error: {0}")]
    Io(String),
}

/// Detector backend failures. An empty detection list is NOT an error.
#[derive(Debug, Error, Clone)]
pub enum DetectError {
    /// Inference backend failed on this frame
    #[error("Detector backend error: {0}")]
    Backend(String),

    /// Model weights missing or failed to load
    #[error("Detector model unavailable: {0}")]
    ModelUnavailable(String),
}
