use thiserror::Error;

/// Internal persistence failures. Never escapes [`crate::PollRecorder::record`];
/// surfaced only in logs.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Trace I/O error: {0}")]
    Io(String),

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Annotation encode failed: {0}")]
    Encode(String),
}

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        TraceError::Io(err.to_string())
    }
}
