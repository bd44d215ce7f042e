//! Error types for mjpeg-reframe.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting or reading a reframed stream.
///
/// Running out of input is not an error, and neither is an oversize frame:
/// both are reported through [`crate::ConversionStats`].
#[derive(Debug, Error)]
pub enum ReframeError {
    /// Input file could not be opened. Nothing has been written.
    #[error("failed to open input {path:?}: {source}")]
    SourceOpen { path: PathBuf, source: io::Error },

    /// Output file could not be created.
    #[error("failed to create output {path:?}: {source}")]
    SinkOpen { path: PathBuf, source: io::Error },

    /// Read failure other than end of stream.
    #[error("failed to read input: {0}")]
    SourceRead(#[source] io::Error),

    /// Write failure. Bytes written before it stay in the output.
    #[error("failed to write output: {0}")]
    SinkWrite(#[source] io::Error),

    /// Record header is not 5 ASCII digits.
    #[error("invalid length header {0:02X?}")]
    InvalidHeader([u8; 5]),

    /// Stream ended inside a record.
    #[error("truncated record: expected {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },
}

/// Result type alias using ReframeError.
pub type Result<T> = std::result::Result<T, ReframeError>;
