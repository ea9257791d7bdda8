//! Error types for the alignment engine

use std::fmt;

/// Errors that can occur while fingerprinting or aligning clips
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// Invalid input parameters or configuration
    InvalidInput(String),

    /// Audio decoding error (unsupported codec, no audio track, ...)
    DecodingError(String),

    /// Not enough spectral data to estimate a delay
    ///
    /// Raised when a buffer yields no full window, or when the two
    /// fingerprints share no frequency at all.
    InsufficientData(String),

    /// No reference clip survived candidate filtering
    NoCandidate(String),

    /// Filesystem error (missing file, unwritable cache directory, ...)
    IoError(String),
}

impl AlignError {
    /// Whether this error only means "this pair could not be compared"
    ///
    /// Candidate selection skips such candidates instead of aborting.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AlignError::InsufficientData(_))
    }
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AlignError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AlignError::InsufficientData(msg) => write!(f, "Insufficient data to align: {}", msg),
            AlignError::NoCandidate(msg) => write!(f, "No candidate available: {}", msg),
            AlignError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AlignError {}

impl From<std::io::Error> for AlignError {
    fn from(err: std::io::Error) -> Self {
        AlignError::IoError(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for AlignError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(e) => AlignError::IoError(e.to_string()),
            other => AlignError::DecodingError(other.to_string()),
        }
    }
}

impl From<hound::Error> for AlignError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AlignError::IoError(e.to_string()),
            other => AlignError::DecodingError(other.to_string()),
        }
    }
}
