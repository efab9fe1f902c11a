//! Error types for remote fetch operations

use std::fmt;

/// Errors raised while querying a remote source. Each variant names the
/// offending source; any of them fails the whole refresh.
#[derive(Debug)]
pub enum DataFetchError {
    /// The request could not be sent or timed out.
    Request { source: String, message: String },

    /// The source answered with a non-success status.
    Status { source: String, status: u16 },

    /// The response body was not the expected JSON shape.
    Decode { source: String, message: String },
}

impl fmt::Display for DataFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { source, message } => {
                write!(f, "request to source '{source}' failed: {message}")
            }
            Self::Status { source, status } => {
                write!(f, "source '{source}' returned status {status}")
            }
            Self::Decode { source, message } => {
                write!(f, "source '{source}' returned a malformed body: {message}")
            }
        }
    }
}

impl std::error::Error for DataFetchError {}

impl DataFetchError {
    /// Label of the source this error came from.
    pub fn source_label(&self) -> &str {
        match self {
            Self::Request { source, .. }
            | Self::Status { source, .. }
            | Self::Decode { source, .. } => source,
        }
    }
}
