use std::path::PathBuf;

use thiserror::Error;

/// Errors that can escape the scanning engine or its input validation.
///
/// Refused and timed out connections are not errors. They are reported as
/// [`PortState::Closed`](crate::network::port::PortState::Closed).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not resolve hostname: {name} ({reason})")]
    Resolution { name: String, reason: String },

    #[error("invalid port range {start}-{end}: expected 1 <= start <= end <= 65535")]
    InvalidRange { start: u32, end: u32 },

    #[error("invalid port specification: '{0}'")]
    InvalidPortSpec(String),

    #[error("concurrency limit must be a positive integer")]
    InvalidConcurrency,

    #[error("invalid choice: '{0}'")]
    InvalidChoice(String),

    #[error("could not read target file {}: {source}", path.display())]
    TargetFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target file {} contains no targets", path.display())]
    EmptyTargetFile { path: PathBuf },

    #[error("could not write to result file {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scan was cancelled before this target")]
    Cancelled,

    #[error("malformed scan record: '{0}'")]
    MalformedRecord(String),
}
