use thiserror::Error;

/// Top-level error type used across the entire application.
///
/// None of these are fatal inside the polling loop: callers log them and
/// fall back to an empty or previous value.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("config error: {0}")]
    Config(String),

    /// A sensor was not found or stopped answering.
    #[error("hardware absent: {0}")]
    HardwareAbsent(String),

    /// Network or storage unreachable.
    #[error("transport error: {0}")]
    Transport(String),

    /// Unparsable log line, feed payload or timestamp.
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("unknown view {0}")]
    UnknownView(u8),

    #[error("display error: {0}")]
    Display(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = PortalError> = std::result::Result<T, E>;
