use std::path::PathBuf;

/// Errors that can occur on a serial line.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device at the specified path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to apply line settings (baud rate, raw mode) to the device.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the line.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of the line is gone.
    #[error("serial line closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
