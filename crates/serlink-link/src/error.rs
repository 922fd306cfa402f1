/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Serial line error.
    #[error("transport error: {0}")]
    Transport(#[from] serlink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] serlink_frame::FrameError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
