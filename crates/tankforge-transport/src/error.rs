/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// An inbound line exceeded the configured maximum length.
    ///
    /// The offending line is discarded; the connection stays usable.
    #[error("frame exceeds {max} bytes")]
    FrameTooLong { max: usize },

    /// An inbound line was not valid UTF-8.
    ///
    /// The offending line is discarded; the connection stays usable.
    #[error("inbound frame is not valid UTF-8")]
    NotUtf8,

    /// Outbound data was not valid UTF-8 and cannot be sent as a line.
    #[error("outbound frame is not valid UTF-8")]
    InvalidFrame,
}

impl TransportError {
    /// Returns `true` if the connection can keep receiving after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FrameTooLong { .. } | Self::NotUtf8)
    }
}
