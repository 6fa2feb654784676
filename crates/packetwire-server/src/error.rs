/// Errors that can occur in the packet server or a client connection.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Packet encoding or decoding failed.
    #[error("packet error: {0}")]
    Packet(#[from] packetwire_packet::PacketError),

    /// Binding the listening socket failed.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// An event name that was never added.
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    /// A lock was poisoned by a panicking event handler.
    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),

    /// The accept loop thread panicked.
    #[error("shutdown failed: {0}")]
    ShutdownFailed(String),

    /// Socket-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
