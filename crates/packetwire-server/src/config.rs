use std::time::Duration;

use packetwire_codec::CodecConfig;

/// Socket and codec settings applied to each connection, on either side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Read timeout on the socket. `None` blocks until the peer sends or
    /// closes.
    pub read_timeout: Option<Duration>,
    /// Write timeout on the socket.
    pub write_timeout: Option<Duration>,
    /// Limits applied while decoding packets.
    pub codec: CodecConfig,
}

impl ServerConfig {
    pub(crate) fn apply(&self, stream: &std::net::TcpStream) -> std::io::Result<()> {
        stream.set_read_timeout(self.read_timeout)?;
        stream.set_write_timeout(self.write_timeout)?;
        Ok(())
    }
}
