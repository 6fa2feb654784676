use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;

use packetwire_packet::{Packet, PacketReader, PacketWriter, TypeRegistry};
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::Result;

/// Client side of a packet stream over TCP.
pub struct PacketConnection {
    reader: PacketReader<TcpStream>,
    writer: PacketWriter<TcpStream>,
    peer_addr: SocketAddr,
}

impl PacketConnection {
    /// Connect with default settings.
    pub fn connect(addr: impl ToSocketAddrs, registry: Arc<TypeRegistry>) -> Result<Self> {
        Self::connect_with_config(addr, registry, ServerConfig::default())
    }

    /// Connect, applying socket timeouts and codec limits from `config`.
    pub fn connect_with_config(
        addr: impl ToSocketAddrs,
        registry: Arc<TypeRegistry>,
        config: ServerConfig,
    ) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        config.apply(&stream)?;
        let peer_addr = stream.peer_addr()?;
        let writer_stream = stream.try_clone()?;
        debug!(%peer_addr, "connected");

        Ok(Self {
            reader: PacketReader::with_config(stream, Arc::clone(&registry), config.codec),
            writer: PacketWriter::new(writer_stream, registry),
            peer_addr,
        })
    }

    /// Send one packet (blocking).
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        self.writer.write_packet(packet)?;
        Ok(())
    }

    /// Receive the next packet (blocking).
    ///
    /// Fails with `PacketError::EndOfStream` once the server closes the
    /// connection.
    pub fn recv(&mut self) -> Result<Packet> {
        Ok(self.reader.read_packet()?)
    }

    /// Stop sending. The server sees a clean end of stream; replies can
    /// still be received.
    pub fn finish(&self) -> Result<()> {
        self.writer.get_ref().shutdown(Shutdown::Write)?;
        Ok(())
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.reader.get_ref().local_addr()?)
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.reader.registry()
    }
}
