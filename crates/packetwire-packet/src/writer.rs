use std::io::{ErrorKind, Write};
use std::sync::Arc;

use bytes::BytesMut;
use packetwire_schema::TypeRegistry;
use tracing::debug;

use crate::error::{PacketError, Result};
use crate::packet::Packet;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete packets to any `Write` stream.
pub struct PacketWriter<W> {
    inner: W,
    registry: Arc<TypeRegistry>,
    buf: BytesMut,
}

impl<W: Write> PacketWriter<W> {
    pub fn new(inner: W, registry: Arc<TypeRegistry>) -> Self {
        Self {
            inner,
            registry,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Serialize and write one packet, then flush (blocking).
    ///
    /// The packet is fully serialized before any byte reaches the stream, so
    /// an encoding failure never leaves a partial packet behind. Only
    /// `Interrupted` is retried; an expired socket write timeout surfaces as
    /// `PacketError::Io` with `WouldBlock` or `TimedOut`.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        self.buf.clear();
        packet.serialize_into(&self.registry, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(PacketError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }
        debug!(packet = packet.name(), bytes = self.buf.len(), "wrote packet");

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// The registry used to resolve wire identifiers.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}
