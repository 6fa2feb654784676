use std::io::Read;
use std::sync::Arc;

use packetwire_codec::CodecConfig;
use packetwire_schema::TypeRegistry;

use crate::error::{PacketError, Result};
use crate::packet::Packet;

/// Reads consecutive packets from any `Read` stream.
///
/// Each call consumes exactly one packet's bytes. Only one reader may pull
/// from a given stream; interleaved readers would split packets.
pub struct PacketReader<R> {
    inner: R,
    registry: Arc<TypeRegistry>,
    config: CodecConfig,
}

impl<R: Read> PacketReader<R> {
    /// Create a new packet reader with default codec limits.
    pub fn new(inner: R, registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(inner, registry, CodecConfig::default())
    }

    /// Create a new packet reader with explicit codec limits.
    pub fn with_config(inner: R, registry: Arc<TypeRegistry>, config: CodecConfig) -> Self {
        Self {
            inner,
            registry,
            config,
        }
    }

    /// Read the next packet (blocking).
    ///
    /// Returns `Err(PacketError::EndOfStream)` when the stream ends between
    /// packets.
    pub fn read_packet(&mut self) -> Result<Packet> {
        Packet::deserialize_from(&mut self.inner, &self.registry, &self.config)
    }

    /// Iterate over packets until the stream ends cleanly.
    ///
    /// The first error other than end of stream is yielded and ends the
    /// iteration.
    pub fn packets(&mut self) -> Packets<'_, R> {
        Packets {
            reader: self,
            done: false,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// The registry used to resolve wire identifiers.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Current codec limits.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

/// Iterator returned by [`PacketReader::packets`].
pub struct Packets<'a, R> {
    reader: &'a mut PacketReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Packets<'_, R> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_packet() {
            Ok(packet) => Some(Ok(packet)),
            Err(PacketError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
