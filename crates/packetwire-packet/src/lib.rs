//! Self-describing typed packets.
//!
//! Every packet is serialized as its length-prefixed type name followed by
//! each field in schema order:
//!
//! ```text
//! packet := id_len:varint  id:utf8[id_len]  field_1 .. field_n
//! ```
//!
//! There is no outer length prefix. Packet boundaries fall out of the
//! per-field encoding, so [`PacketReader`] can pull packet after packet off
//! one stream.

pub mod builder;
pub mod error;
pub mod packet;
pub mod reader;
pub mod typed;
pub mod writer;

pub use builder::PacketBuilder;
pub use error::{PacketError, Result};
pub use packet::Packet;
pub use reader::{PacketReader, Packets};
pub use typed::{FieldValues, TypedPacket, TypedRegistry};
pub use writer::PacketWriter;

pub use packetwire_codec::{CodecConfig, FieldType, Value};
pub use packetwire_schema::{PacketSchema, PacketType, TypeRegistry};
