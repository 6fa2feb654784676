//! Self-describing typed packets with a compact varint wire format.
//!
//! A packet is a named, ordered set of typed fields. It serializes as its
//! length-prefixed type name followed by each field, so a receiver holding
//! the same packet definitions can decode packet after packet off one byte
//! stream with no outer framing.
//!
//! # Crate Structure
//!
//! - [`codec`]: varint and per-field-type encoding
//! - [`schema`]: packet schemas and the type registry
//! - [`packet`]: packets, stream readers and writers
//! - [`server`]: threaded TCP server and client (behind `server` feature)
//!
//! ```
//! use packetwire::{Packet, PacketSchema, TypeRegistry, Value};
//!
//! let mut registry = TypeRegistry::new();
//! let point = registry
//!     .register(PacketSchema::builder("Point").int("x").int("y").build()?)?;
//!
//! let packet = Packet::new(&point, vec![Value::Int(32), Value::Int(5030)])?;
//! let wire = packet.serialize(&registry)?;
//! let (decoded, rest) = Packet::deserialize(&wire, &registry)?;
//! assert_eq!(decoded, packet);
//! assert!(rest.is_empty());
//! # Ok::<(), packetwire::packet::PacketError>(())
//! ```

/// Re-export codec types.
pub mod codec {
    pub use packetwire_codec::*;
}

/// Re-export schema and registry types.
pub mod schema {
    pub use packetwire_schema::*;
}

/// Re-export packet types.
pub mod packet {
    pub use packetwire_packet::*;
}

/// Re-export server types (requires `server` feature).
#[cfg(feature = "server")]
pub mod server {
    pub use packetwire_server::*;
}

pub use packetwire_codec::{FieldType, Value};
pub use packetwire_packet::{Packet, PacketReader, PacketWriter, TypedPacket, TypedRegistry};
pub use packetwire_schema::{FieldDescriptor, PacketSchema, PacketType, TypeRegistry};
