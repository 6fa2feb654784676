use std::fmt;
use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};
use packetwire_codec::{
    read_length_delimited, varint, CodecConfig, CodecError, FieldType, Value,
};
use packetwire_schema::{FieldDescriptor, PacketType, TypeRegistry};
use tracing::debug;

use crate::builder::PacketBuilder;
use crate::error::{PacketError, Result};

/// A value for every field of a registered packet type, in schema order.
#[derive(Debug, Clone)]
pub struct Packet {
    packet_type: PacketType,
    values: Vec<Value>,
}

impl Packet {
    /// Build a packet from positional values.
    ///
    /// Arity and every value's type are checked here; a packet that exists
    /// always matches its schema.
    pub fn new(packet_type: &PacketType, values: Vec<Value>) -> Result<Self> {
        let schema = packet_type.schema();
        if values.len() > schema.len() {
            return Err(PacketError::TooManyArguments {
                packet: schema.name().to_string(),
                expected: schema.len(),
                found: values.len(),
            });
        }
        if let Some(field) = schema.fields().get(values.len()) {
            return Err(PacketError::MissingField {
                packet: schema.name().to_string(),
                field: field.name().to_string(),
            });
        }

        for (field, value) in schema.fields().iter().zip(&values) {
            check_field(packet_type, field, value)?;
        }

        Ok(Self {
            packet_type: packet_type.clone(),
            values,
        })
    }

    /// Build a packet from a mix of positional and named values.
    pub fn builder(packet_type: &PacketType) -> PacketBuilder {
        PacketBuilder::new(packet_type)
    }

    pub fn packet_type(&self) -> &PacketType {
        &self.packet_type
    }

    pub fn name(&self) -> &str {
        self.packet_type.name()
    }

    /// Field values in schema order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// `(field name, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.packet_type
            .schema()
            .fields()
            .iter()
            .map(FieldDescriptor::name)
            .zip(&self.values)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.packet_type
            .schema()
            .index_of(field)
            .map(|index| &self.values[index])
    }

    /// Replace one field's value, rejecting values of the wrong type.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let schema = self.packet_type.schema();
        let index = schema
            .index_of(field)
            .ok_or_else(|| PacketError::UnknownField {
                packet: schema.name().to_string(),
                field: field.to_string(),
            })?;
        check_field(&self.packet_type, &schema.fields()[index], &value)?;
        self.values[index] = value;
        Ok(())
    }

    /// Serialize to a fresh buffer.
    pub fn serialize(&self, registry: &TypeRegistry) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.serialize_into(registry, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append `varint(len(id)) ++ id ++ field_1 .. field_n` to `dst`.
    ///
    /// The identifier is resolved through `registry`; a packet built from a
    /// type registered elsewhere is rejected before anything is written.
    pub fn serialize_into(&self, registry: &TypeRegistry, dst: &mut BytesMut) -> Result<()> {
        let id = registry.resolve_name(&self.packet_type)?;

        varint::encode_into(id.len() as u64, dst);
        dst.put_slice(id.as_bytes());
        for (field, value) in self.packet_type.schema().fields().iter().zip(&self.values) {
            field.field_type().encode(value, dst)?;
        }
        Ok(())
    }

    /// Deserialize one packet from the front of `src`, returning it and the
    /// bytes that follow.
    pub fn deserialize<'a>(src: &'a [u8], registry: &TypeRegistry) -> Result<(Self, &'a [u8])> {
        let mut rest = src;
        let packet = Self::deserialize_from(&mut rest, registry, &CodecConfig::default())?;
        Ok((packet, rest))
    }

    /// Deserialize one packet from a blocking stream, consuming exactly its
    /// bytes.
    ///
    /// Returns [`PacketError::EndOfStream`] if the stream is already at its
    /// end. Running out of bytes anywhere after the first surfaces as the
    /// codec's termination or truncation error.
    pub fn deserialize_from<R: Read + ?Sized>(
        src: &mut R,
        registry: &TypeRegistry,
        config: &CodecConfig,
    ) -> Result<Self> {
        let id: String = match read_length_delimited(src, config.max_payload_len) {
            Ok(id) => id,
            Err(CodecError::Unterminated { consumed: 0 }) => return Err(PacketError::EndOfStream),
            Err(err) => return Err(err.into()),
        };
        let packet_type = registry.resolve_by_name(&id)?;

        let values = packet_type
            .schema()
            .fields()
            .iter()
            .map(|field| field.field_type().decode(src, config))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(packet = %id, fields = values.len(), "decoded packet");
        Ok(Self {
            packet_type: packet_type.clone(),
            values,
        })
    }
}

/// Packets are equal when they share a packet type name and every field
/// value is equal.
impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.values == other.values
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

pub(crate) fn check_field(
    packet_type: &PacketType,
    field: &FieldDescriptor,
    value: &Value,
) -> Result<()> {
    let expected: FieldType = field.field_type();
    field
        .field_type()
        .check(value)
        .map_err(|_| PacketError::TypeMismatch {
            packet: packet_type.name().to_string(),
            field: field.name().to_string(),
            expected,
            found: value.field_type(),
        })
}
