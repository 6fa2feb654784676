//! Statically typed packet definitions.
//!
//! A Rust struct implements [`TypedPacket`] to declare its wire name and
//! field list once; [`TypedRegistry::register_typed`] registers it and
//! [`Packet::from_typed`] / [`Packet::into_typed`] convert at the edges.

use packetwire_codec::{CodecError, Value};
use packetwire_schema::{FieldDescriptor, PacketSchema, PacketType, TypeRegistry};

use crate::error::{PacketError, Result};
use crate::packet::Packet;

/// A Rust type with a fixed packet schema.
pub trait TypedPacket: Sized {
    /// Wire identifier.
    const NAME: &'static str;

    /// Field list in wire order.
    fn fields() -> Vec<FieldDescriptor>;

    /// Field values in wire order.
    fn into_values(self) -> Vec<Value>;

    /// Rebuild from field values in wire order.
    fn from_values(values: &mut FieldValues) -> Result<Self>;

    fn schema() -> Result<PacketSchema> {
        Ok(PacketSchema::new(Self::NAME, Self::fields())?)
    }
}

/// Registration and lookup of [`TypedPacket`] types.
pub trait TypedRegistry {
    fn register_typed<T: TypedPacket>(&mut self) -> Result<PacketType>;

    fn packet_type_of<T: TypedPacket>(&self) -> Result<&PacketType>;
}

impl TypedRegistry for TypeRegistry {
    fn register_typed<T: TypedPacket>(&mut self) -> Result<PacketType> {
        Ok(self.register(T::schema()?)?)
    }

    fn packet_type_of<T: TypedPacket>(&self) -> Result<&PacketType> {
        Ok(self.resolve_by_name(T::NAME)?)
    }
}

/// Sequential access to a packet's values during [`TypedPacket::from_values`].
pub struct FieldValues {
    packet: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl FieldValues {
    fn new(packet: &'static str, values: Vec<Value>) -> Self {
        Self {
            packet,
            values: values.into_iter(),
        }
    }

    /// Take the next value, converting it to `T`.
    pub fn take<T>(&mut self, field: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = CodecError>,
    {
        let value = self
            .values
            .next()
            .ok_or_else(|| PacketError::MissingField {
                packet: self.packet.to_string(),
                field: field.to_string(),
            })?;

        T::try_from(value).map_err(|err| match err {
            CodecError::TypeMismatch { expected, found } => PacketError::TypeMismatch {
                packet: self.packet.to_string(),
                field: field.to_string(),
                expected,
                found,
            },
            other => other.into(),
        })
    }
}

impl Packet {
    /// Convert a typed value into a packet of its registered type.
    pub fn from_typed<T: TypedPacket>(registry: &TypeRegistry, value: T) -> Result<Self> {
        let packet_type = registry.packet_type_of::<T>()?;
        Packet::new(packet_type, value.into_values())
    }

    /// Convert into a typed value, checking the packet type name.
    pub fn into_typed<T: TypedPacket>(self) -> Result<T> {
        if self.name() != T::NAME {
            return Err(PacketError::WrongPacketType {
                expected: T::NAME.to_string(),
                found: self.name().to_string(),
            });
        }
        let mut values = FieldValues::new(T::NAME, self.into_values());
        T::from_values(&mut values)
    }
}
