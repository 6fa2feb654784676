use packetwire_codec::Value;
use packetwire_schema::PacketType;

use crate::error::{PacketError, Result};
use crate::packet::Packet;

/// Binds positional and named values to a packet type's fields.
///
/// Positional values fill the leading fields in order; named values fill
/// their field by name. Nothing is validated until [`PacketBuilder::build`].
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    packet_type: PacketType,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl PacketBuilder {
    pub fn new(packet_type: &PacketType) -> Self {
        Self {
            packet_type: packet_type.clone(),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Supply the next positional value.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Supply a value by field name.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Bind all values and build the packet.
    pub fn build(self) -> Result<Packet> {
        let schema = self.packet_type.schema();
        let packet = schema.name();

        if self.positional.len() > schema.len() {
            return Err(PacketError::TooManyArguments {
                packet: packet.to_string(),
                expected: schema.len(),
                found: self.positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = (0..schema.len()).map(|_| None).collect();
        for (slot, value) in slots.iter_mut().zip(self.positional) {
            *slot = Some(value);
        }

        for (name, value) in self.named {
            let index = schema
                .index_of(&name)
                .ok_or_else(|| PacketError::UnknownField {
                    packet: packet.to_string(),
                    field: name.clone(),
                })?;
            if slots[index].replace(value).is_some() {
                return Err(PacketError::MultipleValues {
                    packet: packet.to_string(),
                    field: name,
                });
            }
        }

        let values = slots
            .into_iter()
            .zip(schema.fields())
            .map(|(slot, field)| {
                slot.ok_or_else(|| PacketError::MissingField {
                    packet: packet.to_string(),
                    field: field.name().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Packet::new(&self.packet_type, values)
    }
}
