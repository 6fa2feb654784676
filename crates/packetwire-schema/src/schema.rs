use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use packetwire_codec::FieldType;

use crate::error::{Result, SchemaError};

/// One named, typed slot in a packet schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    ty: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }
}

/// An ordered list of field descriptors bound to a packet name.
///
/// Field order is the wire order. Schemas are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl PacketSchema {
    /// Start building a schema for the named packet.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Build a schema from an ordered field list.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    packet: name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the named field in wire order.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for PacketSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.ty)?;
        }
        f.write_str(")")
    }
}

/// Declarative schema construction in field order.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDescriptor::new(name, ty));
        self
    }

    pub fn int(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Int)
    }

    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Float)
    }

    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Str)
    }

    pub fn bytes(self, name: impl Into<String>) -> Self {
        self.field(name, FieldType::Bytes)
    }

    pub fn build(self) -> Result<PacketSchema> {
        PacketSchema::new(self.name, self.fields)
    }
}

/// Handle to a registered packet type.
///
/// Cheap to clone. Two handles are equal only when they come from the same
/// registration, not merely from structurally equal schemas.
#[derive(Debug, Clone)]
pub struct PacketType(Arc<PacketSchema>);

impl PacketType {
    pub(crate) fn new(schema: PacketSchema) -> Self {
        Self(Arc::new(schema))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn schema(&self) -> &PacketSchema {
        &self.0
    }
}

impl PartialEq for PacketType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for PacketType {}

impl Hash for PacketType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
