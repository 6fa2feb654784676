use std::collections::HashMap;

use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::schema::{PacketSchema, PacketType};

/// Bidirectional mapping between packet types and their wire identifiers.
///
/// Registration takes `&mut self`; resolution takes `&self`. Populate the
/// registry at startup, then share it (e.g. in an `Arc`) with every encoder
/// and decoder.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<PacketType>,
    by_name: HashMap<String, usize>,
    config: RegistryConfig,
}

impl TypeRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            types: Vec::new(),
            by_name: HashMap::new(),
            config,
        }
    }

    /// Register a schema under its name and return the type handle.
    ///
    /// Registering a schema identical to the one already held under the same
    /// name returns the existing handle. Any other reuse of a name fails with
    /// [`SchemaError::DuplicateName`].
    pub fn register(&mut self, schema: PacketSchema) -> Result<PacketType> {
        if let Some(&index) = self.by_name.get(schema.name()) {
            let existing = &self.types[index];
            if existing.schema() == &schema {
                return Ok(existing.clone());
            }
            return Err(SchemaError::DuplicateName(schema.name().to_string()));
        }

        if self.types.len() >= self.config.max_packet_types {
            return Err(SchemaError::RegistryFull {
                max: self.config.max_packet_types,
            });
        }

        let name = schema.name().to_string();
        let packet_type = PacketType::new(schema);
        debug!(
            packet = %name,
            fields = packet_type.schema().len(),
            "registered packet type"
        );

        self.by_name.insert(name, self.types.len());
        self.types.push(packet_type.clone());
        Ok(packet_type)
    }

    /// Resolve a wire identifier to its packet type.
    pub fn resolve_by_name(&self, name: &str) -> Result<&PacketType> {
        self.by_name
            .get(name)
            .map(|&index| &self.types[index])
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Resolve a packet type to its wire identifier.
    ///
    /// Fails if the handle was not produced by this registry.
    pub fn resolve_name(&self, packet_type: &PacketType) -> Result<&str> {
        match self.by_name.get(packet_type.name()) {
            Some(&index) if self.types[index] == *packet_type => Ok(self.types[index].name()),
            _ => Err(SchemaError::UnregisteredType(
                packet_type.name().to_string(),
            )),
        }
    }

    /// Check if a wire identifier is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &PacketType> {
        self.types.iter()
    }

    /// Registered wire identifiers in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.types.iter().map(PacketType::name).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}
