//! Packet definitions loaded from JSON.
//!
//! ```json
//! {
//!   "packets": [
//!     { "name": "Move", "fields": [
//!         { "name": "x", "type": "int" },
//!         { "name": "label", "type": "string" }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Field type tags are `int`, `float`, `string` and `bytes`.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use packetwire_codec::FieldType;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::registry::TypeRegistry;
use crate::schema::{FieldDescriptor, PacketSchema, PacketType};

/// Top-level shape of a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionFile {
    pub packets: Vec<PacketDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl PacketDefinition {
    /// Convert into a validated schema.
    pub fn to_schema(&self) -> Result<PacketSchema> {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                FieldType::from_name(&field.ty)
                    .map(|ty| FieldDescriptor::new(field.name.clone(), ty))
                    .ok_or_else(|| SchemaError::UnknownFieldType {
                        field: field.name.clone(),
                        ty: field.ty.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        PacketSchema::new(self.name.clone(), fields)
    }
}

impl From<&PacketSchema> for PacketDefinition {
    fn from(schema: &PacketSchema) -> Self {
        Self {
            name: schema.name().to_string(),
            fields: schema
                .fields()
                .iter()
                .map(|field| FieldDefinition {
                    name: field.name().to_string(),
                    ty: field.field_type().name().to_string(),
                })
                .collect(),
        }
    }
}

impl TypeRegistry {
    /// Build a registry from a JSON definition string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_str_with_config(json, RegistryConfig::default())
    }

    /// Build a registry from a JSON definition string with explicit config.
    pub fn from_json_str_with_config(json: &str, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        registry.register_json(json)?;
        Ok(registry)
    }

    /// Load a registry from a JSON definition file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with_config(path, RegistryConfig::default())
    }

    /// Load a registry from a JSON definition file with explicit config.
    pub fn from_file_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|err| {
            SchemaError::LoadFailed(format!("failed opening {}: {err}", path.display()))
        })?;
        let metadata = file
            .metadata()
            .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

        let max_bytes = config.max_definition_file_size;
        if metadata.len() > max_bytes as u64 {
            return Err(SchemaError::LoadFailed(format!(
                "definition file too large ({} bytes): {}",
                metadata.len(),
                path.display()
            )));
        }

        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| {
                SchemaError::LoadFailed(format!("failed reading {}: {err}", path.display()))
            })?;
        if content.len() > max_bytes {
            return Err(SchemaError::LoadFailed(format!(
                "definition file too large while reading: {}",
                path.display()
            )));
        }

        Self::from_json_str_with_config(&content, config)
    }

    /// Register every packet in a JSON definition string, in file order.
    ///
    /// The load is all-or-nothing: see [`TypeRegistry::register_definitions`].
    pub fn register_json(&mut self, json: &str) -> Result<Vec<PacketType>> {
        let file: DefinitionFile = serde_json::from_str(json)?;
        self.register_definitions(&file)
    }

    /// Register every packet in a parsed definition file, in order.
    ///
    /// Every entry is validated first. A malformed entry, a name repeated
    /// within the file, a name already held by this registry, or a file
    /// that would exceed `max_packet_types` fails the load and leaves the
    /// registry unchanged.
    pub fn register_definitions(&mut self, file: &DefinitionFile) -> Result<Vec<PacketType>> {
        let schemas = file
            .packets
            .iter()
            .map(PacketDefinition::to_schema)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::with_capacity(schemas.len());
        for schema in &schemas {
            if !seen.insert(schema.name()) || self.contains(schema.name()) {
                return Err(SchemaError::DuplicateName(schema.name().to_string()));
            }
        }

        let max = self.config().max_packet_types;
        if self.len().saturating_add(schemas.len()) > max {
            return Err(SchemaError::RegistryFull { max });
        }

        schemas
            .into_iter()
            .map(|schema| self.register(schema))
            .collect()
    }

    /// Export the registered types as a definition file.
    pub fn to_definitions(&self) -> DefinitionFile {
        DefinitionFile {
            packets: self
                .types()
                .map(|ty| PacketDefinition::from(ty.schema()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const DEFS: &str = r#"{
        "packets": [
            { "name": "Move", "fields": [
                { "name": "x", "type": "int" },
                { "name": "y", "type": "int" },
                { "name": "label", "type": "string" }
            ] },
            { "name": "Blob", "fields": [
                { "name": "data", "type": "bytes" },
                { "name": "weight", "type": "float" }
            ] },
            { "name": "Ping" }
        ]
    }"#;

    #[test]
    fn loads_packets_in_order() {
        let registry = TypeRegistry::from_json_str(DEFS).unwrap();
        assert_eq!(registry.names(), vec!["Move", "Blob", "Ping"]);

        let blob = registry.resolve_by_name("Blob").unwrap();
        assert_eq!(
            blob.schema().field("weight").map(FieldDescriptor::field_type),
            Some(FieldType::Float)
        );
        assert!(registry.resolve_by_name("Ping").unwrap().schema().is_empty());
    }

    #[test]
    fn unknown_field_type_rejected() {
        let json = r#"{"packets":[{"name":"P","fields":[{"name":"a","type":"uuid"}]}]}"#;
        assert!(matches!(
            TypeRegistry::from_json_str(json),
            Err(SchemaError::UnknownFieldType { ty, .. }) if ty == "uuid"
        ));
    }

    #[test]
    fn duplicate_packet_names_rejected() {
        let mut registry = TypeRegistry::new();
        let json = r#"{"packets":[
            {"name":"Good","fields":[]},
            {"name":"Good","fields":[{"name":"a","type":"int"}]}
        ]}"#;
        assert!(matches!(
            registry.register_json(json),
            Err(SchemaError::DuplicateName(name)) if name == "Good"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn identical_repeated_entry_rejected() {
        let json = r#"{"packets":[
            {"name":"Dup","fields":[{"name":"a","type":"int"}]},
            {"name":"Dup","fields":[{"name":"a","type":"int"}]}
        ]}"#;
        assert!(matches!(
            TypeRegistry::from_json_str(json),
            Err(SchemaError::DuplicateName(name)) if name == "Dup"
        ));
    }

    #[test]
    fn clash_with_registered_name_leaves_registry_unchanged() {
        let mut registry = TypeRegistry::new();
        registry
            .register(PacketSchema::builder("Taken").int("a").build().unwrap())
            .unwrap();

        let json = r#"{"packets":[
            {"name":"Fresh","fields":[]},
            {"name":"Taken","fields":[{"name":"a","type":"int"}]}
        ]}"#;
        assert!(matches!(
            registry.register_json(json),
            Err(SchemaError::DuplicateName(name)) if name == "Taken"
        ));
        assert_eq!(registry.names(), vec!["Taken"]);
    }

    #[test]
    fn capacity_checked_before_registering() {
        let config = RegistryConfig {
            max_packet_types: 2,
            ..RegistryConfig::default()
        };
        let mut registry = TypeRegistry::with_config(config);
        let json = r#"{"packets":[
            {"name":"A","fields":[]},
            {"name":"B","fields":[]},
            {"name":"C","fields":[]}
        ]}"#;
        assert!(matches!(
            registry.register_json(json),
            Err(SchemaError::RegistryFull { max: 2 })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn malformed_entry_leaves_registry_unchanged() {
        let mut registry = TypeRegistry::new();
        let json = r#"{"packets":[
            {"name":"Good","fields":[]},
            {"name":"Bad","fields":[{"name":"a","type":"nope"}]}
        ]}"#;
        assert!(registry.register_json(json).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(matches!(
            TypeRegistry::from_json_str("not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn definitions_roundtrip_through_registry() {
        let registry = TypeRegistry::from_json_str(DEFS).unwrap();
        let exported = registry.to_definitions();
        let json = serde_json::to_string(&exported).unwrap();
        let reloaded = TypeRegistry::from_json_str(&json).unwrap();
        assert_eq!(reloaded.to_definitions(), exported);
    }

    fn make_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "packetwire-schema-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn from_file_loads_definitions() {
        let dir = make_temp_dir("from-file");
        let path = dir.join("packets.json");
        std::fs::write(&path, DEFS).unwrap();

        let registry = TypeRegistry::from_file(&path).unwrap();
        assert_eq!(registry.len(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn from_file_enforces_size_limit() {
        let dir = make_temp_dir("size-limit");
        let path = dir.join("packets.json");
        std::fs::write(&path, DEFS).unwrap();

        let config = RegistryConfig {
            max_definition_file_size: 8,
            ..RegistryConfig::default()
        };
        let result = TypeRegistry::from_file_with_config(&path, config);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_load_error() {
        let result = TypeRegistry::from_file(Path::new("/nonexistent/packetwire/defs.json"));
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
    }
}
