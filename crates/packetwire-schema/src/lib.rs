//! Packet schemas and the packet type registry.
//!
//! A [`PacketSchema`] is an ordered list of [`FieldDescriptor`]s bound to a
//! packet name. Registering it in a [`TypeRegistry`] yields a [`PacketType`]
//! handle, which is what packets are built from and what the wire identifier
//! resolves back to on decode.
//!
//! Registries are populated during startup (`&mut`) and shared read-only
//! afterwards, typically behind an `Arc`.

pub mod config;
pub mod definitions;
pub mod error;
pub mod registry;
pub mod schema;

pub use config::RegistryConfig;
pub use definitions::{DefinitionFile, FieldDefinition, PacketDefinition};
pub use error::{Result, SchemaError};
pub use registry::TypeRegistry;
pub use schema::{FieldDescriptor, PacketSchema, PacketType, SchemaBuilder};
