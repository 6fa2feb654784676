/// Errors that can occur while defining or resolving packet types.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Packet and field names must be non-empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A schema declares the same field name twice.
    #[error("duplicate field `{field}` in packet `{packet}`")]
    DuplicateField { packet: String, field: String },

    /// The name is already taken by a different type, or repeated in a
    /// definition load.
    #[error("packet name `{0}` is already registered")]
    DuplicateName(String),

    /// No packet type is registered under this wire identifier.
    #[error("unknown packet type `{0}`")]
    UnknownType(String),

    /// The packet type handle was not registered in this registry.
    #[error("packet type `{0}` is not registered")]
    UnregisteredType(String),

    /// A definition names a field type outside the supported set.
    #[error("unknown field type `{ty}` for field `{field}`")]
    UnknownFieldType { field: String, ty: String },

    /// The registry reached its configured capacity.
    #[error("registry full ({max} packet types)")]
    RegistryFull { max: usize },

    /// A definition file could not be loaded.
    #[error("failed to load definitions: {0}")]
    LoadFailed(String),

    /// A definition file is not valid JSON for the expected shape.
    #[error("invalid definition JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
