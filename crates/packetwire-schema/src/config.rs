/// Limits applied while populating a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum bytes allowed for a definition file loaded from disk.
    pub max_definition_file_size: usize,
    /// Maximum number of packet types a registry accepts.
    pub max_packet_types: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_definition_file_size: 256 * 1024,
            max_packet_types: 4096,
        }
    }
}
