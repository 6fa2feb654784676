/// Default maximum length-delimited payload: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Limits applied while decoding values from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum payload size of a single string or bytes value. Checked before
    /// any buffer is allocated.
    pub max_payload_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD,
        }
    }
}
