//! Model — TransformerConfig and defaults.

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::{DEFAULT_KV_DELIMITER, DEFAULT_RECORD_SEPARATOR, DEFAULT_TIMESTAMP_WIDTH};

/// Configuration surface of the line-record transform.
///
/// Supplied once at construction by the surrounding framework and never
/// re-read mid-call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// Token splitting a raw line into logical segments.
    pub record_separator: String,
    /// Character splitting a segment into field name and value.
    pub kv_delimiter: char,
    /// Encoding used to decode record bodies. One encoding covers the whole
    /// call; there is no separate header charset.
    pub encoding: TextEncoding,
    /// Width of the fixed timestamp prefix on the first segment, in
    /// characters. A contract of the upstream log format, not inferred.
    pub timestamp_width: usize,
    /// Drop empty segments produced by adjacent separators instead of
    /// recording an empty-keyed field. The legacy serializer recorded them;
    /// disable to keep that behavior.
    pub skip_empty_segments: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            record_separator: DEFAULT_RECORD_SEPARATOR.to_string(),
            kv_delimiter: DEFAULT_KV_DELIMITER,
            encoding: TextEncoding::default(),
            timestamp_width: DEFAULT_TIMESTAMP_WIDTH,
            skip_empty_segments: true,
        }
    }
}

impl TransformerConfig {
    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.record_separator.is_empty() {
            return Err("record_separator must not be empty".to_string());
        }
        if self.timestamp_width == 0 {
            return Err("timestamp_width must be > 0".to_string());
        }
        if self.record_separator.contains(self.kv_delimiter) {
            return Err(format!(
                "kv_delimiter '{}' must not appear in record_separator {:?}",
                self.kv_delimiter, self.record_separator
            ));
        }
        Ok(())
    }
}
