//! Line-record serialization for search-engine ingestion.
//!
//! This crate converts one raw log line (byte payload plus ordered headers)
//! into a structured field-name → value document that an ingestion pipeline
//! hands to its indexing client.
//!
//! # Architecture
//!
//! - `model.rs`: record and document types plus the error enum
//! - `traits.rs`: the serializer seam implemented by concrete transforms
//! - `transform.rs`: the line-record transform itself
//! - `conf/`: configuration model and loading
//!
//! # Guarantees
//!
//! - Stateless: every call only touches its own inputs and a fresh output
//!   document, so one instance can be shared across threads
//! - Bounded memory: bodies over [`MAX_BODY_SIZE`] are rejected up front
//! - Best effort: malformed shapes (missing delimiter, duplicate keys,
//!   empty segments) degrade via a defined fallback policy instead of
//!   failing the record

pub mod conf;
pub mod encoding;
pub mod model;
pub mod traits;
pub mod transform;
mod serde_utils;

// Re-export commonly used types
pub use conf::TransformerConfig;
pub use encoding::TextEncoding;
pub use model::{MalformedRecordError, RawRecord, StructuredDocument};
pub use traits::RecordSerializer;
pub use transform::LineRecordTransformer;

// Constants
pub const MAX_BODY_SIZE: usize = 1_048_576; // 1MB
pub const DEFAULT_RECORD_SEPARATOR: &str = "|";
pub const DEFAULT_KV_DELIMITER: char = ':';
/// Width of the fixed timestamp prefix on the first segment, in characters.
pub const DEFAULT_TIMESTAMP_WIDTH: usize = 23;
