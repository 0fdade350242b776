pub use crate::model::{MalformedRecordError, RawRecord, StructuredDocument};

/// Seam between the ingestion framework and a concrete serializer.
///
/// Implementations must be stateless per call so one instance can serve
/// records from multiple worker threads without coordination.
pub trait RecordSerializer: Send + Sync {
    /// Serialize one raw record into a structured document.
    fn serialize(&self, record: &RawRecord) -> Result<StructuredDocument, MalformedRecordError>;
}
