use std::fmt;

use bytes::Bytes;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::serde_utils::serialize_fields_as_map;

#[derive(Debug, Error)]
pub enum MalformedRecordError {
    #[error("Body is not valid {0} text")]
    InvalidEncoding(&'static str),

    #[error("First segment is {len} characters, timestamp prefix needs {required}")]
    TimestampTooShort { len: usize, required: usize },

    #[error("Body too large: {0} bytes (max: {1} bytes)")]
    BodyTooLarge(usize, usize),
}

/// One ingested log line plus the headers the transport attached to it.
///
/// Produced by the upstream pipeline per record; only borrowed for the
/// duration of one transform call, never retained.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Raw bytes of the log line body.
    pub body: Bytes,

    /// Header key/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            headers: Vec::new(),
        }
    }

    /// Append one header, keeping arrival order.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Insertion-ordered field-name → value mapping produced per record.
///
/// Field names are unique: writing an existing name overwrites the value in
/// place and keeps the name's original position (last write wins). The
/// caller serializes the document to whatever wire format its indexing
/// backend expects; via serde it comes out as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDocument {
    fields: Vec<(String, String)>,
}

impl StructuredDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for StructuredDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_fields_as_map(&self.fields, serializer)
    }
}

impl<'de> Deserialize<'de> for StructuredDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DocVisitor;

        impl<'de> Visitor<'de> for DocVisitor {
            type Value = StructuredDocument;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to string values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                // Insert entry by entry so duplicate keys in the source
                // collapse to last-write-wins, same as when the document
                // is built.
                let mut doc = StructuredDocument::new();
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    doc.insert(key, value);
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocVisitor)
    }
}
