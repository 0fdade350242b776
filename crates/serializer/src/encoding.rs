use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::model::MalformedRecordError;

/// Character encoding used to decode record bodies.
///
/// The legacy serializer this replaces decoded the body and the headers with
/// two different hardcoded charsets; here one explicit, injectable encoding
/// covers the whole call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1. Every byte maps 1:1 to U+0000..=U+00FF, so decoding is
    /// total and never fails.
    Latin1,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Resolve an encoding from a configuration string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    /// Decode `raw` into text. Borrows for UTF-8, allocates for Latin-1.
    pub fn decode<'a>(&self, raw: &'a [u8]) -> Result<Cow<'a, str>, MalformedRecordError> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(raw)
                .map(Cow::Borrowed)
                .map_err(|_| MalformedRecordError::InvalidEncoding(self.as_str())),
            TextEncoding::Latin1 => Ok(Cow::Owned(raw.iter().map(|&b| char::from(b)).collect())),
        }
    }
}
