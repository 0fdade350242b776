use tracing::trace;

use crate::conf::TransformerConfig;
use crate::model::{MalformedRecordError, RawRecord, StructuredDocument};
use crate::traits::RecordSerializer;
use crate::MAX_BODY_SIZE;

/// Converts one raw log line into a structured document.
///
/// The expected line shape is a fixed-width timestamp prefix and thread name
/// in the first segment, followed by `key<delim>value` segments:
///
/// `2017-06-21 10:41:25.138 [worker-6]|requestId:abc123|level:INFO`
///
/// Configuration is fixed at construction and never re-read mid-call. The
/// transform holds no other state, so a single instance is safe to share
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct LineRecordTransformer {
    config: TransformerConfig,
}

impl LineRecordTransformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Transform one record into a document.
    ///
    /// Fails only when the body cannot be decoded under the configured
    /// encoding, exceeds the size cap, or its first segment is shorter than
    /// the timestamp prefix. Every other malformed shape degrades: a segment
    /// without the delimiter becomes a field with an empty value, duplicate
    /// keys collapse last-write-wins, and a colliding header overwrites the
    /// body field.
    pub fn transform(
        &self,
        record: &RawRecord,
    ) -> Result<StructuredDocument, MalformedRecordError> {
        if record.body.len() > MAX_BODY_SIZE {
            return Err(MalformedRecordError::BodyTooLarge(
                record.body.len(),
                MAX_BODY_SIZE,
            ));
        }

        let text = self.config.encoding.decode(&record.body)?;

        let mut doc = StructuredDocument::new();
        self.append_body(&mut doc, &text)?;
        self.append_headers(&mut doc, &record.headers);

        trace!(fields = doc.len(), "serialized record");
        Ok(doc)
    }

    fn append_body(
        &self,
        doc: &mut StructuredDocument,
        text: &str,
    ) -> Result<(), MalformedRecordError> {
        let mut segments = text.split(self.config.record_separator.as_str());

        // First segment carries the timestamp prefix and the thread name.
        let first = segments.next().unwrap_or("").trim();
        let width = self.config.timestamp_width;
        let chars = first.chars().count();
        if chars < width {
            return Err(MalformedRecordError::TimestampTooShort {
                len: chars,
                required: width,
            });
        }

        // Width is counted in characters; a byte slice could split a code
        // point when the prefix contains non-ASCII text.
        let prefix_end = first
            .char_indices()
            .nth(width)
            .map(|(idx, _)| idx)
            .unwrap_or(first.len());
        let (date, rest) = first.split_at(prefix_end);
        doc.insert("date", date);
        doc.insert("threadName", rest.trim());

        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                if self.config.skip_empty_segments {
                    trace!("skipping empty segment");
                    continue;
                }
                doc.insert("", "");
                continue;
            }

            let mut parts = segment.splitn(2, self.config.kv_delimiter);
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().map(str::trim).unwrap_or("");
            doc.insert(key, value);
        }

        Ok(())
    }

    /// Headers go in last, so a colliding header key wins over a body field.
    fn append_headers(&self, doc: &mut StructuredDocument, headers: &[(String, String)]) {
        for (key, value) in headers {
            doc.insert(key.clone(), value.clone());
        }
    }
}

impl RecordSerializer for LineRecordTransformer {
    fn serialize(&self, record: &RawRecord) -> Result<StructuredDocument, MalformedRecordError> {
        self.transform(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextEncoding;

    const DUBBO_LINE: &str =
        "2017-06-21 10:41:25.138 [DubboServerHandler-121.0.0.1:20898-thread-6]|requestId:abc123|level:INFO";

    fn transformer() -> LineRecordTransformer {
        LineRecordTransformer::new(TransformerConfig::default())
    }

    #[test]
    fn test_dubbo_line() {
        let doc = transformer()
            .transform(&RawRecord::new(DUBBO_LINE.as_bytes()))
            .unwrap();

        assert_eq!(doc.get("date"), Some("2017-06-21 10:41:25.138"));
        assert_eq!(
            doc.get("threadName"),
            Some("[DubboServerHandler-121.0.0.1:20898-thread-6]")
        );
        assert_eq!(doc.get("requestId"), Some("abc123"));
        assert_eq!(doc.get("level"), Some("INFO"));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_field_order_matches_line_order() {
        let doc = transformer()
            .transform(&RawRecord::new(DUBBO_LINE.as_bytes()))
            .unwrap();

        let keys: Vec<&str> = doc.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["date", "threadName", "requestId", "level"]);
    }

    #[test]
    fn test_short_first_segment_errors() {
        let result = transformer().transform(&RawRecord::new(&b"short|level:INFO"[..]));
        assert!(matches!(
            result,
            Err(MalformedRecordError::TimestampTooShort { len: 5, required: 23 })
        ));
    }

    #[test]
    fn test_first_segment_exactly_prefix_width() {
        let doc = transformer()
            .transform(&RawRecord::new(&b"2017-06-21 10:41:25.138|level:INFO"[..]))
            .unwrap();

        assert_eq!(doc.get("date"), Some("2017-06-21 10:41:25.138"));
        assert_eq!(doc.get("threadName"), Some(""));
        assert_eq!(doc.get("level"), Some("INFO"));
    }

    #[test]
    fn test_segment_without_delimiter_gets_empty_value() {
        let doc = transformer()
            .transform(&RawRecord::new(&b"2017-06-21 10:41:25.138 [main]|flag"[..]))
            .unwrap();

        assert_eq!(doc.get("flag"), Some(""));
    }

    #[test]
    fn test_value_keeps_extra_delimiters() {
        // splitn(2) splits on the first delimiter only
        let doc = transformer()
            .transform(&RawRecord::new(
                &b"2017-06-21 10:41:25.138 [main]|url:https://example.com:8080/x"[..],
            ))
            .unwrap();

        assert_eq!(doc.get("url"), Some("https://example.com:8080/x"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let doc = transformer()
            .transform(&RawRecord::new(
                &b"2017-06-21 10:41:25.138 [main]|level:INFO|level:ERROR"[..],
            ))
            .unwrap();

        assert_eq!(doc.get("level"), Some("ERROR"));
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_empty_segments_skipped_by_default() {
        let doc = transformer()
            .transform(&RawRecord::new(
                &b"2017-06-21 10:41:25.138 [main]||level:INFO|"[..],
            ))
            .unwrap();

        assert_eq!(doc.len(), 3);
        assert!(!doc.contains_key(""));
    }

    #[test]
    fn test_empty_segments_recorded_when_configured() {
        let config = TransformerConfig {
            skip_empty_segments: false,
            ..TransformerConfig::default()
        };
        let doc = LineRecordTransformer::new(config)
            .transform(&RawRecord::new(
                &b"2017-06-21 10:41:25.138 [main]||level:INFO"[..],
            ))
            .unwrap();

        assert_eq!(doc.get(""), Some(""));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_segments_are_trimmed() {
        let doc = transformer()
            .transform(&RawRecord::new(
                &b"2017-06-21 10:41:25.138 [main]|  requestId :  abc123  "[..],
            ))
            .unwrap();

        assert_eq!(doc.get("requestId"), Some("abc123"));
    }

    #[test]
    fn test_header_overrides_body_field() {
        let record = RawRecord::new(&b"2017-06-21 10:41:25.138 [main]|level:INFO"[..])
            .with_header("level", "WARN")
            .with_header("host", "server-01");

        let doc = transformer().transform(&record).unwrap();
        assert_eq!(doc.get("level"), Some("WARN"));
        assert_eq!(doc.get("host"), Some("server-01"));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_non_utf8_body_errors_under_utf8() {
        let result = transformer().transform(&RawRecord::new(&b"\xFF\xFE"[..]));
        assert!(matches!(
            result,
            Err(MalformedRecordError::InvalidEncoding("utf-8"))
        ));
    }

    #[test]
    fn test_latin1_body_decodes() {
        // "2017-06-21 10:41:25.138 [tâche-1]|msg:café" in ISO-8859-1
        let body = b"2017-06-21 10:41:25.138 [t\xE2che-1]|msg:caf\xE9".to_vec();
        let config = TransformerConfig {
            encoding: TextEncoding::Latin1,
            ..TransformerConfig::default()
        };
        let doc = LineRecordTransformer::new(config)
            .transform(&RawRecord::new(body))
            .unwrap();

        assert_eq!(doc.get("threadName"), Some("[tâche-1]"));
        assert_eq!(doc.get("msg"), Some("café"));
    }

    #[test]
    fn test_prefix_width_counts_characters_not_bytes() {
        // Multi-byte character inside the prefix region
        let body = "2017-06-21 10:41:25.13é [main]|level:INFO";
        let doc = transformer()
            .transform(&RawRecord::new(body.as_bytes().to_vec()))
            .unwrap();

        assert_eq!(doc.get("date"), Some("2017-06-21 10:41:25.13é"));
        assert_eq!(doc.get("threadName"), Some("[main]"));
    }

    #[test]
    fn test_body_too_large() {
        let oversized = vec![b'x'; MAX_BODY_SIZE + 1];
        let result = transformer().transform(&RawRecord::new(oversized));
        assert!(matches!(
            result,
            Err(MalformedRecordError::BodyTooLarge(_, MAX_BODY_SIZE))
        ));
    }

    #[test]
    fn test_transform_is_idempotent() {
        let record = RawRecord::new(DUBBO_LINE.as_bytes()).with_header("host", "server-01");
        let t = transformer();

        let first = t.transform(&record).unwrap();
        let second = t.transform(&record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_separator_and_delimiter() {
        let config = TransformerConfig {
            record_separator: "||".to_string(),
            kv_delimiter: '=',
            ..TransformerConfig::default()
        };
        let doc = LineRecordTransformer::new(config)
            .transform(&RawRecord::new(
                &b"2017-06-21 10:41:25.138 [main]||level=INFO"[..],
            ))
            .unwrap();

        assert_eq!(doc.get("level"), Some("INFO"));
    }

    #[test]
    fn test_usable_through_trait_object() {
        let serializer: Box<dyn RecordSerializer> = Box::new(transformer());
        let doc = serializer
            .serialize(&RawRecord::new(DUBBO_LINE.as_bytes()))
            .unwrap();
        assert_eq!(doc.get("requestId"), Some("abc123"));
    }
}
