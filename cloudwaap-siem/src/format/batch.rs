//! Batch serialization for the JSON output formats
//!
//! Records are written with the separators and escaping of Python's
//! `json.dumps` defaults (`", "`, `": "`, non-ASCII as `\uXXXX`) so that
//! exports stay byte-compatible with existing consumers.

use super::EventFormatter;
use crate::classify::KeyMetadata;
use crate::config::OutputFormat;
use crate::error::SiemResult;
use crate::record::LogRecord;
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::Formatter;
use std::io;

/// serde_json formatter with `json.dumps` spacing and ASCII-only output
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonFormatter;

impl Formatter for PythonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            // DEL and anything non-ASCII
            if ch.is_ascii() && ch != '\u{7f}' {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialize any value with [`PythonFormatter`].
pub fn to_python_json<T>(value: &T) -> SiemResult<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut buf, PythonFormatter);
    value.serialize(&mut ser)?;
    // The formatter only ever emits ASCII
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// One object per line, no trailing newline
pub fn to_ndjson(records: &[LogRecord]) -> SiemResult<String> {
    let lines = records
        .iter()
        .map(to_python_json)
        .collect::<SiemResult<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// A single JSON array
pub fn to_json(records: &[LogRecord]) -> SiemResult<String> {
    to_python_json(records)
}

/// Newline-delimited JSON formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct NdjsonFormatter;

impl EventFormatter for NdjsonFormatter {
    fn format(&self, record: &LogRecord, _meta: &KeyMetadata) -> SiemResult<String> {
        to_python_json(record)
    }

    fn format_batch(&self, records: &[LogRecord], _meta: &KeyMetadata) -> SiemResult<String> {
        to_ndjson(records)
    }

    fn content_type(&self) -> &'static str {
        OutputFormat::Ndjson.content_type()
    }
}

/// JSON array formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl EventFormatter for JsonFormatter {
    fn format(&self, record: &LogRecord, _meta: &KeyMetadata) -> SiemResult<String> {
        to_python_json(record)
    }

    fn format_batch(&self, records: &[LogRecord], _meta: &KeyMetadata) -> SiemResult<String> {
        to_json(records)
    }

    fn content_type(&self) -> &'static str {
        OutputFormat::Json.content_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn records(value: Value) -> Vec<LogRecord> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_ndjson() {
        let recs = records(json!([{ "a": 1 }, { "a": 2 }]));
        assert_eq!(to_ndjson(&recs).unwrap(), "{\"a\": 1}\n{\"a\": 2}");
        assert_eq!(to_ndjson(&[]).unwrap(), "");
    }

    #[test]
    fn test_json_array() {
        let recs = records(json!([{ "a": 1, "b": [true, null] }, { "c": "x" }]));
        assert_eq!(
            to_json(&recs).unwrap(),
            "[{\"a\": 1, \"b\": [true, null]}, {\"c\": \"x\"}]"
        );
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_key_order_preserved() {
        let recs = records(json!([{ "z": 1, "a": 2, "m": 3 }]));
        assert_eq!(to_ndjson(&recs).unwrap(), "{\"z\": 1, \"a\": 2, \"m\": 3}");
    }

    #[test]
    fn test_non_ascii_escaped() {
        let value = json!({ "city": "Zürich", "emoji": "\u{1F600}", "ctl": "a\nb\u{1}" });
        assert_eq!(
            to_python_json(&value).unwrap(),
            "{\"city\": \"Z\\u00fcrich\", \"emoji\": \"\\ud83d\\ude00\", \"ctl\": \"a\\nb\\u0001\"}"
        );
    }

    #[test]
    fn test_delete_escaped() {
        let value = json!({ "k": "a\u{7f}b~" });
        assert_eq!(to_python_json(&value).unwrap(), "{\"k\": \"a\\u007fb~\"}");
    }

    #[test]
    fn test_formatters_batch() {
        let meta = KeyMetadata::unknown();
        let recs = records(json!([{ "a": 1 }, { "a": 2 }]));

        assert_eq!(
            NdjsonFormatter.format_batch(&recs, &meta).unwrap(),
            "{\"a\": 1}\n{\"a\": 2}"
        );
        assert_eq!(
            JsonFormatter.format_batch(&recs, &meta).unwrap(),
            "[{\"a\": 1}, {\"a\": 2}]"
        );
        assert_eq!(NdjsonFormatter.content_type(), "application/x-ndjson");
        assert_eq!(JsonFormatter.content_type(), "application/json; charset=utf-8");
    }
}
