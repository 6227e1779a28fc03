//! Front matter codec
//!
//! The header is a YAML block fenced by two `---` lines at the top of a
//! document. Only `title`, `date`, `published` and `tags` are recognised;
//! other keys are ignored on read so newer files stay readable.

use crate::error::{BlogMatterError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::debug;
use serde::Serialize;
use serde_yaml::Value;

/// Line that opens and closes the header block
pub const MARKER: &str = "---";

/// Timestamp layout used when writing headers.
///
/// Fractional seconds are written only when present, so whole-second values
/// stay short and finer ones survive a round trip.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Decoded document metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub published: Option<DateTime<FixedOffset>>,
    pub tags: Vec<String>,
}

impl FrontMatter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Publication time, falling back to `date` when `published` is absent.
    ///
    /// This is a read-time inference; nothing is written back.
    pub fn effective_published(&self) -> Option<DateTime<FixedOffset>> {
        self.published.or(self.date)
    }
}

/// Location of the header block inside a raw document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSpan {
    /// Byte offset where the header content starts (after the opening marker)
    pub content_start: usize,
    /// Byte offset of the closing marker line
    pub closing_start: usize,
    /// Byte offset where the body starts (after the closing marker line)
    pub body_start: usize,
}

fn is_marker(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == MARKER
}

/// Find the header block.
///
/// The first marker line opens the block. A marker line closes it only once at
/// least one header line has been seen; a marker directly after the opening
/// one is skipped.
pub fn locate_header(raw: &str) -> Result<HeaderSpan> {
    let mut offset = 0;
    let mut content_start = None;
    let mut seen_header_line = false;

    for line in raw.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        match content_start {
            None => {
                if is_marker(line) {
                    content_start = Some(offset);
                }
            }
            Some(start) => {
                if is_marker(line) {
                    if seen_header_line {
                        return Ok(HeaderSpan {
                            content_start: start,
                            closing_start: line_start,
                            body_start: offset,
                        });
                    }
                    content_start = Some(offset);
                } else {
                    seen_header_line = true;
                }
            }
        }
    }

    let reason = if content_start.is_none() {
        "no opening --- line"
    } else {
        "closing --- line never found"
    };
    Err(BlogMatterError::malformed_header(reason))
}

/// Split a raw document into its metadata and body.
///
/// The body is everything after the closing marker line, untouched.
pub fn decode(raw: &str) -> Result<(FrontMatter, &str)> {
    let span = locate_header(raw)?;
    let header = &raw[span.content_start..span.closing_start];
    let body = &raw[span.body_start..];
    Ok((parse_header(header)?, body))
}

fn parse_header(header: &str) -> Result<FrontMatter> {
    if header.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let value: Value = serde_yaml::from_str(header)
        .map_err(|e| BlogMatterError::malformed_header(format!("invalid YAML: {}", e)))?;

    let map = match value {
        Value::Mapping(map) => map,
        Value::Null => return Ok(FrontMatter::default()),
        other => {
            return Err(BlogMatterError::malformed_header(format!(
                "expected a mapping, found {}",
                type_name(&other)
            )))
        }
    };

    let mut fm = FrontMatter::default();
    for (key, value) in &map {
        match key.as_str() {
            Some("title") => fm.title = scalar_to_string(value).unwrap_or_default(),
            Some("date") => fm.date = value_to_timestamp("date", value),
            Some("published") => fm.published = value_to_timestamp("published", value),
            Some("tags") => fm.tags = value_to_tags(value),
            Some(other) => debug!("Ignoring unrecognised header key {:?}", other),
            None => debug!("Ignoring non-string header key {:?}", key),
        }
    }
    Ok(fm)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_tags(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        other => scalar_to_string(other)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
    }
}

fn value_to_timestamp(key: &str, value: &Value) -> Option<DateTime<FixedOffset>> {
    let raw = scalar_to_string(value)?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        debug!("Unparseable {} timestamp {:?}, treating as absent", key, raw);
    }
    parsed
}

/// Parse a header timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare dates; the latter two are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %:z") {
        return Some(ts);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(Utc.from_utc_datetime(&naive).into())
}

/// Render a timestamp the way headers store it
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Quote a string as a YAML double-quoted scalar.
///
/// Characters YAML does not allow unescaped are written as `\uXXXX`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                out.push_str(&format!("\\u{:04X}", c as u32))
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a header block, both markers included, ending with a newline.
///
/// Absent timestamps are left out; an empty tag list renders as `[]`.
pub fn encode(fm: &FrontMatter) -> String {
    let mut out = String::new();
    out.push_str(MARKER);
    out.push('\n');
    out.push_str(&format!("title: {}\n", quote(&fm.title)));
    if let Some(date) = &fm.date {
        out.push_str(&format!("date: {}\n", format_timestamp(date)));
    }
    if let Some(published) = &fm.published {
        out.push_str(&format!("published: {}\n", format_timestamp(published)));
    }
    let tags: Vec<String> = fm.tags.iter().map(|t| quote(t)).collect();
    out.push_str(&format!("tags: [{}]\n", tags.join(", ")));
    out.push_str(MARKER);
    out.push('\n');
    out
}
