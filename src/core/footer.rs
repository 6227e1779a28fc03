//! Pure text transforms applied when a document changes state
//!
//! Documents end with a footer line `> <label>: <timestamp>`, such as
//! `> Updated: 2024-01-02 15:04`. Any label is recognised as long as the line
//! is the last non-blank line of the document. These functions take and return
//! whole document text and never touch disk.

use crate::core::front_matter::{format_timestamp, locate_header};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::LazyLock;

/// Footer label written into new drafts
pub const UPDATED_LABEL: &str = "Updated";

/// Footer label written on publication
pub const PUBLISHED_LABEL: &str = "Published";

/// Human-facing layout of footer timestamps
pub const FOOTER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^> [^:\r\n]+: [^\r\n]*$").expect("footer pattern is valid"));

/// Render a footer line without its trailing newline
pub fn footer_line(label: &str, at: &DateTime<FixedOffset>) -> String {
    format!("> {}: {}", label, at.format(FOOTER_TIME_FORMAT))
}

/// Byte range of the footer line, if the last non-blank line is one
fn footer_span(content: &str) -> Option<(usize, usize)> {
    let end = content.trim_end().len();
    let start = content[..end].rfind('\n').map_or(0, |i| i + 1);
    FOOTER_RE
        .is_match(&content[start..end])
        .then_some((start, end))
}

/// Whether `content` already ends with a footer line
pub fn has_footer(content: &str) -> bool {
    footer_span(content).is_some()
}

/// Replace the trailing footer line, or append a separator and a new one.
pub fn stamp_footer(content: &str, label: &str, at: &DateTime<FixedOffset>) -> String {
    let line = footer_line(label, at);
    match footer_span(content) {
        Some((start, end)) => {
            let mut out = String::with_capacity(content.len() + line.len());
            out.push_str(&content[..start]);
            out.push_str(&line);
            out.push_str(&content[end..]);
            out
        }
        None => format!("{}\n\n---\n\n{}\n", content.trim_end_matches(['\n', '\r']), line),
    }
}

/// Set the `published:` header line to `at`.
///
/// Replaces an existing line or inserts one before the closing marker. Text
/// without a well-formed header is returned unchanged.
pub fn stamp_published_header(content: &str, at: &DateTime<FixedOffset>) -> String {
    let Ok(span) = locate_header(content) else {
        return content.to_string();
    };
    let new_line = format!("published: {}", format_timestamp(at));
    let header = &content[span.content_start..span.closing_start];

    let mut replaced = false;
    let mut rewritten = String::with_capacity(header.len() + new_line.len() + 1);
    for line in header.split_inclusive('\n') {
        if !replaced && line.starts_with("published:") {
            let ending = &line[line.trim_end_matches(['\n', '\r']).len()..];
            rewritten.push_str(&new_line);
            rewritten.push_str(if ending.is_empty() { "\n" } else { ending });
            replaced = true;
        } else {
            rewritten.push_str(line);
        }
    }
    if !replaced {
        if !rewritten.is_empty() && !rewritten.ends_with('\n') {
            rewritten.push('\n');
        }
        rewritten.push_str(&new_line);
        rewritten.push('\n');
    }

    let mut out = String::with_capacity(content.len() + new_line.len() + 1);
    out.push_str(&content[..span.content_start]);
    out.push_str(&rewritten);
    out.push_str(&content[span.closing_start..]);
    out
}
