//! Rendering and writing the navigational index

use crate::error::Result;
use crate::io::aggregator::TagGroup;
use crate::io::fs::normalize;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Layout of dates next to each entry
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inputs the renderer needs besides the groups
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub title: String,
    /// Prefix joined in front of every document link, e.g. `blogs`
    pub link_prefix: String,
    pub generated_at: DateTime<FixedOffset>,
}

/// Anchor for a tag path: lower-cased, `/` and spaces become `-`
pub fn anchor(tag_path: &str) -> String {
    tag_path
        .to_lowercase()
        .chars()
        .map(|c| if c == '/' || c == ' ' { '-' } else { c })
        .collect()
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn link_target(prefix: &str, relative: &str) -> String {
    let target = if prefix.is_empty() || prefix == "." {
        relative.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), relative)
    };
    target.replace(' ', "%20")
}

/// Anchors for every group, in order.
///
/// A label seen before gets a numeric suffix (`-1`, `-2`, ...), matching how
/// markdown renderers name repeated headings.
fn group_anchors(groups: &[TagGroup]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    groups
        .iter()
        .map(|group| {
            let base = anchor(&group.tag_path);
            let count = seen.entry(base.clone()).or_insert(0);
            let unique = match *count {
                0 => base,
                n => format!("{}-{}", base, n),
            };
            *count += 1;
            unique
        })
        .collect()
}

/// Render the index document
pub fn render_index(groups: &[TagGroup], options: &IndexOptions) -> String {
    let mut out = String::new();
    let total: usize = groups.iter().map(|g| g.documents.len()).sum();
    let anchors = group_anchors(groups);

    out.push_str(&format!("# {}\n\n", options.title));

    out.push_str("## Navigation\n\n");
    for (group, anchor) in groups.iter().zip(&anchors) {
        out.push_str(&format!(
            "- [{}](#{}) ({})\n",
            escape_link_text(&group.tag_path),
            anchor,
            group.documents.len()
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "**Stats**: {} groups, {} documents\n\n",
        groups.len(),
        total
    ));
    out.push_str("---\n\n");

    out.push_str("## Posts\n\n");
    for group in groups {
        out.push_str(&format!("### {}\n\n", group.tag_path));
        for doc in &group.documents {
            let date = doc
                .published_at
                .map(|ts| ts.format(ENTRY_DATE_FORMAT).to_string())
                .unwrap_or_else(|| "undated".to_string());
            out.push_str(&format!(
                "- [{}]({}) - *{}*\n",
                escape_link_text(&doc.title),
                link_target(&options.link_prefix, &doc.link_path()),
                date
            ));
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
    out.push_str(&format!(
        "*Generated at {}*\n",
        options.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

/// Path of `target` as seen from the directory `from`, with `/` separators.
///
/// Both paths should be absolute.
pub fn relative_link(from: &Path, target: &Path) -> String {
    let from = normalize(from);
    let target = normalize(target);
    let from_parts: Vec<Component> = from.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    let common = from_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        parts.push("..".to_string());
    }
    for part in &target_parts[common..] {
        parts.push(part.as_os_str().to_string_lossy().into_owned());
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Link prefix for an index written to `index_path`
pub fn link_prefix_for(index_path: &Path, published_root: &Path) -> String {
    let dir = index_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    relative_link(&dir, published_root)
}

/// Replace `path` with `content` in one step.
///
/// The text goes to a temporary file next to the target which is then
/// renamed over it.
pub fn write_index(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut temp = NamedTempFile::new_in(&dir)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
