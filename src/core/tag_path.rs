//! Hierarchical tag paths
//!
//! A [`TagPath`] maps one-to-one onto nested directories under an area root:
//! `["Go", "Basics"]` lives at `<root>/Go/Basics/`.

use crate::error::{BlogMatterError, Result};
use crate::io::fs::is_document;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Separator used when a tag path is shown or stored as one string
pub const JOIN_SEPARATOR: &str = "/";

/// An ordered sequence of non-empty tag segments
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TagPath(Vec<String>);

impl TagPath {
    /// The empty path, meaning "uncategorized"
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a tag path from segments, trimming and validating each one
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for segment in segments {
            let trimmed = segment.as_ref().trim();
            validate_segment(trimmed)?;
            out.push(trimmed.to_string());
        }
        Ok(Self(out))
    }

    /// Split `raw` on `delimiter`, trim each piece and drop empty ones.
    ///
    /// With `require_segment` set, an input that leaves nothing behind fails
    /// with [`BlogMatterError::EmptyInput`]; otherwise it yields the empty path.
    pub fn resolve(raw: &str, delimiter: &str, require_segment: bool) -> Result<Self> {
        let pieces: Vec<&str> = if delimiter.is_empty() {
            vec![raw]
        } else {
            raw.split(delimiter).collect()
        };

        let path = Self::new(pieces.into_iter().filter(|p| !p.trim().is_empty()))?;
        if require_segment && path.is_empty() {
            return Err(BlogMatterError::empty_input("tag path"));
        }
        debug!("Resolved {:?} with {:?} into {}", raw, delimiter, path);
        Ok(path)
    }

    /// Parse a path previously rendered with [`TagPath::joined`]
    pub fn from_joined(joined: &str) -> Result<Self> {
        Self::resolve(joined, JOIN_SEPARATOR, false)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Segments joined with `/`; empty for the uncategorized path
    pub fn joined(&self) -> String {
        self.0.join(JOIN_SEPARATOR)
    }

    /// Relative directory for this path, using the platform separator
    pub fn to_relative_dir(&self) -> PathBuf {
        self.0.iter().collect()
    }

    /// Derive the tag path of a document from its path relative to an area root
    pub fn from_document_path(relative: &Path) -> Result<Self> {
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        let segments: Vec<String> = parent
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Self::new(segments)
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(BlogMatterError::invalid_tag_segment(segment, "segment is empty"));
    }
    if segment == "." || segment == ".." {
        return Err(BlogMatterError::invalid_tag_segment(
            segment,
            "relative directory names are not allowed",
        ));
    }
    if segment.contains(['/', '\\']) {
        return Err(BlogMatterError::invalid_tag_segment(
            segment,
            "segment contains a path separator",
        ));
    }
    Ok(())
}

/// Collect every tag path already present under `root`.
///
/// A directory counts when it has no subdirectories, or when it directly holds
/// at least one document, so a path can be both a node and a leaf. A missing
/// root yields an empty set; unreadable subdirectories are skipped.
pub fn discover_existing_paths(root: &Path) -> BTreeSet<TagPath> {
    let mut found = BTreeSet::new();
    if !root.is_dir() {
        debug!("Tag discovery root {} does not exist", root.display());
        return found;
    }
    let children = match scan_dir(root) {
        Some(listing) => listing.subdirs,
        None => return found,
    };
    for (name, dir) in children {
        found.extend(discover_from(&dir, vec![name]));
    }
    found
}

fn discover_from(dir: &Path, prefix: Vec<String>) -> BTreeSet<TagPath> {
    let mut found = BTreeSet::new();
    let Some(listing) = scan_dir(dir) else {
        debug!("Skipping unreadable directory {}", dir.display());
        return found;
    };

    if listing.subdirs.is_empty() || listing.has_document {
        match TagPath::new(&prefix) {
            Ok(path) => {
                found.insert(path);
            }
            Err(e) => debug!("Ignoring directory {}: {}", dir.display(), e),
        }
    }

    for (name, child) in listing.subdirs {
        let mut next = prefix.clone();
        next.push(name);
        found.extend(discover_from(&child, next));
    }
    found
}

struct DirListing {
    subdirs: Vec<(String, PathBuf)>,
    has_document: bool,
}

fn scan_dir(dir: &Path) -> Option<DirListing> {
    let entries = fs::read_dir(dir).ok()?;
    let mut listing = DirListing {
        subdirs: Vec::new(),
        has_document: false,
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            listing
                .subdirs
                .push((entry.file_name().to_string_lossy().into_owned(), path));
        } else if is_document(&path) {
            listing.has_document = true;
        }
    }
    listing.subdirs.sort();
    Some(listing)
}

/// Known tag paths across several area roots, deduplicated and sorted
pub fn known_tag_paths<'a, I>(roots: I) -> Vec<TagPath>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut all = BTreeSet::new();
    for root in roots {
        all.extend(discover_existing_paths(root));
    }
    all.into_iter().collect()
}
