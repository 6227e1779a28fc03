//! Aggregation of the published area into tag groups
//!
//! Every published document is decoded and grouped by the directory-derived
//! tag path. A document that cannot be read or decoded is recorded in
//! [`Aggregation::skipped`] and the scan carries on.

use crate::config::AreaLayout;
use crate::core::document::{Area, Document};
use crate::core::tag_path::TagPath;
use crate::io::fs::list_documents;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Group label for documents directly under the area root
pub const UNCATEGORIZED: &str = "uncategorized";

/// Documents sharing one tag path, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagGroup {
    /// Display label: the joined tag path, or [`UNCATEGORIZED`]
    pub tag_path: String,
    /// The tag path the group was built from
    pub tags: TagPath,
    pub documents: Vec<Document>,
}

impl TagGroup {
    pub fn new(tags: TagPath, documents: Vec<Document>) -> Self {
        Self {
            tag_path: label(&tags),
            tags,
            documents,
        }
    }
}

/// A document left out of the index, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub groups: Vec<TagGroup>,
    pub skipped: Vec<SkippedDocument>,
}

impl Aggregation {
    pub fn document_count(&self) -> usize {
        self.groups.iter().map(|g| g.documents.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scans the published area of a layout
pub struct Aggregator {
    layout: AreaLayout,
}

impl Aggregator {
    pub fn new(layout: AreaLayout) -> Self {
        Self { layout }
    }

    /// Decode every published document and group the results
    pub fn aggregate(&self) -> Aggregation {
        let root = self.layout.published_root();
        let mut documents = Vec::new();
        let mut skipped = Vec::new();

        for relative in list_documents(root) {
            let path = root.join(&relative);
            let decoded = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| {
                    Document::from_raw(Area::Published, relative.clone(), &raw)
                        .map_err(|e| e.to_string())
                });
            match decoded {
                Ok(doc) => {
                    debug!("Indexed {}", path.display());
                    documents.push(doc);
                }
                Err(reason) => {
                    warn!("Skipping {}: {}", path.display(), reason);
                    skipped.push(SkippedDocument {
                        path: relative,
                        reason,
                    });
                }
            }
        }

        Aggregation {
            groups: group_documents(documents),
            skipped,
        }
    }
}

/// Display label of a tag path
pub fn label(tags: &TagPath) -> String {
    if tags.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        tags.joined()
    }
}

/// Group label of a document
pub fn group_label(doc: &Document) -> String {
    label(&doc.tag_path)
}

/// Group documents by tag path.
///
/// Groups are keyed by the tag path itself, so a directory that happens to be
/// named [`UNCATEGORIZED`] stays apart from documents at the area root. Groups
/// come out in ascending order of their label, the root group first on a tie.
/// Inside a group the most recently published document comes first; ties keep
/// input order and undated documents go last.
pub fn group_documents(documents: Vec<Document>) -> Vec<TagGroup> {
    let mut by_path: BTreeMap<TagPath, Vec<Document>> = BTreeMap::new();
    for doc in documents {
        by_path.entry(doc.tag_path.clone()).or_default().push(doc);
    }

    let mut groups: Vec<TagGroup> = by_path
        .into_iter()
        .map(|(tags, mut documents)| {
            documents.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            TagGroup::new(tags, documents)
        })
        .collect();
    groups.sort_by(|a, b| a.tag_path.cmp(&b.tag_path));
    groups
}
