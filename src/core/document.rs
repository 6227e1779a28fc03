//! Document model
//!
//! A document is identified by its area and its path relative to that area's
//! root. The tag path always comes from the containing directories; the
//! `tags` header is informational only once the file is on disk.

use crate::core::front_matter::{decode, FrontMatter};
use crate::core::tag_path::TagPath;
use crate::error::Result;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// The two areas of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Draft,
    Published,
}

impl Area {
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub area: Area,
    /// Path relative to the area root
    pub relative_path: PathBuf,
    pub title: String,
    pub tag_path: TagPath,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub published_at: Option<DateTime<FixedOffset>>,
    #[serde(skip)]
    pub body: String,
}

impl Document {
    /// Decode raw file text found at `relative_path` inside `area`.
    ///
    /// Missing titles fall back to the file stem. In the published area a
    /// missing `published` header falls back to `date`.
    pub fn from_raw(area: Area, relative_path: impl Into<PathBuf>, raw: &str) -> Result<Self> {
        let relative_path = relative_path.into();
        let (fm, body) = decode(raw)?;
        let tag_path = TagPath::from_document_path(&relative_path)?;
        let published_at = match area {
            Area::Published => fm.effective_published(),
            Area::Draft => fm.published,
        };
        let FrontMatter { title, date, .. } = fm;
        let title = if title.trim().is_empty() {
            file_stem(&relative_path)
        } else {
            title
        };

        Ok(Self {
            area,
            title,
            tag_path,
            created_at: date,
            published_at,
            body: body.to_string(),
            relative_path,
        })
    }

    /// Relative path with forward slashes, suitable for links
    pub fn link_path(&self) -> String {
        to_slash(&self.relative_path)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Join path components with `/` regardless of platform
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Best-effort title lookup for menus; `None` when the header is unusable
pub fn extract_title(raw: &str) -> Option<String> {
    decode(raw)
        .ok()
        .map(|(fm, _)| fm.title)
        .filter(|t| !t.trim().is_empty())
}
