//! Configuration for area roots and the generated index
//!
//! ```yaml
//! directories:
//!   draft: "_draft"
//!   blogs: "blogs"
//! index:
//!   output: "README.md"
//!   title: "Blog"
//! ```
//!
//! Every key is optional. Relative directories are resolved against a base
//! directory into an [`AreaLayout`] that the store and aggregator are built from.

use crate::core::Area;
use crate::error::{BlogMatterError, Result};
use crate::io::fs::normalize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory under `$HOME` holding the user-wide configuration
pub const HOME_CONFIG_DIR: &str = ".blogmatter";

pub const DEFAULT_DRAFT_DIR: &str = "_draft";
pub const DEFAULT_BLOGS_DIR: &str = "blogs";
pub const DEFAULT_INDEX_OUTPUT: &str = "README.md";
pub const DEFAULT_INDEX_TITLE: &str = "Blog";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlogConfig {
    pub directories: Directories,
    pub index: IndexConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Directories {
    pub draft: String,
    pub blogs: String,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            draft: DEFAULT_DRAFT_DIR.to_string(),
            blogs: DEFAULT_BLOGS_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Where `gen` writes the index
    pub output: String,
    /// Top-level heading of the index
    pub title: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_INDEX_OUTPUT.to_string(),
            title: DEFAULT_INDEX_TITLE.to_string(),
        }
    }
}

impl BlogConfig {
    /// Draft area root as configured, falling back to the default when blank
    pub fn draft_dir(&self) -> &str {
        non_blank(&self.directories.draft, DEFAULT_DRAFT_DIR)
    }

    /// Published area root as configured, falling back to the default when blank
    pub fn blogs_dir(&self) -> &str {
        non_blank(&self.directories.blogs, DEFAULT_BLOGS_DIR)
    }

    pub fn index_output(&self) -> &str {
        non_blank(&self.index.output, DEFAULT_INDEX_OUTPUT)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BlogMatterError::config(path, "file does not exist"),
            _ => BlogMatterError::Io(e),
        })?;
        Self::from_yaml(&content).map_err(|e| BlogMatterError::config(path, e.to_string()))
    }

    /// Parse configuration text; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Candidate configuration files, most specific first
    pub fn candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = vec![cwd.join(CONFIG_FILE_NAME)];
        if let Some(home) = home {
            paths.push(home.join(HOME_CONFIG_DIR).join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load the first configuration file that exists.
    ///
    /// Returns the path it came from, or `None` when nothing was found.
    pub fn discover(cwd: &Path, home: Option<&Path>) -> Result<Option<(Self, PathBuf)>> {
        for candidate in Self::candidates(cwd, home) {
            if candidate.is_file() {
                debug!("Loading configuration from {}", candidate.display());
                return Ok(Some((Self::load(&candidate)?, candidate)));
            }
        }
        Ok(None)
    }

    /// Render this configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write this configuration to `path`, refusing to replace an existing file
    pub fn write_new<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(BlogMatterError::already_exists(path));
        }
        let body = format!("# blogmatter configuration\n{}", self.to_yaml()?);
        fs::write(path, body)?;
        Ok(())
    }

    /// Resolve the area roots against `base`
    pub fn layout(&self, base: &Path) -> AreaLayout {
        AreaLayout::new(base, self.draft_dir(), self.blogs_dir())
    }
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Absolute roots of both areas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaLayout {
    base: PathBuf,
    draft: PathBuf,
    published: PathBuf,
}

impl AreaLayout {
    /// Build a layout; relative roots are joined onto `base`
    pub fn new(base: &Path, draft: impl AsRef<Path>, published: impl AsRef<Path>) -> Self {
        let base = normalize(base);
        Self {
            draft: normalize(&base.join(draft)),
            published: normalize(&base.join(published)),
            base,
        }
    }

    /// Directory relative inputs are resolved against
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn root(&self, area: Area) -> &Path {
        match area {
            Area::Draft => &self.draft,
            Area::Published => &self.published,
        }
    }

    pub fn draft_root(&self) -> &Path {
        &self.draft
    }

    pub fn published_root(&self) -> &Path {
        &self.published
    }
}
