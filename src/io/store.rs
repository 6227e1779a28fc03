//! Document store
//!
//! Owns every mutation of the two area trees. Nothing is ever overwritten:
//! destinations are checked before any change and written with
//! create-new semantics.

use crate::config::AreaLayout;
use crate::core::document::{extract_title, to_slash, Area, Document};
use crate::core::footer::{stamp_footer, stamp_published_header, PUBLISHED_LABEL};
use crate::core::slug::slugify;
use crate::core::tag_path::{known_tag_paths, TagPath};
use crate::core::template::new_document;
use crate::error::{BlogMatterError, Result};
use crate::io::fs::{
    is_document, is_strictly_inside, list_documents, normalize, Filesystem, OsFilesystem,
    DOCUMENT_EXTENSION,
};
use chrono::{DateTime, FixedOffset, Local, Timelike};
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};

/// Where a published draft ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Former absolute path in the draft area
    pub source: PathBuf,
    /// New absolute path in the published area
    pub destination: PathBuf,
    /// Path relative to both area roots
    pub relative: PathBuf,
}

/// A draft offered for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftChoice {
    pub relative: PathBuf,
    pub title: Option<String>,
}

impl DraftChoice {
    /// `"<title> (<relative path>)"`, or just the path when untitled
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => format!("{} ({})", title, to_slash(&self.relative)),
            None => to_slash(&self.relative),
        }
    }
}

/// Current local time, truncated to the precision headers store
pub(crate) fn now() -> DateTime<FixedOffset> {
    let now: DateTime<FixedOffset> = Local::now().into();
    now.with_nanosecond(0).unwrap_or(now)
}

pub struct DocumentStore<F: Filesystem = OsFilesystem> {
    layout: AreaLayout,
    fs: F,
}

impl DocumentStore<OsFilesystem> {
    pub fn new(layout: AreaLayout) -> Self {
        Self::with_filesystem(layout, OsFilesystem)
    }
}

impl<F: Filesystem> DocumentStore<F> {
    pub fn with_filesystem(layout: AreaLayout, fs: F) -> Self {
        Self { layout, fs }
    }

    pub fn layout(&self) -> &AreaLayout {
        &self.layout
    }

    /// Create a new draft; returns its absolute path
    pub fn create_draft(&self, title: &str, tags: &TagPath) -> Result<PathBuf> {
        self.create_at(Area::Draft, title, tags, &now())
    }

    /// Create a document directly in the published area
    pub fn create_published(&self, title: &str, tags: &TagPath) -> Result<PathBuf> {
        self.create_at(Area::Published, title, tags, &now())
    }

    /// Create a new document in `area` stamped with `at`.
    ///
    /// The file lands at `<root>/<tags...>/<slug>.md`; an occupied target fails
    /// with [`BlogMatterError::AlreadyExists`].
    pub fn create_at(
        &self,
        area: Area,
        title: &str,
        tags: &TagPath,
        at: &DateTime<FixedOffset>,
    ) -> Result<PathBuf> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BlogMatterError::empty_input("title"));
        }

        let dir = self.layout.root(area).join(tags.to_relative_dir());
        self.fs.create_dir_all(&dir)?;

        let path = dir.join(format!("{}.{}", slugify(title), DOCUMENT_EXTENSION));
        if path.exists() {
            return Err(BlogMatterError::already_exists(path));
        }

        let content = new_document(title, tags, area, at);
        self.fs
            .write_new(&path, &content)
            .map_err(|e| creation_error(e, &path))?;

        info!("Created {} document {}", area, path.display());
        Ok(path)
    }

    /// Turn user input into an absolute candidate path inside the draft area.
    ///
    /// Absolute input is taken as is. Relative input that already points into
    /// the draft area from the base directory (`_draft/Go/a.md`) is used from
    /// there; anything else is taken relative to the draft root.
    pub fn resolve_draft_input(&self, input: &Path) -> PathBuf {
        if input.is_absolute() {
            return normalize(input);
        }
        let from_base = normalize(&self.layout.base().join(input));
        if is_strictly_inside(&from_base, self.layout.draft_root()) {
            return from_base;
        }
        normalize(&self.layout.draft_root().join(input))
    }

    /// Resolve and validate a draft reference without changing anything
    pub fn locate_draft(&self, input: &Path) -> Result<PathBuf> {
        let candidate = self.resolve_draft_input(input);
        debug!("Resolved draft {} to {}", input.display(), candidate.display());

        if !is_strictly_inside(&candidate, self.layout.draft_root()) {
            return Err(BlogMatterError::outside_area(input, Area::Draft.name()));
        }
        if !candidate.exists() {
            return Err(BlogMatterError::not_found(input));
        }
        if !candidate.is_file() || !is_document(&candidate) {
            return Err(BlogMatterError::invalid_kind(input));
        }
        Ok(candidate)
    }

    /// Move a draft into the published area
    pub fn publish(&self, input: impl AsRef<Path>) -> Result<PublishOutcome> {
        self.publish_at(input.as_ref(), &now())
    }

    /// Move a draft into the published area, stamping it with `at`.
    ///
    /// The relative path is kept. The destination is checked before anything
    /// changes. If the draft cannot be removed after the copy was written, the
    /// copy is removed again and [`BlogMatterError::PartialFailure`] is
    /// returned.
    pub fn publish_at(&self, input: &Path, at: &DateTime<FixedOffset>) -> Result<PublishOutcome> {
        let source = self.locate_draft(input)?;
        let relative = source
            .strip_prefix(self.layout.draft_root())
            .map_err(|_| BlogMatterError::outside_area(input, Area::Draft.name()))?
            .to_path_buf();
        let destination = self.layout.published_root().join(&relative);

        if destination.exists() {
            return Err(BlogMatterError::already_exists(destination));
        }

        let content = self.fs.read_to_string(&source)?;
        let stamped = stamp_footer(&stamp_published_header(&content, at), PUBLISHED_LABEL, at);

        if let Some(parent) = destination.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs
            .write_new(&destination, &stamped)
            .map_err(|e| creation_error(e, &destination))?;

        if let Err(cause) = self.fs.remove_file(&source) {
            let rollback = match self.fs.remove_file(&destination) {
                Ok(()) => None,
                Err(e) => {
                    warn!(
                        "Could not remove {} after failed publish: {}",
                        destination.display(),
                        e
                    );
                    Some(e.to_string())
                }
            };
            return Err(BlogMatterError::partial_failure(&source, cause, rollback));
        }

        info!("Published {} to {}", source.display(), destination.display());
        Ok(PublishOutcome {
            source,
            destination,
            relative,
        })
    }

    /// Documents in `area`, relative to its root
    pub fn list_documents(&self, area: Area) -> Vec<PathBuf> {
        list_documents(self.layout.root(area))
    }

    /// Read and decode one document
    pub fn load(&self, area: Area, relative: &Path) -> Result<Document> {
        let path = self.layout.root(area).join(relative);
        let raw = self.fs.read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BlogMatterError::not_found(&path),
            _ => BlogMatterError::Io(e),
        })?;
        Document::from_raw(area, relative, &raw).map_err(|e| e.with_path(&path))
    }

    /// Drafts with their titles, for selection menus
    pub fn draft_choices(&self) -> Vec<DraftChoice> {
        let root = self.layout.draft_root();
        self.list_documents(Area::Draft)
            .into_iter()
            .map(|relative| {
                let title = self
                    .fs
                    .read_to_string(&root.join(&relative))
                    .ok()
                    .and_then(|raw| extract_title(&raw));
                DraftChoice { relative, title }
            })
            .collect()
    }

    /// Tag paths already used in either area
    pub fn known_tag_paths(&self) -> Vec<TagPath> {
        known_tag_paths([self.layout.published_root(), self.layout.draft_root()])
    }
}

fn creation_error(e: io::Error, path: &Path) -> BlogMatterError {
    match e.kind() {
        io::ErrorKind::AlreadyExists => BlogMatterError::already_exists(path),
        _ => BlogMatterError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::front_matter::decode;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-01T10:00:00+08:00").unwrap()
    }

    fn store(dir: &TempDir) -> DocumentStore {
        DocumentStore::new(AreaLayout::new(dir.path(), "_draft", "blogs"))
    }

    fn tags(segments: &[&str]) -> TagPath {
        TagPath::new(segments).unwrap()
    }

    #[test]
    fn test_create_draft_layout() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store
            .create_at(Area::Draft, "Hello World", &tags(&["Go", "Basics"]), &at())
            .unwrap();
        assert_eq!(path, dir.path().join("_draft/Go/Basics/hello_world.md"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("title: \"Hello World\"\n"));
        assert!(content.contains("tags: [\"Go\", \"Basics\"]\n"));
    }

    #[test]
    fn test_create_without_tags_and_empty_title() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store.create_at(Area::Published, "Top", &TagPath::empty(), &at()).unwrap();
        assert_eq!(path, dir.path().join("blogs/top.md"));

        let err = store.create_at(Area::Draft, "   ", &TagPath::empty(), &at()).unwrap_err();
        assert!(matches!(err, BlogMatterError::EmptyInput { .. }));
    }

    #[test]
    fn test_create_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store.create_at(Area::Draft, "Same", &TagPath::empty(), &at()).unwrap();
        fs::write(&path, "edited").unwrap();

        let err = store.create_at(Area::Draft, "same", &TagPath::empty(), &at()).unwrap_err();
        assert!(matches!(err, BlogMatterError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "edited");
    }

    #[test]
    fn test_resolve_draft_input_forms() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let expected = dir.path().join("_draft/Go/a.md");
        assert_eq!(store.resolve_draft_input(Path::new("Go/a.md")), expected);
        assert_eq!(store.resolve_draft_input(Path::new("_draft/Go/a.md")), expected);
        assert_eq!(store.resolve_draft_input(Path::new("./_draft/Go/a.md")), expected);
        assert_eq!(store.resolve_draft_input(&expected), expected);
    }

    #[test]
    fn test_publish_moves_and_stamps() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let draft = store
            .create_at(Area::Draft, "Hello World", &tags(&["Go"]), &at())
            .unwrap();

        let later = DateTime::parse_from_rfc3339("2024-07-02T09:30:00+08:00").unwrap();
        let outcome = store.publish_at(Path::new("Go/hello_world.md"), &later).unwrap();

        assert_eq!(outcome.source, draft);
        assert_eq!(outcome.destination, dir.path().join("blogs/Go/hello_world.md"));
        assert_eq!(outcome.relative, PathBuf::from("Go/hello_world.md"));
        assert!(!draft.exists());

        let content = fs::read_to_string(&outcome.destination).unwrap();
        assert!(content.ends_with("> Published: 2024-07-02 09:30\n"));
        assert!(!content.contains("> Updated:"));
        let (fm, _) = decode(&content).unwrap();
        assert_eq!(fm.published, Some(later));
        assert_eq!(fm.date, Some(at()));
    }

    #[test]
    fn test_publish_replaces_localized_footer() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(dir.path().join("_draft/Go")).unwrap();
        fs::write(
            dir.path().join("_draft/Go/old.md"),
            "---\ntitle: \"Old\"\n---\n\nbody\n\n---\n\n> 更新时间: 2024年01月01日 10:00\n",
        )
        .unwrap();

        let outcome = store.publish_at(Path::new("Go/old.md"), &at()).unwrap();
        let content = fs::read_to_string(&outcome.destination).unwrap();
        assert!(!content.contains("更新时间"));
        assert_eq!(content.matches("\n> ").count(), 1);
        assert!(content.ends_with("---\n\n> Published: 2024-06-01 10:00\n"));
    }

    #[test]
    fn test_now_has_whole_seconds() {
        assert_eq!(now().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_publish_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let draft = store.create_at(Area::Draft, "Dup", &tags(&["Go"]), &at()).unwrap();
        let original = fs::read_to_string(&draft).unwrap();
        fs::create_dir_all(dir.path().join("blogs/Go")).unwrap();
        fs::write(dir.path().join("blogs/Go/dup.md"), "already here").unwrap();

        let err = store.publish_at(Path::new("Go/dup.md"), &at()).unwrap_err();
        assert!(matches!(err, BlogMatterError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&draft).unwrap(), original);
        assert_eq!(
            fs::read_to_string(dir.path().join("blogs/Go/dup.md")).unwrap(),
            "already here"
        );
    }

    #[test]
    fn test_publish_validation_errors() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(dir.path().join("_draft")).unwrap();
        fs::write(dir.path().join("_draft/notes.txt"), "x").unwrap();
        fs::create_dir_all(dir.path().join("_draftX")).unwrap();
        fs::write(dir.path().join("_draftX/evil.md"), "x").unwrap();

        let err = store.publish_at(Path::new("missing.md"), &at()).unwrap_err();
        assert!(matches!(err, BlogMatterError::NotFound { .. }));

        let err = store.publish_at(Path::new("notes.txt"), &at()).unwrap_err();
        assert!(matches!(err, BlogMatterError::InvalidKind { .. }));

        let err = store
            .publish_at(&dir.path().join("_draftX/evil.md"), &at())
            .unwrap_err();
        assert!(matches!(err, BlogMatterError::OutsideArea { .. }));

        let err = store.publish_at(Path::new("../_draftX/evil.md"), &at()).unwrap_err();
        assert!(matches!(err, BlogMatterError::OutsideArea { .. }));
        assert!(dir.path().join("_draftX/evil.md").exists());
        assert!(!dir.path().join("blogs").exists());
    }

    struct StuckSource {
        fail_rollback: bool,
        removals: Cell<usize>,
    }

    impl Filesystem for StuckSource {
        fn remove_file(&self, path: &Path) -> io::Result<()> {
            let n = self.removals.get();
            self.removals.set(n + 1);
            if n == 0 || self.fail_rollback {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "stuck"));
            }
            fs::remove_file(path)
        }
    }

    #[test]
    fn test_publish_rolls_back_when_source_cannot_be_removed() {
        let dir = TempDir::new().unwrap();
        let layout = AreaLayout::new(dir.path(), "_draft", "blogs");
        let plain = DocumentStore::new(layout.clone());
        let draft = plain.create_at(Area::Draft, "Stuck", &TagPath::empty(), &at()).unwrap();

        let store = DocumentStore::with_filesystem(
            layout,
            StuckSource {
                fail_rollback: false,
                removals: Cell::new(0),
            },
        );
        let err = store.publish_at(Path::new("stuck.md"), &at()).unwrap_err();
        match err {
            BlogMatterError::PartialFailure { rollback, .. } => assert!(rollback.is_none()),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(draft.exists());
        assert!(!dir.path().join("blogs/stuck.md").exists());
    }

    #[test]
    fn test_publish_reports_failed_rollback() {
        let dir = TempDir::new().unwrap();
        let layout = AreaLayout::new(dir.path(), "_draft", "blogs");
        DocumentStore::new(layout.clone())
            .create_at(Area::Draft, "Stuck", &TagPath::empty(), &at())
            .unwrap();

        let store = DocumentStore::with_filesystem(
            layout,
            StuckSource {
                fail_rollback: true,
                removals: Cell::new(0),
            },
        );
        let err = store.publish_at(Path::new("stuck.md"), &at()).unwrap_err();
        assert!(matches!(
            err,
            BlogMatterError::PartialFailure {
                rollback: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_draft_choices_and_known_tags() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.create_at(Area::Draft, "First", &tags(&["Go"]), &at()).unwrap();
        store.create_at(Area::Published, "Second", &tags(&["Rust", "Async"]), &at()).unwrap();
        fs::write(dir.path().join("_draft/loose.md"), "no header").unwrap();

        let labels: Vec<String> = store.draft_choices().iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["First (Go/first.md)", "loose.md"]);

        let known: Vec<String> = store.known_tag_paths().iter().map(|t| t.joined()).collect();
        assert_eq!(known, vec!["Go", "Rust/Async"]);
    }

    #[test]
    fn test_load_attaches_path_to_header_errors() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::create_dir_all(dir.path().join("blogs")).unwrap();
        fs::write(dir.path().join("blogs/bad.md"), "---\ntitle: x\n").unwrap();

        let err = store.load(Area::Published, Path::new("bad.md")).unwrap_err();
        assert!(matches!(
            err,
            BlogMatterError::MalformedHeader { path: Some(_), .. }
        ));
        let err = store.load(Area::Published, Path::new("gone.md")).unwrap_err();
        assert!(matches!(err, BlogMatterError::NotFound { .. }));
    }
}
