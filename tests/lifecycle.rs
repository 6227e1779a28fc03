use blogmatter::core::front_matter::decode;
use blogmatter::io::index::link_prefix_for;
use blogmatter::*;
use chrono::{DateTime, FixedOffset};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn ts(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

fn layout(dir: &TempDir) -> AreaLayout {
    BlogConfig::default().layout(dir.path())
}

#[test]
fn test_create_draft_from_delimited_tags() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(layout(&dir));
    let tags = TagPath::resolve("Go,Basics", ",", false).unwrap();

    let path = store.create_draft("Hello World", &tags).unwrap();
    assert_eq!(path, dir.path().join("_draft/Go/Basics/hello_world.md"));

    let (fm, _) = decode(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(fm.title, "Hello World");
    assert_eq!(fm.tags, vec!["Go", "Basics"]);
    assert!(fm.published.is_none());
}

#[test]
fn test_publish_blocked_by_existing_destination() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(layout(&dir));
    let tags = TagPath::resolve("Go", ",", false).unwrap();
    let draft = store.create_draft("Taken", &tags).unwrap();
    let published = store.create_published("Taken", &tags).unwrap();
    let before = fs::read_to_string(&published).unwrap();

    let err = store.publish(&draft).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.kind().exit_code(), 3);
    assert!(draft.exists());
    assert_eq!(fs::read_to_string(&published).unwrap(), before);
}

#[test]
fn test_publish_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(layout(&dir));
    fs::write(dir.path().join("secret.md"), "---\ntitle: \"s\"\n---\n").unwrap();

    let err = store.publish("../secret.md").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutsideArea);
    assert!(dir.path().join("secret.md").exists());
    assert!(!dir.path().join("blogs").exists());
}

#[test]
fn test_full_lifecycle_to_index() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    let store = DocumentStore::new(layout.clone());

    let go = TagPath::resolve("Go,Basics", ",", false).unwrap();
    store
        .create_at(Area::Draft, "Hello World", &go, &ts("2024-01-05T08:00:00+08:00"))
        .unwrap();
    store
        .create_at(Area::Draft, "Pointers", &go, &ts("2024-02-10T08:00:00+08:00"))
        .unwrap();
    store
        .create_at(
            Area::Published,
            "About",
            &TagPath::empty(),
            &ts("2023-12-01T10:00:00+08:00"),
        )
        .unwrap();

    store
        .publish_at(
            Path::new("Go/Basics/hello_world.md"),
            &ts("2024-03-01T09:00:00+08:00"),
        )
        .unwrap();
    store
        .publish_at(
            Path::new("_draft/Go/Basics/pointers.md"),
            &ts("2024-02-15T09:00:00+08:00"),
        )
        .unwrap();
    assert!(store.list_documents(Area::Draft).is_empty());

    let aggregation = Aggregator::new(layout.clone()).aggregate();
    assert!(aggregation.skipped.is_empty());
    assert_eq!(aggregation.document_count(), 3);

    let index_path = dir.path().join("README.md");
    let options = IndexOptions {
        title: "Blog".to_string(),
        link_prefix: link_prefix_for(&index_path, layout.published_root()),
        generated_at: ts("2024-03-02T12:00:00+08:00"),
    };
    let rendered = render_index(&aggregation.groups, &options);

    let expected = "# Blog

## Navigation

- [Go/Basics](#go-basics) (2)
- [uncategorized](#uncategorized) (1)

**Stats**: 2 groups, 3 documents

---

## Posts

### Go/Basics

- [Hello World](blogs/Go/Basics/hello_world.md) - *2024-03-01*
- [Pointers](blogs/Go/Basics/pointers.md) - *2024-02-15*

### uncategorized

- [About](blogs/about.md) - *2023-12-01*

---

*Generated at 2024-03-02 12:00:00*
";
    assert_eq!(rendered, expected);

    write_index(&index_path, &rendered).unwrap();
    assert_eq!(fs::read_to_string(&index_path).unwrap(), expected);
}

#[test]
fn test_published_footer_replaces_draft_footer() {
    let dir = TempDir::new().unwrap();
    let store = DocumentStore::new(layout(&dir));
    store
        .create_at(
            Area::Draft,
            "Footer",
            &TagPath::empty(),
            &ts("2024-01-01T00:00:00+00:00"),
        )
        .unwrap();

    let outcome = store
        .publish_at(Path::new("footer.md"), &ts("2024-05-06T07:08:00+00:00"))
        .unwrap();
    assert_eq!(outcome.relative, PathBuf::from("footer.md"));

    let content = fs::read_to_string(&outcome.destination).unwrap();
    assert_eq!(content.matches("> Published:").count(), 1);
    assert_eq!(content.matches("> Updated:").count(), 0);
    assert!(content.ends_with("---\n\n> Published: 2024-05-06 07:08\n"));

    let doc = store.load(Area::Published, &outcome.relative).unwrap();
    assert_eq!(doc.published_at, Some(ts("2024-05-06T07:08:00+00:00")));
}

#[test]
fn test_aggregate_skips_broken_documents() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    let store = DocumentStore::new(layout.clone());
    store
        .create_published("Fine", &TagPath::resolve("Rust", "/", false).unwrap())
        .unwrap();
    fs::write(dir.path().join("blogs/Rust/broken.md"), "---\ntitle: \"x\"\n").unwrap();

    let aggregation = Aggregator::new(layout).aggregate();
    assert_eq!(aggregation.document_count(), 1);
    assert_eq!(aggregation.skipped.len(), 1);
    assert_eq!(aggregation.skipped[0].path, PathBuf::from("Rust/broken.md"));
}

#[test]
fn test_control_characters_in_title_stay_indexable() {
    let dir = TempDir::new().unwrap();
    let layout = layout(&dir);
    let store = DocumentStore::new(layout.clone());
    let path = store
        .create_published("Bell\u{7} title", &TagPath::empty())
        .unwrap();

    let (fm, _) = decode(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(fm.title, "Bell\u{7} title");

    let aggregation = Aggregator::new(layout).aggregate();
    assert!(aggregation.skipped.is_empty());
    assert_eq!(aggregation.document_count(), 1);
}
