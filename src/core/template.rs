//! Scaffold written into freshly created documents

use crate::core::document::Area;
use crate::core::footer::{footer_line, PUBLISHED_LABEL, UPDATED_LABEL};
use crate::core::front_matter::{encode, FrontMatter};
use crate::core::tag_path::TagPath;
use chrono::{DateTime, FixedOffset};

/// Render a complete new document.
///
/// Drafts get `title`, `date` and `tags`; published documents also get
/// `published`. The footer label follows the area.
pub fn new_document(title: &str, tags: &TagPath, area: Area, now: &DateTime<FixedOffset>) -> String {
    let fm = FrontMatter {
        title: title.to_string(),
        date: Some(*now),
        published: match area {
            Area::Draft => None,
            Area::Published => Some(*now),
        },
        tags: tags.segments().to_vec(),
    };
    let label = match area {
        Area::Draft => UPDATED_LABEL,
        Area::Published => PUBLISHED_LABEL,
    };

    format!(
        "{header}
# {title}

Start writing here...

## Introduction

A short introduction to what this post covers.

## Main Content

More content...

## Summary

Wrap up the main points.

---

{footer}
",
        header = encode(&fm),
        title = title,
        footer = footer_line(label, now),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::footer::has_footer;
    use crate::core::front_matter::decode;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-02T03:04:05+08:00").unwrap()
    }

    #[test]
    fn test_draft_scaffold() {
        let tags = TagPath::new(["Go", "Basics"]).unwrap();
        let doc = new_document("Hello World", &tags, Area::Draft, &now());

        assert!(doc.starts_with("---\ntitle: \"Hello World\"\n"));
        assert!(doc.contains("tags: [\"Go\", \"Basics\"]\n"));
        assert!(!doc.contains("published:"));
        for heading in ["## Introduction", "## Main Content", "## Summary"] {
            assert!(doc.contains(heading), "missing {}", heading);
        }
        assert!(doc.ends_with("> Updated: 2024-01-02 03:04\n"));
        assert!(has_footer(&doc));

        let (fm, body) = decode(&doc).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.date, Some(now()));
        assert!(body.starts_with("\n# Hello World\n"));
    }

    #[test]
    fn test_published_scaffold() {
        let doc = new_document("Post", &TagPath::empty(), Area::Published, &now());
        let (fm, _) = decode(&doc).unwrap();
        assert_eq!(fm.published, Some(now()));
        assert!(fm.tags.is_empty());
        assert!(doc.contains("tags: []\n"));
        assert!(doc.ends_with("> Published: 2024-01-02 03:04\n"));
    }
}
