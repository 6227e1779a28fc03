//! Pure domain logic: tag paths, slugs, the front matter codec and document text
//!
//! Nothing in here touches the filesystem except tag discovery, which only reads.

pub mod document;
pub mod footer;
pub mod front_matter;
pub mod slug;
pub mod tag_path;
pub mod template;

pub use document::{Area, Document};
pub use front_matter::FrontMatter;
pub use slug::slugify;
pub use tag_path::{discover_existing_paths, known_tag_paths, TagPath};
