//! blogmatter: lifecycle management for a markdown blog
//!
//! Documents live in two directory trees: a draft area and a published area.
//! Directories below an area root form the document's tag path, and each file
//! starts with a small YAML front matter block. This library creates documents,
//! moves drafts into the published area without ever overwriting anything, and
//! renders a navigational index of everything published.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use blogmatter::{Aggregator, BlogConfig, DocumentStore, IndexOptions, Result, TagPath};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let layout = BlogConfig::default().layout(Path::new("/srv/blog"));
//!     let store = DocumentStore::new(layout.clone());
//!
//!     let tags = TagPath::resolve("Go,Basics", ",", false)?;
//!     let draft = store.create_draft("Hello World", &tags)?;
//!     store.publish(&draft)?;
//!
//!     let aggregation = Aggregator::new(layout).aggregate();
//!     let options = IndexOptions {
//!         title: "Blog".to_string(),
//!         link_prefix: "blogs".to_string(),
//!         generated_at: chrono::Local::now().into(),
//!     };
//!     let index = blogmatter::render_index(&aggregation.groups, &options);
//!     blogmatter::write_index(Path::new("/srv/blog/README.md"), &index)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: pure logic (tag paths, slugs, the front matter codec, footers)
//! - [`io`]: the document store, aggregation and index output
//! - [`config`]: area roots and index options
//! - [`prompt`]: interactive flows over a pluggable prompt provider
//! - [`error`]: the error taxonomy

pub use config::{AreaLayout, BlogConfig};
pub use error::{BlogMatterError, ErrorKind, Result};

pub use core::{slugify, Area, Document, FrontMatter, TagPath};

pub use io::{
    render_index, write_index, Aggregation, Aggregator, DocumentStore, DraftChoice, Filesystem,
    IndexOptions, OsFilesystem, PublishOutcome, TagGroup,
};

pub use prompt::{collect_article_info, select_draft, ArticleInfo, Prompter};

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod prompt;
