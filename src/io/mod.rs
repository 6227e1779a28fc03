//! Filesystem-facing parts: the document store, aggregation and the index

pub mod aggregator;
pub mod fs;
pub mod index;
pub mod store;

pub use aggregator::{Aggregation, Aggregator, SkippedDocument, TagGroup, UNCATEGORIZED};
pub use fs::{is_document, list_documents, Filesystem, OsFilesystem};
pub use index::{render_index, write_index, IndexOptions};
pub use store::{DocumentStore, DraftChoice, PublishOutcome};
