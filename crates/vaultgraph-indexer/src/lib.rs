//! Document walking, reference extraction and the graph index

pub mod builder;
pub mod config;
pub mod error;
pub mod extractor;
pub mod index;
pub mod store;


#[cfg(test)]
pub mod test_utils;

pub use builder::SnapshotBuilder;
pub use config::IndexConfig;
pub use error::{IndexError, StoreError};
pub use extractor::{canonical_directory, canonical_file, extract_references, Reference};
pub use index::GraphIndex;
pub use store::{DocumentStore, FileEntry, FsStore, SearchHit, WalkControl, WalkEntry};
