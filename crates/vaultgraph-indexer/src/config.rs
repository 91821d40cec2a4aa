//! Indexing configuration

use vaultgraph_core::{DOCUMENT_EXTENSION, HIDDEN_PREFIX};

/// Which entries count as documents and which are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Suffix identifying documents; also appended to file references.
    pub document_extension: String,
    /// Names starting with this marker are skipped, with their subtree.
    pub hidden_prefix: char,
}

impl IndexConfig {
    pub fn is_document_name(&self, name: &str) -> bool {
        name.ends_with(self.document_extension.as_str())
    }

    pub fn is_hidden_name(&self, name: &str) -> bool {
        name.starts_with(self.hidden_prefix)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            document_extension: DOCUMENT_EXTENSION.to_string(),
            hidden_prefix: HIDDEN_PREFIX,
        }
    }
}
