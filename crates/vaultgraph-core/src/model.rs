//! Core data structures for the link graph

use serde::{Deserialize, Serialize};

/// Extension carried by every document node id.
pub const DOCUMENT_EXTENSION: &str = ".md";

/// Separator used in node ids, independent of the host platform.
pub const PATH_SEPARATOR: char = '/';

/// Entries whose name starts with this marker are never indexed.
pub const HIDDEN_PREFIX: char = '.';

/// Discriminates what a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A real document found in the vault.
    File,
    /// A directory referenced by at least one document.
    Directory,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
        }
    }
}

/// A single node in the link graph.
///
/// `id` is the canonical path relative to the vault root and is unique
/// within a snapshot. `path` always mirrors `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    pub path: String,
}

impl Node {
    /// Node for a document. The title is the file name without `extension`.
    pub fn file(id: impl Into<String>, extension: &str) -> Self {
        let id = id.into();
        let file_name = id.rsplit(PATH_SEPARATOR).next().unwrap_or(id.as_str());
        let title = file_name
            .strip_suffix(extension)
            .unwrap_or(file_name)
            .to_string();
        Node {
            path: id.clone(),
            id,
            kind: NodeKind::File,
            title,
        }
    }

    /// Synthetic node for a referenced directory. `id` must already be in
    /// canonical directory form (`folder/`, or empty).
    pub fn directory(id: impl Into<String>) -> Self {
        let id = id.into();
        let title = id
            .trim_end_matches(PATH_SEPARATOR)
            .rsplit(PATH_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        Node {
            path: id.clone(),
            id,
            kind: NodeKind::Directory,
            title,
        }
    }
}

/// A directed reference from a document to a file or directory id.
///
/// The target may not exist as a node; dangling edges are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }
}
