//! Document storage backed by a directory tree

use crate::config::IndexConfig;
use crate::error::StoreError;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use vaultgraph_core::{Node, PATH_SEPARATOR};
use walkdir::WalkDir;

/// Bytes of context kept on each side of a search match.
const SNIPPET_RADIUS: usize = 50;

/// One entry reported during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the store root, `/`-separated. Empty for the root.
    pub relative_path: String,
    pub name: String,
    pub is_dir: bool,
    /// Name starts with the hidden marker. The root is never hidden.
    pub is_hidden: bool,
    pub depth: usize,
}

/// What a walk visitor wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    /// Do not descend into the current directory.
    SkipSubtree,
}

/// Read access to the documents the graph is built from.
pub trait DocumentStore: Send + Sync {
    /// Naming rules shared by the store and the index.
    fn config(&self) -> &IndexConfig;

    /// Human-readable location, used in logs and errors.
    fn location(&self) -> String;

    /// Depth-first walk over every entry, root first.
    fn walk(&self, visit: &mut dyn FnMut(&WalkEntry) -> WalkControl) -> Result<(), StoreError>;

    /// Read a document as text. Invalid UTF-8 is replaced, not rejected.
    fn read_text(&self, relative_path: &str) -> Result<String, StoreError>;
}

/// A file or directory as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
}

/// A document whose text contains a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
    pub snippet: String,
}

/// Filesystem-backed store rooted at a vault directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    config: IndexConfig,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, IndexConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: IndexConfig) -> Self {
        FsStore {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a client-supplied relative path into the vault.
    ///
    /// Absolute paths and `..` components are rejected so a request can
    /// never reach outside the root.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, StoreError> {
        let candidate = Path::new(relative_path);
        let escapes = candidate
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if relative_path.trim().is_empty() || escapes {
            return Err(StoreError::InvalidPath(relative_path.to_string()));
        }
        Ok(self.root.join(candidate))
    }

    /// Create or replace a document, creating parent directories.
    pub fn write_text(&self, relative_path: &str, content: &str) -> Result<(), StoreError> {
        let path = self.resolve(relative_path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Remove a document, or an empty directory.
    pub fn delete(&self, relative_path: &str) -> Result<(), StoreError> {
        let path = self.resolve(relative_path)?;
        let metadata = fs::metadata(&path).map_err(|e| StoreError::io(&path, e))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| StoreError::io(&path, e))?;
        debug!("Deleted {}", path.display());
        Ok(())
    }

    /// All visible files and directories below the root, depth-first.
    pub fn list_entries(&self) -> Result<Vec<FileEntry>, StoreError> {
        let mut entries = Vec::new();
        self.walk(&mut |entry| {
            if entry.is_hidden {
                return WalkControl::SkipSubtree;
            }
            if entry.depth > 0 {
                entries.push(FileEntry {
                    path: entry.relative_path.clone(),
                    name: entry.name.clone(),
                    is_dir: entry.is_dir,
                });
            }
            WalkControl::Continue
        })?;
        Ok(entries)
    }

    /// Case-insensitive substring search over visible documents.
    /// Unreadable documents are skipped.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, StoreError> {
        let query = query.to_lowercase();
        let mut hits = Vec::new();
        self.walk(&mut |entry| {
            if entry.is_hidden {
                return WalkControl::SkipSubtree;
            }
            if entry.is_dir || !self.config.is_document_name(&entry.name) {
                return WalkControl::Continue;
            }
            let Ok(content) = self.read_text(&entry.relative_path) else {
                return WalkControl::Continue;
            };
            if let Some(snippet) = snippet_around(&content, &query) {
                let title = Node::file(entry.relative_path.as_str(), &self.config.document_extension).title;
                hits.push(SearchHit {
                    path: entry.relative_path.clone(),
                    title,
                    snippet,
                });
            }
            WalkControl::Continue
        })?;
        Ok(hits)
    }

    fn relative_id(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let separator = PATH_SEPARATOR.to_string();
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

impl DocumentStore for FsStore {
    fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn walk(&self, visit: &mut dyn FnMut(&WalkEntry) -> WalkControl) -> Result<(), StoreError> {
        let mut entries = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry?;
            let depth = entry.depth();
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_dir();
            let walk_entry = WalkEntry {
                relative_path: self.relative_id(entry.path()),
                is_hidden: depth > 0 && self.config.is_hidden_name(&name),
                name,
                is_dir,
                depth,
            };

            if visit(&walk_entry) == WalkControl::SkipSubtree && is_dir {
                entries.skip_current_dir();
            }
        }
        Ok(())
    }

    fn read_text(&self, relative_path: &str) -> Result<String, StoreError> {
        let path = self.resolve(relative_path)?;
        let bytes = fs::read(&path).map_err(|e| StoreError::io(&path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Text around the first case-insensitive match of `query_lower`,
/// clamped to char boundaries.
fn snippet_around(content: &str, query_lower: &str) -> Option<String> {
    let lower = content.to_lowercase();
    let idx = lower.find(query_lower)?;
    // Offsets into `lower` only line up with `content` when no char changes
    // its encoded length; otherwise cut the window from the lowered text
    let aligned = content
        .chars()
        .all(|c| c.to_lowercase().map(char::len_utf8).sum::<usize>() == c.len_utf8());
    let source = if aligned { content } else { lower.as_str() };

    let mut start = idx.saturating_sub(SNIPPET_RADIUS);
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (idx + query_lower.len() + SNIPPET_RADIUS).min(source.len());
    while !source.is_char_boundary(end) {
        end += 1;
    }
    Some(source[start..end].to_string())
}
