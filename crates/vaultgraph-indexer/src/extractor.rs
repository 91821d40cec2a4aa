//! Wikilink reference extraction
//!
//! A reference is any `[[...]]` span whose content is at least one
//! character and contains no `]`. The content is split on the first `|`
//! into a target and an optional alias.

use serde::Serialize;
use std::ops::Range;
use vaultgraph_core::PATH_SEPARATOR;

const OPEN: &[u8] = b"[[";
const CLOSE: u8 = b']';
const ALIAS_SEPARATOR: char = '|';

/// A single link found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// The matched text, brackets included.
    pub raw: String,
    /// Trimmed target; directory targets are in canonical form.
    pub target: String,
    /// Display label, the trimmed target when no alias is given.
    pub alias: String,
    /// The target ended with a path separator.
    pub is_directory: bool,
    /// Byte range of `raw` in the source text.
    #[serde(skip)]
    pub span: Range<usize>,
}

impl Reference {
    fn parse(raw: &str, inner: &str, span: Range<usize>) -> Self {
        let (target, alias) = match inner.split_once(ALIAS_SEPARATOR) {
            Some((target, alias)) => (target.trim(), alias.trim()),
            None => (inner.trim(), inner.trim()),
        };

        let is_directory = target.ends_with(PATH_SEPARATOR);
        let target = if is_directory {
            canonical_directory(target)
        } else {
            target.trim_matches(PATH_SEPARATOR).to_string()
        };

        Reference {
            raw: raw.to_string(),
            target,
            alias: alias.to_string(),
            is_directory,
            span,
        }
    }
}

/// Extract every reference in `text`, in order of appearance.
///
/// Never fails: spans that do not close properly are skipped.
pub fn extract_references(text: &str) -> Vec<Reference> {
    let bytes = text.as_bytes();
    let mut references = Vec::new();
    let mut pos = 0;

    while let Some(offset) = find_open(&bytes[pos..]) {
        let start = pos + offset;
        let content_start = start + OPEN.len();

        let Some(close) = bytes[content_start..].iter().position(|&b| b == CLOSE) else {
            // No `]` left, so no later opener can close either
            break;
        };
        let content_end = content_start + close;

        if content_end > content_start && bytes.get(content_end + 1) == Some(&CLOSE) {
            let end = content_end + 2;
            references.push(Reference::parse(
                &text[start..end],
                &text[content_start..content_end],
                start..end,
            ));
            pos = end;
        } else {
            // Every opener before this `]` would stop at the same byte
            pos = content_end + 1;
        }
    }

    references
}

fn find_open(haystack: &[u8]) -> Option<usize> {
    haystack.windows(OPEN.len()).position(|w| w == OPEN)
}

/// Canonical form of a directory target: no leading separators, exactly
/// one trailing separator, or the empty string when nothing remains.
pub fn canonical_directory(raw: &str) -> String {
    let trimmed = raw.trim_matches(PATH_SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}{}", trimmed, PATH_SEPARATOR)
    }
}

/// Canonical form of a file target: the document extension is appended
/// unless already present.
pub fn canonical_file(target: &str, extension: &str) -> String {
    if target.ends_with(extension) {
        target.to_string()
    } else {
        format!("{}{}", target, extension)
    }
}
