// Extractor abstraction for document text
//
// This module defines the boundary between reading a document and everything
// downstream (prompting, parsing, mapping). Downstream code only ever sees the
// joined text, so extraction backends can be swapped or stubbed in tests.

use crate::error::{DocumentError, DocumentResult};
use std::path::Path;

/// TextExtractor trait - converts a document on disk to page texts
///
/// Extraction happens in two steps:
/// 1. Document -> page texts (backend specific)
/// 2. Page texts -> one string (shared, see [`join_pages`])
pub trait TextExtractor {
    /// Step 1: Extract the text of every page, in page order.
    ///
    /// Pages without text may be returned as empty strings.
    fn extract_pages(&self, path: &Path) -> DocumentResult<Vec<String>>;

    /// Full extraction: pages with text joined by newlines.
    ///
    /// Fails with [`DocumentError::NoText`] when no page carries text.
    fn extract_text(&self, path: &Path) -> DocumentResult<String> {
        join_pages(self.extract_pages(path)?)
    }

    /// Extractor name for debugging/logging
    fn name(&self) -> &str;

    /// Whether `path` is a document this extractor reads. The batch driver
    /// only picks up directory entries that pass this check.
    fn supports_file_type(&self, path: &Path) -> bool;
}

/// Join non-blank pages with `\n`.
pub fn join_pages<I, S>(pages: I) -> DocumentResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kept: Vec<S> = pages
        .into_iter()
        .filter(|page| !page.as_ref().trim().is_empty())
        .collect();

    if kept.is_empty() {
        return Err(DocumentError::NoText);
    }

    Ok(kept
        .iter()
        .map(|page| page.as_ref())
        .collect::<Vec<_>>()
        .join("\n"))
}
