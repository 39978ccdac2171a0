//! PDF text extraction
//!
//! Wraps the `pdf-extract` crate. `pdf-extract` returns the whole document
//! as one string with a form feed between pages, so pages are recovered by
//! splitting on `\x0C`.

use super::extractor::TextExtractor;
use crate::error::{DocumentError, DocumentResult};
use std::panic;
use std::path::Path;
use std::sync::Mutex;

const PAGE_BREAK: char = '\x0C';

/// PDF extractor backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract page texts from in-memory PDF bytes.
    pub fn extract_pages_from_bytes(&self, pdf_bytes: &[u8]) -> DocumentResult<Vec<String>> {
        // pdf-extract panics on some malformed inputs; treat that as a failed document
        let text = catch_quietly(|| pdf_extract::extract_text_from_mem(pdf_bytes))
            .map_err(|msg| DocumentError::Extraction(format!("PDF parser panicked: {msg}")))?
            .map_err(|e| DocumentError::Extraction(e.to_string()))?;

        Ok(split_pages(&text))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> DocumentResult<Vec<String>> {
        let pdf_bytes = std::fs::read(path).map_err(|e| DocumentError::Extraction(e.to_string()))?;
        let pages = self.extract_pages_from_bytes(&pdf_bytes)?;
        log::debug!("{}: {} page(s) extracted", path.display(), pages.len());
        Ok(pages)
    }

    fn name(&self) -> &str {
        "PdfTextExtractor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(".pdf"))
            .unwrap_or(false)
    }
}

fn split_pages(text: &str) -> Vec<String> {
    text.split(PAGE_BREAK).map(str::to_string).collect()
}

/// Run `f`, turning a panic into its message. The panic hook is swapped for
/// a silent one meanwhile so nothing reaches stderr; the message ends up in
/// the run log through the returned error instead.
fn catch_quietly<T>(f: impl FnOnce() -> T + panic::UnwindSafe) -> Result<T, String> {
    // The hook is process-wide; concurrent swaps would leave the silent one installed
    static HOOK_SWAP: Mutex<()> = Mutex::new(());
    let _guard = HOOK_SWAP.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(f);
    panic::set_hook(previous);
    result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_on_form_feed() {
        assert_eq!(split_pages("one\x0Ctwo\x0C"), vec!["one", "two", ""]);
        assert_eq!(split_pages("single"), vec!["single"]);
    }

    #[test]
    fn test_supports_lowercase_pdf_only() {
        let extractor = PdfTextExtractor::new();
        assert!(extractor.supports_file_type(Path::new("file/plan.pdf")));
        assert!(!extractor.supports_file_type(Path::new("file/plan.PDF")));
        assert!(!extractor.supports_file_type(Path::new("file/plan.txt")));
    }

    #[test]
    fn test_catch_quietly_returns_panic_message() {
        let result: Result<(), String> = catch_quietly(|| panic!("bad xref table"));
        assert_eq!(result.unwrap_err(), "bad xref table");

        let formatted: Result<(), String> = catch_quietly(|| panic!("object {} missing", 7));
        assert_eq!(formatted.unwrap_err(), "object 7 missing");

        assert_eq!(catch_quietly(|| 42), Ok(42));
    }

    #[test]
    fn test_garbage_bytes_fail_extraction() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_pages_from_bytes(b"this is not a pdf");
        assert!(matches!(result, Err(DocumentError::Extraction(_))));
    }

    #[test]
    fn test_missing_file_fails_extraction() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_text(Path::new("does/not/exist.pdf"));
        assert!(matches!(result, Err(DocumentError::Extraction(_))));
    }

    #[test]
    fn test_corrupt_file_on_disk_fails_extraction() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\ntruncated").unwrap();
        let extractor = PdfTextExtractor::new();
        assert!(extractor.extract_text(file.path()).is_err());
    }
}
