//! Text Extractors
//!
//! This module turns source documents into the plain text handed to the
//! language model.
//!
//! ## Architecture
//!
//! ```text
//! Document (PDF)
//!     ↓
//! [Format-specific TextExtractor]  → one string per page
//!     ↓
//! extract_text (non-blank pages joined by newlines)
//!     ↓
//! Prompt Builder
//! ```
//!
//! ## Available Extractors
//!
//! - `PdfTextExtractor` - PDF documents via the `pdf-extract` crate

pub mod extractor;
pub mod pdf;

pub use extractor::{join_pages, TextExtractor};
pub use pdf::PdfTextExtractor;
