// Specsheet Core Library
//
// Extracts construction fields from PDF spec sheets with a language model
// and collects them into a single CSV. Main interface is BatchProcessor.

pub mod types;
pub mod error;
pub mod config;
pub mod extractors;
pub mod prompt;
pub mod llm;
pub mod response;
pub mod normalize;
pub mod mapper;
pub mod output;
pub mod report;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{DocumentError, DocumentResult, SkipKind};
pub use config::{ExtractionConfig, LlmConfig};
pub use extractors::{PdfTextExtractor, TextExtractor};
pub use llm::{CompletionClient, OpenAiClient};
pub use normalize::{clean_numeric_value, format_floor_number, SINGLE_STORY_LABEL};
pub use mapper::map_record;
pub use report::{FileReporter, Level, LogEntry, MemoryReporter, Reporter};
pub use processor::{list_documents, BatchProcessor, COMPLETION_MESSAGE};
