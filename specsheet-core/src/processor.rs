use crate::config::LlmConfig;
use crate::error::{DocumentError, DocumentResult, SkipKind};
use crate::extractors::{PdfTextExtractor, TextExtractor};
use crate::llm::{CompletionClient, OpenAiClient};
use crate::mapper::map_record;
use crate::output::write_csv;
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::report::Reporter;
use crate::response::parse_response;
use crate::types::{BatchSummary, OutputRecord};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Message written to the console and the log after the CSV is saved.
pub const COMPLETION_MESSAGE: &str = "Data extraction and storage to CSV completed successfully.";

/// Sequential batch driver: one document at a time, extract → prompt →
/// complete → parse → map, then a single CSV write.
pub struct BatchProcessor {
    extractor: Box<dyn TextExtractor>,
    client: Box<dyn CompletionClient>,
}

impl BatchProcessor {
    /// Create BatchProcessor with full dependency injection
    pub fn new_with_dependencies(
        extractor: Box<dyn TextExtractor>,
        client: Box<dyn CompletionClient>,
    ) -> Self {
        Self { extractor, client }
    }

    /// Convenience constructor for CLI usage: pdf-extract + HTTP client,
    /// API key read from the environment. A missing key does not fail here;
    /// every document is then skipped with a completion error.
    pub fn new_cli(llm: &LlmConfig) -> Self {
        Self::new_with_dependencies(
            Box::new(PdfTextExtractor::new()),
            Box::new(OpenAiClient::from_env(llm)),
        )
    }

    /// Run the whole batch and write the CSV.
    ///
    /// Per-document failures are logged and skipped. Failing to list the
    /// input directory or to write the CSV is returned as an error.
    pub fn run(
        &self,
        input_dir: &Path,
        output_csv: &Path,
        reporter: &dyn Reporter,
    ) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let (records, mut summary) = self.process_directory(input_dir, reporter)?;

        write_csv(output_csv, &records)?;
        summary.output = output_csv.to_path_buf();
        reporter.info(COMPLETION_MESSAGE);

        log::info!(
            "{} of {} document(s) written to {} in {:.3}s",
            summary.written,
            summary.candidates,
            output_csv.display(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(summary)
    }

    /// Process every PDF in `input_dir`, returning the surviving records in
    /// processing order.
    pub fn process_directory(
        &self,
        input_dir: &Path,
        reporter: &dyn Reporter,
    ) -> Result<(Vec<OutputRecord>, BatchSummary)> {
        let files = list_documents(input_dir, self.extractor.as_ref())?;
        let mut summary = BatchSummary {
            candidates: files.len(),
            ..BatchSummary::default()
        };
        let mut records = Vec::with_capacity(files.len());

        for path in &files {
            match self.process_document(path) {
                Ok(record) => {
                    records.push(record);
                    summary.written += 1;
                }
                Err(err) => {
                    log::warn!("skipping {}: {}", path.display(), err);
                    reporter.error(&failure_message(path, &err));
                    match err.kind() {
                        SkipKind::Extraction => summary.extraction_failures += 1,
                        SkipKind::Completion => summary.completion_failures += 1,
                        SkipKind::ResponseParse => summary.parse_failures += 1,
                    }
                }
            }
        }

        Ok((records, summary))
    }

    /// Run one document through the pipeline.
    pub fn process_document(&self, path: &Path) -> DocumentResult<OutputRecord> {
        let filename = file_name(path);

        let text = self.extractor.extract_text(path)?;
        log::debug!("{filename}: {} chars extracted by {}", text.len(), self.extractor.name());

        let prompt = build_prompt(&text, &filename);
        let raw = self.client.complete(SYSTEM_PROMPT, &prompt)?;
        log::debug!("{filename}: {} chars returned by {}", raw.len(), self.client.model());

        let parsed = parse_response(&raw)?;
        Ok(map_record(&parsed))
    }
}

/// Entries of `dir` the extractor accepts, in directory-listing order.
/// Subdirectories are not descended into.
pub fn list_documents(dir: &Path, extractor: &dyn TextExtractor) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in: {}", dir.display()))?;
        let path = entry.path();
        if extractor.supports_file_type(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Log message for a skipped document.
fn failure_message(path: &Path, err: &DocumentError) -> String {
    match err {
        DocumentError::Extraction(_) | DocumentError::NoText => {
            format!("Error extracting text from {}: {}", path.display(), err)
        }
        DocumentError::Completion(_) => {
            format!("Error querying language model for {}: {}", file_name(path), err)
        }
        DocumentError::ResponseParse { message, raw } => format!(
            "Error parsing JSON for file {}. Error: {}\nRaw response: {}",
            file_name(path),
            message,
            raw
        ),
    }
}
