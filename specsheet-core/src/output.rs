//! CSV output
//!
//! UTF-8 with a byte-order mark (so spreadsheet apps detect the encoding of
//! Japanese text), CRLF line endings, fields quoted only when needed.

use crate::types::{Column, OutputRecord};
use anyhow::{Context, Result};
use std::path::Path;

const UTF8_BOM: &str = "\u{FEFF}";
const LINE_END: &str = "\r\n";

fn csv_escape(s: &str) -> String {
    if s.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row = fields
        .into_iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&row);
    out.push_str(LINE_END);
}

/// Render the header plus one row per record, BOM included.
pub fn render_csv(records: &[OutputRecord]) -> String {
    let mut out = String::from(UTF8_BOM);
    push_row(&mut out, Column::ALL.iter().map(|c| c.name()));
    for record in records {
        push_row(&mut out, record.iter().map(|(_, cell)| cell.to_string()));
    }
    out
}

/// Write all records to `path` in one go, replacing any existing file.
pub fn write_csv(path: &Path, records: &[OutputRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    std::fs::write(path, render_csv(records))
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}
