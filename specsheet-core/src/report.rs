//! Run reporting
//!
//! The batch driver never writes to a global logger for its audit trail.
//! It is handed a [`Reporter`] instead: [`FileReporter`] appends timestamped
//! lines to the run log, [`MemoryReporter`] keeps entries in memory.

use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        })
    }
}

/// Sink for run diagnostics.
pub trait Reporter {
    fn report(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Appends `timestamp - LEVEL - message` lines to a log file.
pub struct FileReporter {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileReporter {
    /// Open (or create) the log file in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One log line, e.g. `2024-05-01 09:30:12,045 - ERROR - message`.
pub fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} - {} - {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

impl Reporter for FileReporter {
    fn report(&self, level: Level, message: &str) {
        let line = format_line(level, message);
        let Ok(mut file) = self.file.lock() else {
            log::warn!("log file lock poisoned, dropping entry: {message}");
            return;
        };
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            log::warn!("failed to write to {}: {e}", self.path.display());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

/// Keeps every entry in memory. Used by tests and embedders that want the
/// diagnostics without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == Level::Error)
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                level,
                message: message.to_string(),
            });
        }
    }
}
