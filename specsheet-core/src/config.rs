use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// Default value functions for serde
fn default_input_dir() -> PathBuf {
    PathBuf::from("file")
}

fn default_output_csv() -> PathBuf {
    PathBuf::from("xyz2.csv")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("extraction_log.txt")
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Run configuration. Every field has a default, so an empty YAML file
/// (or no file at all) reproduces the stock setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Directory scanned (non-recursively) for `*.pdf` files
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// CSV file written once at the end of the run
    #[serde(default = "default_output_csv")]
    pub output_csv: PathBuf,
    /// Append-only diagnostic log
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Language model connection
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout; `None` leaves the HTTP client's defaults in place
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_csv: default_output_csv(),
            log_file: default_log_file(),
            llm: LlmConfig::default(),
        }
    }
}

impl LlmConfig {
    /// API key from the configured environment variable; blank counts as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl ExtractionConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file: {path}"))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes as null; treat it as "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                eprintln!("⚠️  Failed to load config from {p} ({e:#}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
