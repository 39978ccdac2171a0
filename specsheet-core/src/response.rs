//! Model response normalization: strip Markdown fences, parse the JSON object.

use crate::error::{DocumentError, DocumentResult};
use crate::types::ParsedRecord;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Opening ```json at the start of a line, closing ``` at the end of a line
    RE.get_or_init(|| Regex::new(r"(?m)^```json\s*|```\s*$").expect("valid fence regex"))
}

/// Remove code-fence markers and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    fence_regex().replace_all(raw, "").trim().to_string()
}

/// Parse a raw model answer into a [`ParsedRecord`].
///
/// The error carries the untouched raw answer so the caller can log it.
pub fn parse_response(raw: &str) -> DocumentResult<ParsedRecord> {
    let cleaned = strip_code_fences(raw);
    let parse_error = |message: String| DocumentError::ResponseParse {
        message,
        raw: raw.to_string(),
    };

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(fields)) => Ok(ParsedRecord::new(fields)),
        Ok(other) => Err(parse_error(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(parse_error(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
