//! Field normalization
//!
//! Two pure functions turn loosely-typed model output into stable CSV
//! values: floor lists become a compact label ("1,2F" or 平屋) and area
//! strings become numbers.

use crate::types::{AreaValue, FieldValue};
use regex::Regex;
use std::sync::OnceLock;

/// Label written for a building with a single floor numbered "1".
pub const SINGLE_STORY_LABEL: &str = "平屋";

/// Suffix appended to the comma-joined floor list.
pub const FLOOR_SUFFIX: &str = "F";

/// Format a "Floor number" value as `"1,2F"`, or [`SINGLE_STORY_LABEL`].
///
/// Strings are first decoded as JSON (the model often answers `"[\"1\",\"2\"]"`);
/// a string that is not valid JSON is treated as a single floor. Elements that
/// are not purely decimal digits are dropped, so an input with no numeric
/// floors yields just `"F"`. Any Unicode decimal digit counts (full-width
/// `"２"` included) and is written back in the form the model used.
pub fn format_floor_number(value: &FieldValue) -> String {
    let candidates = match value {
        FieldValue::Text(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(decoded) => floor_candidates(&FieldValue::from(decoded)),
            Err(_) => vec![text.clone()],
        },
        other => floor_candidates(other),
    };

    let mut floors: Vec<String> = candidates
        .into_iter()
        .filter(|f| is_decimal_digits(f))
        .collect();
    floors.sort_by(|a, b| {
        let (ascii_a, ascii_b) = (to_ascii_digits(a), to_ascii_digits(b));
        numeric_key(&ascii_a)
            .cmp(&numeric_key(&ascii_b))
            .then_with(|| a.cmp(b))
    });
    floors.dedup();

    if floors.len() == 1 && floors[0] == "1" {
        return SINGLE_STORY_LABEL.to_string();
    }
    format!("{}{}", floors.join(","), FLOOR_SUFFIX)
}

/// Flatten a decoded floor value into candidate strings.
///
/// Lists contribute one candidate per element; any other value is a
/// single candidate. Values with no digit-only string form yield an empty
/// candidate, which the digit filter discards.
fn floor_candidates(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::List(items) => items.iter().map(floor_element).collect(),
        other => vec![floor_element(other)],
    }
}

fn floor_element(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        // Only non-negative integers render as pure digits; 2.0 or -1 do not
        FieldValue::Number(n) => n.as_u64().map(|u| u.to_string()).unwrap_or_default(),
        FieldValue::Missing
        | FieldValue::Null
        | FieldValue::Bool(_)
        | FieldValue::List(_)
        | FieldValue::Object(_) => String::new(),
    }
}

fn decimal_digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // \d is Unicode-aware: every Nd character, not just 0-9
    RE.get_or_init(|| Regex::new(r"^\d+$").expect("valid digits regex"))
}

fn is_decimal_digits(s: &str) -> bool {
    decimal_digits_regex().is_match(s)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_decimal_digits(c.encode_utf8(&mut buf))
}

/// Value of a Unicode decimal digit.
///
/// Decimal digits are encoded in contiguous runs of ten starting at zero, so
/// the value is the distance back to the start of the run, modulo ten.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

/// Replace every decimal digit with its ASCII form; other characters pass through.
fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| {
            digit_value(c)
                .and_then(|d| char::from_digit(d, 10))
                .unwrap_or(c)
        })
        .collect()
}

/// Sort key for a digit string: length after stripping leading zeros, then text.
fn numeric_key(s: &str) -> (usize, &str) {
    let trimmed = s.trim_start_matches('0');
    (trimmed.len(), trimmed)
}

fn unit_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[m²㎡]\s*$").expect("valid unit suffix regex"))
}

fn first_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.?\d*").expect("valid number regex"))
}

/// Reduce an area value to a number.
///
/// Numbers pass through untouched. Strings lose a trailing unit symbol
/// (`m²`, `㎡`) and yield the first decimal number they contain, or 0.
/// Full-width and other Unicode digits are read by value.
/// Every other shape is 0.
pub fn clean_numeric_value(value: &FieldValue) -> AreaValue {
    match value {
        FieldValue::Number(n) => match n.as_i64() {
            Some(i) => AreaValue::Integer(i),
            None => AreaValue::Float(n.as_f64().unwrap_or(0.0)),
        },
        FieldValue::Text(text) => {
            let stripped = unit_suffix_regex().replace(text.trim(), "");
            first_number_regex()
                .find(&stripped)
                .and_then(|m| to_ascii_digits(m.as_str()).parse::<f64>().ok())
                .map(AreaValue::Float)
                .unwrap_or(AreaValue::ZERO)
        }
        FieldValue::Missing
        | FieldValue::Null
        | FieldValue::Bool(_)
        | FieldValue::List(_)
        | FieldValue::Object(_) => AreaValue::ZERO,
    }
}
