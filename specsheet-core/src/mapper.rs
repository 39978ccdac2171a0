//! Field mapping: model response → one CSV row.

use crate::normalize::{clean_numeric_value, format_floor_number};
use crate::types::{AreaValue, CellValue, Column, FieldValue, OutputRecord, ParsedRecord};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io;

/// Map a parsed response onto the sixteen output columns.
///
/// Missing text fields become empty strings and missing or zero area
/// fields become the integer 0.
pub fn map_record(record: &ParsedRecord) -> OutputRecord {
    OutputRecord::from_fn(|column| map_cell(column, &record.field(column.name())))
}

fn map_cell(column: Column, value: &FieldValue) -> CellValue {
    if column == Column::FloorNumber {
        return match value {
            FieldValue::Missing => CellValue::Text(String::new()),
            present => CellValue::Text(format_floor_number(present)),
        };
    }

    if column.is_area() {
        let cleaned = clean_numeric_value(value);
        return CellValue::Area(if cleaned.is_zero() { AreaValue::ZERO } else { cleaned });
    }

    CellValue::Text(match value {
        FieldValue::Missing | FieldValue::Null => String::new(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Bool(true) => "True".to_string(),
        FieldValue::Bool(false) => "False".to_string(),
        FieldValue::List(_) | FieldValue::Object(_) => to_json_text(&value.to_json()),
    })
}

/// JSON text with `", "` / `": "` separators and non-ASCII kept literal.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_json_text(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SINGLE_STORY_LABEL;
    use serde_json::json;

    fn record(value: Value) -> ParsedRecord {
        ParsedRecord::new(value.as_object().cloned().unwrap_or_default())
    }

    fn text(rec: &OutputRecord, column: Column) -> &str {
        rec.get(column).as_text().unwrap()
    }

    fn area(rec: &OutputRecord, column: Column) -> AreaValue {
        rec.get(column).as_area().unwrap()
    }

    #[test]
    fn test_full_record() {
        let rec = map_record(&record(json!({
            "File name": "plan_001.pdf",
            "Builder name": "山田工務店",
            "Stud sink direction": "@455",
            "Wall width": "105 mm",
            "Board thickness": "12.5 mm",
            "Floor height": "1階: 2750 mm",
            "Ceiling height": "1階: 2200 mm",
            "Floor number": ["1", "2", "2"],
            "Order number": "123456",
            "Order name": "山田様邸",
            "Comment section": "特になし",
            "Floor area 1": "75.5m²",
            "Floor area 2": 60,
            "Floor area 3": "",
            "Loft": "8.28㎡",
            "Penthouse area": null
        })));

        assert_eq!(text(&rec, Column::FileName), "plan_001.pdf");
        assert_eq!(text(&rec, Column::FloorNumber), "1,2F");
        assert_eq!(text(&rec, Column::OrderNumber), "123456");
        assert_eq!(area(&rec, Column::FloorArea1), AreaValue::Float(75.5));
        assert_eq!(area(&rec, Column::FloorArea2), AreaValue::Integer(60));
        assert_eq!(area(&rec, Column::FloorArea3), AreaValue::ZERO);
        assert_eq!(area(&rec, Column::Loft), AreaValue::Float(8.28));
        assert_eq!(area(&rec, Column::PenthouseArea), AreaValue::ZERO);
    }

    #[test]
    fn test_empty_record_fills_defaults() {
        let rec = map_record(&record(json!({})));
        for (column, cell) in rec.iter() {
            if column.is_area() {
                assert_eq!(cell, &CellValue::Area(AreaValue::ZERO), "{}", column.name());
            } else {
                assert_eq!(cell, &CellValue::Text(String::new()), "{}", column.name());
            }
        }
    }

    #[test]
    fn test_zero_float_area_becomes_integer_zero() {
        let rec = map_record(&record(json!({"Loft": "0.0", "Floor area 1": 0.0})));
        assert_eq!(area(&rec, Column::Loft), AreaValue::ZERO);
        assert_eq!(area(&rec, Column::FloorArea1), AreaValue::ZERO);
    }

    #[test]
    fn test_structured_values_serialized_as_json() {
        let rec = map_record(&record(json!({
            "Floor height": {"1階": "2750 mm", "2階": "2650 mm"},
            "Comment section": ["1F: 補強あり", "2F: なし"]
        })));
        assert_eq!(
            text(&rec, Column::FloorHeight),
            r#"{"1階": "2750 mm", "2階": "2650 mm"}"#
        );
        assert_eq!(
            text(&rec, Column::CommentSection),
            r#"["1F: 補強あり", "2F: なし"]"#
        );
    }

    #[test]
    fn test_floor_number_formatting_applies_to_any_shape() {
        let rec = map_record(&record(json!({"Floor number": "[\"1\"]"})));
        assert_eq!(text(&rec, Column::FloorNumber), SINGLE_STORY_LABEL);

        let rec = map_record(&record(json!({"Floor number": null})));
        assert_eq!(text(&rec, Column::FloorNumber), "F");
    }

    #[test]
    fn test_missing_floor_number_is_empty() {
        let rec = map_record(&record(json!({"Builder name": "ACME"})));
        assert_eq!(text(&rec, Column::FloorNumber), "");
    }

    #[test]
    fn test_scalar_text_columns() {
        let rec = map_record(&record(json!({
            "Order number": 123456,
            "Wall width": 105.5,
            "Order name": true
        })));
        assert_eq!(text(&rec, Column::OrderNumber), "123456");
        assert_eq!(text(&rec, Column::WallWidth), "105.5");
        assert_eq!(text(&rec, Column::OrderName), "True");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let rec = map_record(&record(json!({"Architect": "someone", "Loft": 5})));
        assert_eq!(area(&rec, Column::Loft), AreaValue::Integer(5));
        assert_eq!(rec.iter().count(), 16);
    }
}
