use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::PathBuf;

// ===== INPUT SIDE: values reported by the model =====

/// A single field value as reported by the model.
///
/// The model is free to answer with a string, a number, a list or an object
/// for the same logical field, so every consumer matches on this enum
/// instead of probing a raw JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The key was not present in the response at all
    Missing,
    /// The key was present with a JSON `null`
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<FieldValue>),
    Object(Map<String, Value>),
}

impl FieldValue {
    /// Convert back to a JSON value. `Missing` becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Missing | FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Object(map) => Value::Object(map.clone()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Object(map),
        }
    }
}

/// The JSON object returned by the model, keys in the order the model wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecord {
    fields: Map<String, Value>,
}

impl ParsedRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a field by its reported name.
    pub fn field(&self, name: &str) -> FieldValue {
        self.fields
            .get(name)
            .cloned()
            .map(FieldValue::from)
            .unwrap_or(FieldValue::Missing)
    }
}

// ===== OUTPUT SIDE: CSV columns and cells =====

/// The sixteen output columns, in header order.
///
/// The model is asked to report fields under exactly these names, so the
/// column name doubles as the lookup key into a [`ParsedRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    FileName,
    BuilderName,
    StudSinkDirection,
    WallWidth,
    BoardThickness,
    FloorHeight,
    CeilingHeight,
    FloorNumber,
    OrderNumber,
    OrderName,
    CommentSection,
    FloorArea1,
    FloorArea2,
    FloorArea3,
    Loft,
    PenthouseArea,
}

impl Column {
    pub const ALL: [Column; 16] = [
        Column::FileName,
        Column::BuilderName,
        Column::StudSinkDirection,
        Column::WallWidth,
        Column::BoardThickness,
        Column::FloorHeight,
        Column::CeilingHeight,
        Column::FloorNumber,
        Column::OrderNumber,
        Column::OrderName,
        Column::CommentSection,
        Column::FloorArea1,
        Column::FloorArea2,
        Column::FloorArea3,
        Column::Loft,
        Column::PenthouseArea,
    ];

    /// Header text, also the field name the model reports under.
    pub fn name(self) -> &'static str {
        match self {
            Column::FileName => "File name",
            Column::BuilderName => "Builder name",
            Column::StudSinkDirection => "Stud sink direction",
            Column::WallWidth => "Wall width",
            Column::BoardThickness => "Board thickness",
            Column::FloorHeight => "Floor height",
            Column::CeilingHeight => "Ceiling height",
            Column::FloorNumber => "Floor number",
            Column::OrderNumber => "Order number",
            Column::OrderName => "Order name",
            Column::CommentSection => "Comment section",
            Column::FloorArea1 => "Floor area 1",
            Column::FloorArea2 => "Floor area 2",
            Column::FloorArea3 => "Floor area 3",
            Column::Loft => "Loft",
            Column::PenthouseArea => "Penthouse area",
        }
    }

    /// Area columns always hold a number in the output.
    pub fn is_area(self) -> bool {
        matches!(
            self,
            Column::FloorArea1
                | Column::FloorArea2
                | Column::FloorArea3
                | Column::Loft
                | Column::PenthouseArea
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Numeric value of an area column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaValue {
    Integer(i64),
    Float(f64),
}

impl AreaValue {
    pub const ZERO: AreaValue = AreaValue::Integer(0);

    pub fn is_zero(self) -> bool {
        match self {
            AreaValue::Integer(i) => i == 0,
            AreaValue::Float(f) => f == 0.0,
        }
    }
}

impl fmt::Display for AreaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AreaValue::Integer(i) => write!(f, "{i}"),
            AreaValue::Float(v) => f.write_str(&format_float(v)),
        }
    }
}

/// Shortest round-trip form of a float, positional for magnitudes in
/// `[1e-4, 1e16)` (integral values keep one decimal: `120.0`) and
/// exponent form with a signed two-digit exponent outside it (`1e+16`, `1e-07`).
fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let magnitude = v.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return if v.fract() == 0.0 {
            format!("{v:.1}")
        } else {
            format!("{v}")
        };
    }

    let scientific = format!("{v:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// One CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Area(AreaValue),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Area(_) => None,
        }
    }

    pub fn as_area(&self) -> Option<AreaValue> {
        match self {
            CellValue::Text(_) => None,
            CellValue::Area(a) => Some(*a),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Area(a) => a.fmt(f),
        }
    }
}

/// One output row: exactly one cell per [`Column`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    cells: [CellValue; 16],
}

impl OutputRecord {
    /// Build a record by computing each column's cell.
    pub fn from_fn(mut cell: impl FnMut(Column) -> CellValue) -> Self {
        Self {
            cells: Column::ALL.map(|column| {
                let value = cell(column);
                // Area columns are numeric, everything else is text
                match (column.is_area(), value) {
                    (true, CellValue::Text(_)) => CellValue::Area(AreaValue::ZERO),
                    (false, CellValue::Area(a)) => CellValue::Text(a.to_string()),
                    (_, value) => value,
                }
            }),
        }
    }

    pub fn get(&self, column: Column) -> &CellValue {
        &self.cells[column.index()]
    }

    /// Cells paired with their columns, in header order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &CellValue)> {
        Column::ALL.iter().copied().zip(self.cells.iter())
    }
}

/// Counts reported at the end of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Directory entries ending in `.pdf`
    pub candidates: usize,
    pub written: usize,
    pub extraction_failures: usize,
    pub completion_failures: usize,
    pub parse_failures: usize,
    /// CSV file the records were written to
    pub output: PathBuf,
}

impl BatchSummary {
    pub fn skipped(&self) -> usize {
        self.extraction_failures + self.completion_failures + self.parse_failures
    }
}
