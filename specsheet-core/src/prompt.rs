//! Prompt templates for the extraction request.

use crate::types::Column;

/// System message: strict JSON, every field present, areas without units.
pub const SYSTEM_PROMPT: &str = "You are a skilled assistant trained in extracting precise \
information from the pdf. Always respond with valid JSON, including all specified fields even \
if the value is empty or not found. For all area measurements, return only numeric values \
without units (m² or ㎡).";

/// Build the user message for one document.
///
/// Embeds the extracted text and the file name; the model is told to echo
/// the file name back in the 'File name' field.
pub fn build_prompt(text: &str, filename: &str) -> String {
    let field_list = Column::ALL
        .iter()
        .map(|c| format!("'{}'", c.name()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the text and extract structured information with details for each floor \
(if multiple floors are mentioned). Give me the summarized values of {field_list}. \
For floor number, return an array of floor numbers mentioned in the document. \
If there is only one page in the pdf, return [\"1\"].
The values for floor areas should be mapped as follows:
- 'Floor area 1': Area of 1st floor (numeric value only, without m² or ㎡)
- 'Floor area 2': Area of 2nd floor (numeric value only, without m² or ㎡)
- 'Floor area 3': Area of 3rd floor (numeric value only, without m² or ㎡)
- 'Loft': Area marked as loft space (ロフト) or attic storage (小屋裏収納) (numeric value only)
- 'Penthouse area': Area specifically marked as penthouse (numeric value only)
Only return the numeric part of the floor area (e.g., \"75.5\" instead of \"75.5m²\"). \
The value for the field 'File name' will be '{filename}'. \
The output should be in JSON format containing only these fields and their associated values:
- File name
- Builder name (ビルダー名)
- Stud sink direction (スタッド流し方向) (Format: '@number')
- Wall width (壁先行) (Format: 'number mm', e.g., '105 mm')
- Board thickness (壁ボード) (Format: 'number mm', e.g., '12.5 mm')
- Floor height (階高) (Format: 'number mm per floor', e.g., '1階: 2750 mm')
- Ceiling height (天井高) (Format: 'number mm per floor', e.g., '1階: 2200 mm')
- Floor number (Array of floor numbers, e.g., [\"1\"] for single floor, [\"1\", \"2\"] for two floors)
- Order number (【案件No】) (Format: '6 digits')
- Order name (【案件名】) (Format: name)
- Comment section (【特 記】) (Format: specific comments per floor)
- Floor area (【面積】) (Format: numeric values only, without units)
- Penthouse area (Format: numeric value only)
Text provided:
{text}
"
    )
}
