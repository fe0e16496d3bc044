//! Extraction Converter — turns the model's label mapping into dataset rows
//! and synthesizes the placeholder wearable rows for the same day.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CerebraError;

/// One dataset row: a label bound to three time-of-day indicator values for
/// one day. `data_type` is `q` for text-derived rows, `w` for the synthesized
/// sensor placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub d: String,
    pub data_type: String,
    pub label: String,
    #[serde(rename = "12am-8am")]
    pub overnight: i64,
    #[serde(rename = "8am-4pm")]
    pub daytime: i64,
    #[serde(rename = "4pm-12am")]
    pub evening: i64,
}

const TIME_BUCKETS: [&str; 3] = ["12am-8am", "8am-4pm", "4pm-12am"];

/// Placeholder wearable data, one (label, buckets) tuple per synthesized row.
/// Stand-in for a not-yet-integrated sensor source; deterministic so query
/// answers stay reproducible during development.
const WEARABLE_PLACEHOLDERS: [(&str, [i64; 3]); 3] = [
    ("bpm", [70, 100, 90]),
    ("calories", [50, 200, 100]),
    ("sleep", [4, 0, 0]),
];

/// Parses the model's extraction output (a label -> {bucket -> indicator}
/// mapping) into `data_type="q"` rows, then appends the fixed `data_type="w"`
/// placeholder rows for the same day.
pub fn convert_journal_output(
    output: &str,
    current_day: &str,
) -> Result<Vec<ObservationRow>, CerebraError> {
    let mapping = parse_label_mapping(output)?;

    let mut rows = Vec::with_capacity(mapping.len() + WEARABLE_PLACEHOLDERS.len());
    for (label, buckets) in &mapping {
        rows.push(row_from_value(current_day, "q", label, buckets)?);
    }

    for (label, values) in WEARABLE_PLACEHOLDERS {
        rows.push(ObservationRow {
            d: current_day.to_string(),
            data_type: "w".to_string(),
            label: label.to_string(),
            overnight: values[0],
            daytime: values[1],
            evening: values[2],
        });
    }

    Ok(rows)
}

/// Parses the output as a JSON object, tolerating markdown code fences and
/// single-quoted (Python-style) mapping literals. Label order is preserved.
fn parse_label_mapping(output: &str) -> Result<Map<String, Value>, CerebraError> {
    let text = strip_code_fences(output);

    if let Ok(mapping) = serde_json::from_str::<Map<String, Value>>(text) {
        return Ok(mapping);
    }

    // Models sometimes echo the single-quoted example format back. The
    // mapping contains no free text, so a blanket quote swap is safe.
    let normalized = text.replace('\'', "\"");
    serde_json::from_str::<Map<String, Value>>(&normalized)
        .map_err(|e| CerebraError::MalformedExtraction(format!("{e}: {output}")))
}

fn row_from_value(
    day: &str,
    data_type: &str,
    label: &str,
    buckets: &Value,
) -> Result<ObservationRow, CerebraError> {
    let bucket_map = buckets.as_object().ok_or_else(|| {
        CerebraError::MalformedExtraction(format!("label '{label}' has no time-bucket mapping"))
    })?;

    let mut values = [0i64; 3];
    for (i, bucket) in TIME_BUCKETS.iter().enumerate() {
        values[i] = bucket_map.get(*bucket).and_then(Value::as_i64).ok_or_else(|| {
            CerebraError::MalformedExtraction(format!(
                "label '{label}' is missing an integer value for '{bucket}'"
            ))
        })?;
    }

    Ok(ObservationRow {
        d: day.to_string(),
        data_type: data_type.to_string(),
        label: label.to_string(),
        overnight: values[0],
        daytime: values[1],
        evening: values[2],
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
