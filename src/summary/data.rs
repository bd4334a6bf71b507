//! Serde model of the summary data exported by the dashboard host.

use serde::Deserialize;
use serde_json::Value;

/// Identifies one field of the tabular result.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ColumnDescriptor {
    /// Field name used as the item key
    pub(crate) field_name: String,
}

/// A single cell of a summary row.
///
/// The host exports cells as objects carrying both the raw and the formatted
/// value, hand-written fixtures often use bare scalars. Both shapes are accepted.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum DataCell {
    Formatted {
        #[serde(rename = "formattedValue")]
        formatted_value: Option<String>,
        #[serde(default)]
        value: Value,
    },
    Scalar(Value),
}

impl DataCell {
    /// Returns the display string of the cell, preferring the host formatting.
    pub(crate) fn formatted(&self) -> String {
        match self {
            DataCell::Formatted { formatted_value: Some(text), .. } => text.to_owned(),
            DataCell::Formatted { formatted_value: None, value } => scalar_text(value),
            DataCell::Scalar(value) => scalar_text(value),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.to_owned(),
        other => other.to_string(),
    }
}

/// Tabular result of one worksheet: column descriptors plus positionally aligned rows.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct SummaryData {
    pub(crate) columns: Vec<ColumnDescriptor>,
    pub(crate) data: Vec<Vec<DataCell>>,
}

impl SummaryData {
    /// Builds summary data from field names and pre-formatted rows.
    #[cfg(test)]
    pub(crate) fn from_rows(fields: &[&str], rows: &[&[&str]]) -> Self {
        SummaryData {
            columns: fields
                .iter()
                .map(|name| ColumnDescriptor { field_name: name.to_string() })
                .collect(),
            data: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|text| DataCell::Scalar(Value::String(text.to_string())))
                        .collect()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_value_wins_over_raw_value() {
        let cell: DataCell = serde_json::from_str(r#"{"value": 12.5, "formattedValue": "12,5"}"#).unwrap();
        assert_eq!(cell.formatted(), "12,5");
    }

    #[test]
    fn raw_value_used_without_formatting() {
        let cell: DataCell = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        assert_eq!(cell.formatted(), "3");
        let cell: DataCell = serde_json::from_str(r#"{"value": "B2"}"#).unwrap();
        assert_eq!(cell.formatted(), "B2");
    }

    #[test]
    fn bare_scalars() {
        let cells: Vec<DataCell> = serde_json::from_str(r#"["A1", 2, true, null]"#).unwrap();
        let texts: Vec<String> = cells.iter().map(DataCell::formatted).collect();
        assert_eq!(texts, vec!["A1", "2", "true", ""]);
    }

    #[test]
    fn summary_ignores_extra_column_metadata() {
        let summary: SummaryData = serde_json::from_str(
            r#"{
                "columns": [{"fieldName": "ref", "dataType": "string", "index": 0}],
                "data": [[{"formattedValue": "A1"}]]
            }"#,
        )
        .unwrap();
        assert_eq!(summary.columns[0].field_name, "ref");
        assert_eq!(summary.data[0][0].formatted(), "A1");
    }
}
