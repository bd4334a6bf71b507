//! # Summary Data Module
//!
//! Loads the tabular summary data exported by the dashboard host. A file holds
//! either a single summary (`{columns, data}`) or a bundle of named worksheets
//! (`{worksheets: [{name, columns, data}]}`), mirroring the several worksheets a
//! label dashboard switches between.
use crate::error::ResultMessage;
use crate::error::RustyLabelError;
use glob::Pattern;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub(crate) mod data;
pub(crate) mod item;

pub(crate) use data::SummaryData;
pub(crate) use item::map_rows_to_items;
pub(crate) use item::Item;

/// Errors related to loading summary data.
#[derive(Error, Debug)]
pub(crate) enum SummaryError {
    #[error("Empty file pattern")]
    EmptyPattern,

    #[error("No file matches '{0}'")]
    NoFilesMatched(String),

    #[error("File contains no worksheet")]
    EmptyWorkbook,

    #[error("No worksheet matches '{0}'")]
    WorksheetNotFound(String),

    #[error("Row {} has {actual} cells but {expected} columns are declared", .row + 1)]
    ArityMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// One named summary inside a workbook.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub(crate) struct Worksheet {
    pub(crate) name: String,
    #[serde(flatten)]
    pub(crate) summary: SummaryData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Bundle { worksheets: Vec<Worksheet> },
    Single(SummaryData),
}

/// All worksheets loaded from one summary file.
#[derive(Clone, Debug)]
pub(crate) struct Workbook {
    pub(crate) file_name: String,
    pub(crate) worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Parses a summary file. A bare summary becomes a single worksheet named after the file stem.
    pub(crate) fn from_json(file_name: &str, text: &str) -> Result<Self, RustyLabelError> {
        let worksheets = match serde_json::from_str::<Document>(text)? {
            Document::Bundle { worksheets } => worksheets,
            Document::Single(summary) => vec![Worksheet {
                name: Path::new(file_name)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                summary,
            }],
        };
        Ok(Workbook {
            file_name: file_name.to_owned(),
            worksheets,
        })
    }

    /// Selects worksheets by name pattern, or the first worksheet when no pattern is given.
    pub(crate) fn select(&self, pattern: Option<&Pattern>) -> Result<Vec<&Worksheet>, SummaryError> {
        match pattern {
            None => self
                .worksheets
                .first()
                .map(|worksheet| vec![worksheet])
                .ok_or(SummaryError::EmptyWorkbook),
            Some(pattern) => {
                let worksheets: Vec<&Worksheet> = self
                    .worksheets
                    .iter()
                    .filter(|worksheet| pattern.matches(&worksheet.name))
                    .collect();
                if worksheets.is_empty() {
                    Err(SummaryError::WorksheetNotFound(pattern.to_string()))
                } else {
                    Ok(worksheets)
                }
            }
        }
    }
}

/// Opens every summary file matching a glob pattern, in path order.
pub(crate) fn open_workbooks(pattern: &str) -> Result<Vec<Workbook>, RustyLabelError> {
    if pattern.trim().is_empty() {
        return Err(SummaryError::EmptyPattern.into());
    }
    let paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    if paths.is_empty() {
        return Err(SummaryError::NoFilesMatched(pattern.to_owned()).into());
    }
    paths
        .iter()
        .map(|path| {
            let file_name = path.to_string_lossy();
            debug!(file = %file_name, "loading summary data");
            std::fs::read_to_string(path)
                .map_err(RustyLabelError::from)
                .and_then(|text| Workbook::from_json(&file_name, &text))
                .with_prefix(&file_name)
        })
        .collect()
}

/// Maps every selected worksheet of every workbook to items, concatenated in file order.
pub(crate) fn load_items(
    workbooks: &[Workbook],
    worksheet: Option<&Pattern>,
) -> Result<(Vec<String>, Vec<Item>), RustyLabelError> {
    let mut fields = Vec::<String>::new();
    let mut items = Vec::<Item>::new();
    for workbook in workbooks {
        let worksheets = workbook
            .select(worksheet)
            .map_err(RustyLabelError::from)
            .with_prefix(&workbook.file_name)?;
        for sheet in worksheets {
            for column in &sheet.summary.columns {
                if !fields.contains(&column.field_name) {
                    fields.push(column.field_name.to_owned());
                }
            }
            let mapped = map_rows_to_items(&sheet.summary)
                .map_err(RustyLabelError::from)
                .with_prefix(&format!("{}#{}", workbook.file_name, sheet.name))?;
            debug!(file = %workbook.file_name, worksheet = %sheet.name, rows = mapped.len(), "mapped summary rows");
            items.extend(mapped);
        }
    }
    Ok((fields, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BUNDLE: &str = r#"{
        "worksheets": [
            {"name": "Adresse", "columns": [{"fieldName": "adresse_nom"}], "data": [["VULLI"]]},
            {"name": "Course", "columns": [{"fieldName": "ref"}, {"fieldName": "nb_colis_bp"}], "data": [["A1", "2"]]},
            {"name": "Manuel", "columns": [{"fieldName": "ref"}, {"fieldName": "manuel_bn"}], "data": [["M1", "BN7"]]}
        ]
    }"#;

    #[test]
    fn single_summary_named_after_file() {
        let workbook = Workbook::from_json(
            "/tmp/course.json",
            r#"{"columns": [{"fieldName": "ref"}], "data": [["A1"]]}"#,
        )
        .unwrap();
        assert_eq!(workbook.worksheets.len(), 1);
        assert_eq!(workbook.worksheets[0].name, "course");
    }

    #[test]
    fn default_selection_is_first_worksheet() {
        let workbook = Workbook::from_json("bundle.json", BUNDLE).unwrap();
        let selected = workbook.select(None).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Adresse");
    }

    #[test]
    fn selection_by_pattern() {
        let workbook = Workbook::from_json("bundle.json", BUNDLE).unwrap();
        let pattern = Pattern::new("Ma*").unwrap();
        let selected = workbook.select(Some(&pattern)).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Manuel");

        let pattern = Pattern::new("*").unwrap();
        assert_eq!(workbook.select(Some(&pattern)).unwrap().len(), 3);
    }

    #[test]
    fn selection_without_match_fails() {
        let workbook = Workbook::from_json("bundle.json", BUNDLE).unwrap();
        let pattern = Pattern::new("Stock").unwrap();
        let error = workbook.select(Some(&pattern)).unwrap_err();
        assert_eq!(error.to_string(), "No worksheet matches 'Stock'");
    }

    #[test]
    fn empty_bundle_has_no_default_worksheet() {
        let workbook = Workbook::from_json("empty.json", r#"{"worksheets": []}"#).unwrap();
        assert!(matches!(workbook.select(None), Err(SummaryError::EmptyWorkbook)));
    }

    #[test]
    fn fields_are_collected_in_first_seen_order() {
        let workbook = Workbook::from_json("bundle.json", BUNDLE).unwrap();
        let pattern = Pattern::new("[CM]*").unwrap();
        let (fields, items) = load_items(&[workbook], Some(&pattern)).unwrap();
        assert_eq!(fields, vec!["ref", "nb_colis_bp", "manuel_bn"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("ref"), Some("A1"));
        assert_eq!(items[1].get("manuel_bn"), Some("BN7"));
    }

    #[test]
    fn arity_error_names_file_and_worksheet() {
        let workbook = Workbook::from_json(
            "broken.json",
            r#"{"columns": [{"fieldName": "ref"}, {"fieldName": "pcb"}], "data": [["A1"]]}"#,
        )
        .unwrap();
        let error = load_items(&[workbook], None).unwrap_err();
        assert_eq!(
            error.to_string(),
            "broken.json#broken: Row 1 has 1 cells but 2 columns are declared"
        );
    }

    #[test]
    fn open_workbooks_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"{"columns": [{"fieldName": "ref"}], "data": [["B"]]}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"columns": [{"fieldName": "ref"}], "data": [["A"]]}"#).unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let workbooks = open_workbooks(&pattern).unwrap();
        let names: Vec<&str> = workbooks.iter().map(|it| it.worksheets[0].name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn open_workbooks_without_match() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let error = open_workbooks(&pattern).unwrap_err();
        assert_eq!(error.to_string(), format!("No file matches '{pattern}'"));
    }

    #[test]
    fn open_workbooks_reports_invalid_json_with_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        fs::write(&file, "not json").unwrap();
        let error = open_workbooks(&file.to_string_lossy()).unwrap_err();
        assert!(error.to_string().starts_with(&file.to_string_lossy().to_string()));
    }
}
