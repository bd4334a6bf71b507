use crate::extension::chunk_range;
use crate::extension::writer::write_bigint;
use crate::extension::writer::write_varchar;
use crate::extension::ExpandParam;
use crate::extension::ExtensionError;
use crate::extension::FilesParam;
use crate::extension::LabelParameters;
use crate::extension::NamedParam;
use crate::extension::Param;
use crate::extension::RepeatColumnParam;
use crate::extension::WorksheetParam;
use crate::label::RenderedItem;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::collections::HashSet;
use std::error::Error;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Columns emitted before the item fields.
const LABEL_COLUMNS: [&str; 2] = ["label_index", "label_total"];

/// Rejects field names that clash with a label column or with each other, ignoring case.
fn check_column_names(fields: &[String]) -> Result<(), ExtensionError> {
    let mut seen = HashSet::new();
    for name in LABEL_COLUMNS.into_iter().chain(fields.iter().map(String::as_str)) {
        if !seen.insert(name.to_lowercase()) {
            return Err(ExtensionError::DuplicateColumn(name.to_owned()));
        }
    }
    Ok(())
}

#[repr(C)]
/// Labels computed once at bind time.
pub(crate) struct ReadLabelsBindData {
    /// Item field names, one VARCHAR column each
    fields: Vec<String>,
    /// Expanded and numbered labels
    labels: Vec<RenderedItem>,
}

#[repr(C)]
/// Iteration state for the execution phase.
pub(crate) struct ReadLabelsInitData {
    /// Atomic counter tracking the next chunk to emit
    index: AtomicUsize,
    /// Column indices that should be projected (output)
    projections: Vec<usize>,
}

/// `read_labels(files, ...)`: one row per printed label with its fields.
pub(crate) struct ReadLabelsTableFunction;

impl VTab for ReadLabelsTableFunction {
    type InitData = ReadLabelsInitData;
    type BindData = ReadLabelsBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = LabelParameters::try_from(bind)?;
        let (fields, labels) = parameters.load_labels()?;
        check_column_names(&fields)?;
        for name in LABEL_COLUMNS {
            bind.add_result_column(name, LogicalTypeHandle::from(LogicalTypeId::Bigint));
        }
        for field in &fields {
            bind.add_result_column(field.as_str(), LogicalTypeHandle::from(LogicalTypeId::Varchar));
        }
        Ok(ReadLabelsBindData { fields, labels })
    }

    fn init(init: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        let projections = init.get_column_indices()
            .into_iter()
            .map(|index| index as usize)
            .collect::<Vec<_>>();
        Ok(ReadLabelsInitData {
            index: AtomicUsize::new(0),
            projections,
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let bind = func.get_bind_data();
        let init = func.get_init_data();
        let index = init.index.fetch_add(1, Ordering::Relaxed);
        let total = bind.labels.len();
        if let Some(range) = chunk_range(total, index) {
            let mut vectors: Vec<_> = (0..init.projections.len()).map(|index| output.flat_vector(index)).collect();
            let labels = &bind.labels[range];
            output.set_len(labels.len());
            for (row, label) in labels.iter().enumerate() {
                for (index, col) in init.projections.iter().enumerate() {
                    let vector = &mut vectors[index];
                    match *col {
                        0 => write_bigint(vector, row, label.index),
                        1 => write_bigint(vector, row, total),
                        col => {
                            let field = &bind.fields[col - LABEL_COLUMNS.len()];
                            write_varchar(vector, row, label.item.get(field));
                        }
                    }
                }
            }
        } else {
            // No more labels to emit
            output.set_len(0);
        }
        Ok(())
    }

    fn supports_pushdown() -> bool {
        true
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            FilesParam::kind(),
        ])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![
            WorksheetParam::definition(),
            RepeatColumnParam::definition(),
            ExpandParam::definition(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::load_items;
    use crate::summary::Workbook;
    use glob::Pattern;

    fn fields(json: &str, worksheet: &str) -> Vec<String> {
        let workbook = Workbook::from_json("labels.json", json).unwrap();
        let pattern = Pattern::new(worksheet).unwrap();
        load_items(&[workbook], Some(&pattern)).unwrap().0
    }

    #[test]
    fn distinct_fields_are_accepted() {
        let fields = fields(
            r#"{"worksheets": [{"name": "Course", "columns": [{"fieldName": "ref"}, {"fieldName": "nb_colis_bp"}], "data": []}]}"#,
            "*",
        );
        assert!(check_column_names(&fields).is_ok());
    }

    #[test]
    fn field_named_like_label_column_is_rejected() {
        let fields = fields(
            r#"{"worksheets": [{"name": "Course", "columns": [{"fieldName": "ref"}, {"fieldName": "Label_Index"}], "data": []}]}"#,
            "*",
        );
        let error = check_column_names(&fields).unwrap_err();
        assert!(matches!(&error, ExtensionError::DuplicateColumn(name) if name == "Label_Index"));
    }

    #[test]
    fn fields_differing_by_case_across_worksheets_are_rejected() {
        let fields = fields(
            r#"{"worksheets": [
                {"name": "Course", "columns": [{"fieldName": "Ref"}], "data": [["A1"]]},
                {"name": "Manuel", "columns": [{"fieldName": "ref"}], "data": [["M1"]]}
            ]}"#,
            "*",
        );
        assert_eq!(fields, vec!["Ref", "ref"]);
        let error = check_column_names(&fields).unwrap_err();
        assert!(error.to_string().starts_with("Duplicate column name 'ref'"));
    }
}
