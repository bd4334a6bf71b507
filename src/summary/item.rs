use crate::summary::data::SummaryData;
use crate::summary::SummaryError;
use std::collections::HashMap;

/// Flattened field-name to formatted-value record built from one summary row.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Item {
    fields: HashMap<String, String>,
}

impl Item {
    /// Returns the formatted value of a field, None when the field is absent.
    pub(crate) fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Sets a field value, replacing any previous value of the same name.
    pub(crate) fn insert(&mut self, field: &str, value: String) {
        self.fields.insert(field.to_owned(), value);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Item {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Item {
            fields: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }
}

/// Zips the column descriptors with every row of the summary data.
///
/// Rows keep their input order. A row whose cell count differs from the column
/// count is rejected instead of misaligning the remaining fields.
pub(crate) fn map_rows_to_items(summary: &SummaryData) -> Result<Vec<Item>, SummaryError> {
    let expected = summary.columns.len();
    summary
        .data
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            if cells.len() != expected {
                return Err(SummaryError::ArityMismatch {
                    row,
                    expected,
                    actual: cells.len(),
                });
            }
            let mut item = Item::default();
            for (column, cell) in summary.columns.iter().zip(cells) {
                item.insert(&column.field_name, cell.formatted());
            }
            Ok(item)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_item_per_row_with_every_field() {
        let summary = SummaryData::from_rows(
            &["ref", "designation", "nb_colis_bp"],
            &[&["A1", "Widget", "2"], &["B2", "Gadget", "1"]],
        );
        let items = map_rows_to_items(&summary).unwrap();

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.len() == 3));
        assert_eq!(items[0].get("ref"), Some("A1"));
        assert_eq!(items[0].get("designation"), Some("Widget"));
        assert_eq!(items[1].get("ref"), Some("B2"));
        assert_eq!(items[1].get("nb_colis_bp"), Some("1"));
        assert_eq!(items[1].get("weight"), None);
    }

    #[test]
    fn empty_summary_yields_no_items() {
        let items = map_rows_to_items(&SummaryData::default()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn duplicate_column_names_keep_last_value() {
        let summary = SummaryData::from_rows(&["ref", "ref"], &[&["first", "second"]]);
        let items = map_rows_to_items(&summary).unwrap();
        assert_eq!(items[0].len(), 1);
        assert_eq!(items[0].get("ref"), Some("second"));
    }

    #[test]
    fn short_row_is_rejected() {
        let summary = SummaryData::from_rows(&["ref", "designation"], &[&["A1", "Widget"], &["B2"]]);
        let error = map_rows_to_items(&summary).unwrap_err();
        assert_eq!(error.to_string(), "Row 2 has 1 cells but 2 columns are declared");
    }

    #[test]
    fn long_row_is_rejected() {
        let summary = SummaryData::from_rows(&["ref"], &[&["A1"], &["B2", "Gadget", "3"]]);
        let error = map_rows_to_items(&summary).unwrap_err();
        assert!(matches!(error, SummaryError::ArityMismatch { row: 1, expected: 1, actual: 3 }));
        assert_eq!(error.to_string(), "Row 2 has 3 cells but 1 columns are declared");
    }
}
