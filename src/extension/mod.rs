//! # Extension Core Module
//!
//! Parameter handling shared by the label table functions, and the bind-time
//! pipeline that loads summary files and turns them into labels.
use crate::bridge::ValueBridge;
use crate::error::RustyLabelError;
use crate::label::template::PlaceholderTemplate;
use crate::label::template::TemplateRegistry;
use crate::label::prepare_labels;
use crate::label::LabelOptions;
use crate::label::RenderedItem;
use crate::label::DEFAULT_MODEL_COLUMN;
use crate::summary::load_items;
use crate::summary::open_workbooks;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use duckdb::vtab::Value;
use glob::Pattern;
use thiserror::Error;

pub(crate) mod print_labels_table_function;
pub(crate) mod read_labels_table_function;
pub(crate) mod render_labels_table_function;
mod writer;

/// Rows emitted per output chunk (DuckDB's standard vector size).
pub(crate) const CHUNK_SIZE: usize = 2048;

/// CSS class of templates supplied through the `templates` parameter.
pub(crate) const CUSTOM_TEMPLATE_CLASS: &str = "custom";

/// Custom error types for the extension operations.
#[derive(Error, Debug)]
pub(crate) enum ExtensionError {
    /// Invalid parameter provided to a table function
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Output column name used twice, compared case-insensitively
    #[error("Duplicate column name '{0}': field names must differ from each other and from label_index/label_total, ignoring case")]
    DuplicateColumn(String),
}

fn invalid(name: &str, message: String) -> RustyLabelError {
    ExtensionError::InvalidParameter {
        name: name.to_owned(),
        message,
    }
    .into()
}

/// Positional parameter of a table function.
pub(crate) trait Param<T> {
    /// Returns the DuckDB logical type for this parameter
    fn kind() -> LogicalTypeHandle;

    /// Extracts the parameter value at `index` from bind information
    fn read(bind: &BindInfo, index: u64) -> Result<T, RustyLabelError>;
}

/// Trait for handling named parameters in DuckDB table functions.
pub(crate) trait NamedParam<T> {
    /// Returns the parameter name as used in SQL
    fn name() -> &'static str;

    /// Returns the DuckDB logical type for this parameter
    fn kind() -> LogicalTypeHandle;

    /// Returns the complete parameter definition (name and type)
    fn definition() -> (String, LogicalTypeHandle) {
        (Self::name().to_string(), Self::kind())
    }

    /// Extracts the parameter value, None when the parameter is absent or NULL
    fn read(bind: &BindInfo) -> Result<Option<T>, RustyLabelError>;

    /// Returns the parameter value unless it is absent or NULL
    fn value(bind: &BindInfo) -> Option<Value> {
        bind.get_named_parameter(Self::name()).filter(|value| !value.is_null())
    }
}

/// Summary file path or glob pattern
pub(crate) struct FilesParam;

/// Worksheet name pattern
pub(crate) struct WorksheetParam;

/// Field holding the number of copies of each row
pub(crate) struct RepeatColumnParam;

/// Whether rows are duplicated by their repeat count
pub(crate) struct ExpandParam;

/// Field naming the label template
pub(crate) struct ModelColumnParam;

/// Extra templates keyed by model name
pub(crate) struct TemplatesParam;

impl Param<String> for FilesParam {
    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo, index: u64) -> Result<String, RustyLabelError> {
        let files = bind.get_parameter(index).to_varchar();
        if files.trim().is_empty() {
            return Err(invalid("files", "file pattern must not be empty".to_owned()));
        }
        Ok(files)
    }
}

impl NamedParam<Pattern> for WorksheetParam {
    fn name() -> &'static str {
        "worksheet"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<Pattern>, RustyLabelError> {
        Self::value(bind)
            .map(|value| {
                let pattern = value.to_varchar();
                Pattern::new(&pattern).map_err(|error| invalid(Self::name(), format!("'{pattern}' {error}")))
            })
            .transpose()
    }
}

/// Reads a VARCHAR parameter holding a field name.
fn read_field_name(name: &str, value: Option<Value>) -> Result<Option<String>, RustyLabelError> {
    value
        .map(|value| {
            let field = value.to_varchar();
            if field.trim().is_empty() {
                Err(invalid(name, "field name must not be empty".to_owned()))
            } else {
                Ok(field)
            }
        })
        .transpose()
}

impl NamedParam<String> for RepeatColumnParam {
    fn name() -> &'static str {
        "repeat_column"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<String>, RustyLabelError> {
        read_field_name(Self::name(), Self::value(bind))
    }
}

impl NamedParam<bool> for ExpandParam {
    fn name() -> &'static str {
        "expand"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Boolean)
    }

    fn read(bind: &BindInfo) -> Result<Option<bool>, RustyLabelError> {
        Ok(Self::value(bind).map(|value| value.to_bool()))
    }
}

impl NamedParam<String> for ModelColumnParam {
    fn name() -> &'static str {
        "model_column"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<String>, RustyLabelError> {
        read_field_name(Self::name(), Self::value(bind))
    }
}

impl NamedParam<Vec<(String, String)>> for TemplatesParam {
    fn name() -> &'static str {
        "templates"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::map(
            &LogicalTypeHandle::from(LogicalTypeId::Varchar),
            &LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )
    }

    fn read(bind: &BindInfo) -> Result<Option<Vec<(String, String)>>, RustyLabelError> {
        Ok(Self::value(bind).map(|value| {
            value
                .to_map_entries()
                .iter()
                .map(|(model, markup)| (model.to_varchar(), markup.to_varchar()))
                .collect()
        }))
    }
}

/// Parameters shared by the label table functions.
pub(crate) struct LabelParameters {
    /// Summary file path or glob pattern
    pub(crate) files: String,
    /// Worksheet name pattern (default: first worksheet of each file)
    pub(crate) worksheet: Option<Pattern>,
    /// Repeat count field (default: nb_colis_or_man)
    pub(crate) repeat_column: Option<String>,
    /// Duplicate rows by repeat count (default: true)
    pub(crate) expand: Option<bool>,
    /// Template model field (default: model_or_man)
    pub(crate) model_column: Option<String>,
    /// Placeholder templates added to the built-in ones
    pub(crate) templates: Option<Vec<(String, String)>>,
}

impl TryFrom<&BindInfo> for LabelParameters {
    type Error = RustyLabelError;

    /// Reads every known parameter; parameters a function does not declare read as None.
    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(LabelParameters {
            files: FilesParam::read(bind, 0)?,
            worksheet: WorksheetParam::read(bind)?,
            repeat_column: RepeatColumnParam::read(bind)?,
            expand: ExpandParam::read(bind)?,
            model_column: ModelColumnParam::read(bind)?,
            templates: TemplatesParam::read(bind)?,
        })
    }
}

impl LabelParameters {
    /// Expansion settings with defaults applied.
    pub(crate) fn options(&self) -> LabelOptions {
        let defaults = LabelOptions::default();
        LabelOptions {
            repeat_column: self.repeat_column.to_owned().unwrap_or(defaults.repeat_column),
            expand: self.expand.unwrap_or(defaults.expand),
        }
    }

    pub(crate) fn model_column(&self) -> &str {
        self.model_column.as_deref().unwrap_or(DEFAULT_MODEL_COLUMN)
    }

    /// Built-in templates plus the ones given as parameter.
    pub(crate) fn registry(&self) -> Result<TemplateRegistry, RustyLabelError> {
        let mut registry = TemplateRegistry::builtin();
        for (model, markup) in self.templates.iter().flatten() {
            registry.register(model, Box::new(PlaceholderTemplate::new(CUSTOM_TEMPLATE_CLASS, markup)?));
        }
        Ok(registry)
    }

    /// Loads the summary files and returns the field names with the numbered labels.
    pub(crate) fn load_labels(&self) -> Result<(Vec<String>, Vec<RenderedItem>), RustyLabelError> {
        let workbooks = open_workbooks(&self.files)?;
        let (fields, items) = load_items(&workbooks, self.worksheet.as_ref())?;
        Ok((fields, prepare_labels(items, &self.options())))
    }
}

/// Row range of chunk `index`, None past the last chunk.
pub(crate) fn chunk_range(rows: usize, index: usize) -> Option<std::ops::Range<usize>> {
    let start = index.checked_mul(CHUNK_SIZE)?;
    if start >= rows {
        None
    } else {
        Some(start..rows.min(start + CHUNK_SIZE))
    }
}
