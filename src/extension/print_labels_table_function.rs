use crate::extension::writer::write_varchar;
use crate::extension::ExpandParam;
use crate::extension::FilesParam;
use crate::extension::LabelParameters;
use crate::extension::ModelColumnParam;
use crate::extension::NamedParam;
use crate::extension::Param;
use crate::extension::RepeatColumnParam;
use crate::extension::TemplatesParam;
use crate::extension::WorksheetParam;
use crate::label::document::render_document;
use chrono::Local;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::error::Error;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tracing::debug;

#[repr(C)]
/// The printable document, assembled at bind time.
pub(crate) struct PrintLabelsBindData {
    document: String,
}

#[repr(C)]
pub(crate) struct PrintLabelsInitData {
    /// Set once the single row has been emitted
    done: AtomicBool,
}

/// `print_labels(files, ...)`: a single row holding the whole printable page.
pub(crate) struct PrintLabelsTableFunction;

impl VTab for PrintLabelsTableFunction {
    type InitData = PrintLabelsInitData;
    type BindData = PrintLabelsBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = LabelParameters::try_from(bind)?;
        let registry = parameters.registry()?;
        let (_, labels) = parameters.load_labels()?;
        let fragments = registry.render_all(&labels, parameters.model_column());
        debug!(labels = fragments.len(), "assembling printable document");
        let document = render_document(&fragments, Local::now().naive_local());
        bind.add_result_column("document", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        Ok(PrintLabelsBindData { document })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(PrintLabelsInitData {
            done: AtomicBool::new(false),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let bind = func.get_bind_data();
        let init = func.get_init_data();
        if init.done.swap(true, Ordering::Relaxed) {
            output.set_len(0);
        } else {
            let mut vector = output.flat_vector(0);
            write_varchar(&mut vector, 0, Some(bind.document.as_str()));
            output.set_len(1);
        }
        Ok(())
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
            ModelColumnParam::definition(),
            TemplatesParam::definition(),
        ])
    }
}
