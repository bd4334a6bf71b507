use crate::extension::chunk_range;
use crate::extension::writer::write_bigint;
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
use crate::label::template::LabelFragment;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::error::Error;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Output columns and their types.
const COLUMNS: [(&str, LogicalTypeId); 5] = [
    ("label_index", LogicalTypeId::Bigint),
    ("label_total", LogicalTypeId::Bigint),
    ("model", LogicalTypeId::Varchar),
    ("class", LogicalTypeId::Varchar),
    ("html", LogicalTypeId::Varchar),
];

#[repr(C)]
/// Rendered fragments computed once at bind time.
pub(crate) struct RenderLabelsBindData {
    fragments: Vec<LabelFragment>,
}

#[repr(C)]
/// Iteration state for the execution phase.
pub(crate) struct RenderLabelsInitData {
    /// Atomic counter tracking the next chunk to emit
    index: AtomicUsize,
    /// Column indices that should be projected (output)
    projections: Vec<usize>,
}

/// `render_labels(files, ...)`: one rendered markup fragment per printed label.
pub(crate) struct RenderLabelsTableFunction;

impl VTab for RenderLabelsTableFunction {
    type InitData = RenderLabelsInitData;
    type BindData = RenderLabelsBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = LabelParameters::try_from(bind)?;
        let registry = parameters.registry()?;
        let (_, labels) = parameters.load_labels()?;
        let fragments = registry.render_all(&labels, parameters.model_column());
        for (name, kind) in COLUMNS {
            bind.add_result_column(name, LogicalTypeHandle::from(kind));
        }
        Ok(RenderLabelsBindData { fragments })
    }

    fn init(init: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        let projections = init.get_column_indices()
            .into_iter()
            .map(|index| index as usize)
            .collect::<Vec<_>>();
        Ok(RenderLabelsInitData {
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
        if let Some(range) = chunk_range(bind.fragments.len(), index) {
            let mut vectors: Vec<_> = (0..init.projections.len()).map(|index| output.flat_vector(index)).collect();
            let fragments = &bind.fragments[range];
            output.set_len(fragments.len());
            for (row, fragment) in fragments.iter().enumerate() {
                for (index, col) in init.projections.iter().enumerate() {
                    let vector = &mut vectors[index];
                    match *col {
                        0 => write_bigint(vector, row, fragment.index),
                        1 => write_bigint(vector, row, fragment.total),
                        2 => write_varchar(vector, row, Some(fragment.model.as_str())),
                        3 => write_varchar(vector, row, Some(fragment.class.as_str())),
                        _ => write_varchar(vector, row, Some(fragment.html.as_str())),
                    }
                }
            }
        } else {
            // No more fragments to emit
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
            ModelColumnParam::definition(),
            TemplatesParam::definition(),
        ])
    }
}
