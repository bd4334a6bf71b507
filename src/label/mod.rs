//! # Label Module
//!
//! Turns summary items into the ordered sequence of printable labels:
//! expansion by repeat count, display numbering, derived display records,
//! template selection and the final printable document.
use crate::helpers::number::parse_leading_integer;
use crate::summary::Item;
use tracing::debug;
use tracing::warn;

pub(crate) mod builtin;
pub(crate) mod display;
pub(crate) mod document;
pub(crate) mod template;

/// Field holding the package count of a label row unless configured otherwise.
pub(crate) const DEFAULT_REPEAT_COLUMN: &str = "nb_colis_or_man";

/// Upper bound on the copies of a single item.
pub(crate) const MAX_REPEAT_COUNT: usize = 10_000;

/// Field naming the label layout unless configured otherwise.
pub(crate) const DEFAULT_MODEL_COLUMN: &str = "model_or_man";

/// How summary items become labels.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LabelOptions {
    /// Field read as the number of copies of each item
    pub(crate) repeat_column: String,
    /// Whether items are duplicated by their repeat count (default: true)
    pub(crate) expand: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        LabelOptions {
            repeat_column: DEFAULT_REPEAT_COLUMN.to_owned(),
            expand: true,
        }
    }
}

/// An item with its zero-based position in the final label sequence.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RenderedItem {
    pub(crate) index: usize,
    pub(crate) item: Item,
}

/// Number of copies printed for an item: the leading integer of its repeat field,
/// at least one and at most [`MAX_REPEAT_COUNT`].
pub(crate) fn repeat_count(item: &Item, repeat_field: &str) -> usize {
    let count = item
        .get(repeat_field)
        .and_then(parse_leading_integer)
        .filter(|count| *count > 0)
        .map(|count| usize::try_from(count).unwrap_or(usize::MAX))
        .unwrap_or(1);
    if count > MAX_REPEAT_COUNT {
        warn!(count, max = MAX_REPEAT_COUNT, repeat_field, "repeat count capped");
        MAX_REPEAT_COUNT
    } else {
        count
    }
}

/// Replaces every item with as many contiguous copies as its repeat count.
///
/// Returns the items untouched when `should_expand` is false. Expanding an
/// already expanded sequence multiplies again, so run it once per refresh.
pub(crate) fn expand_by_repeat_count(items: Vec<Item>, repeat_field: &str, should_expand: bool) -> Vec<Item> {
    if !should_expand {
        return items;
    }
    let mut expanded = Vec::with_capacity(items.len());
    for item in items {
        let count = repeat_count(&item, repeat_field);
        expanded.extend(std::iter::repeat(item).take(count));
    }
    expanded
}

/// Numbers the final sequence `0..len` in order.
pub(crate) fn assign_display_index(items: Vec<Item>) -> Vec<RenderedItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| RenderedItem { index, item })
        .collect()
}

/// Runs expansion and numbering with the given options.
pub(crate) fn prepare_labels(items: Vec<Item>, options: &LabelOptions) -> Vec<RenderedItem> {
    let rows = items.len();
    let labels = assign_display_index(expand_by_repeat_count(items, &options.repeat_column, options.expand));
    debug!(rows, labels = labels.len(), expand = options.expand, repeat_column = %options.repeat_column, "prepared labels");
    labels
}
