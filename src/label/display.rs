use crate::helpers::html::escape;
use crate::helpers::number::normalize_weight;
use crate::helpers::number::parse_leading_integer;
use crate::helpers::number::parse_pcb;
use crate::helpers::number::Plurality;
use crate::label::RenderedItem;
use crate::summary::Item;

/// Read-only view of one label as the templates print it.
///
/// Normalized values live beside the item; the item itself keeps the host
/// formatting so the raw row stays available.
#[derive(Clone, Debug)]
pub(crate) struct DisplayLabel<'a> {
    /// Zero-based position in the label sequence
    pub(crate) index: usize,
    /// Number of labels in the sequence
    pub(crate) total: usize,
    pub(crate) item: &'a Item,
    /// Weight with a period separator and four fractional digits
    pub(crate) weight: Option<String>,
    /// Package count parsed as an integer
    pub(crate) pcb: Option<i64>,
    pub(crate) plurality: Plurality,
}

impl<'a> DisplayLabel<'a> {
    pub(crate) fn new(label: &'a RenderedItem, total: usize) -> Self {
        let pcb = label.item.get("pcb").and_then(parse_pcb);
        DisplayLabel {
            index: label.index,
            total,
            item: &label.item,
            weight: label.item.get("weight").and_then(normalize_weight),
            pcb,
            plurality: Plurality::of(pcb),
        }
    }

    /// One-based label number, as printed in "N of M".
    pub(crate) fn number(&self) -> usize {
        self.index + 1
    }

    /// Raw field value, empty when the field is absent.
    pub(crate) fn raw(&self, field: &str) -> &str {
        self.item.get(field).unwrap_or("")
    }

    /// Escaped field value, ready to interpolate into markup.
    pub(crate) fn text(&self, field: &str) -> String {
        escape(self.raw(field))
    }

    /// Escaped normalized weight, falling back to the raw value.
    pub(crate) fn weight_text(&self) -> String {
        match &self.weight {
            Some(weight) => weight.to_owned(),
            None => self.text("weight"),
        }
    }

    /// Escaped package count, falling back to the raw value.
    pub(crate) fn pcb_text(&self) -> String {
        match self.pcb {
            Some(pcb) => pcb.to_string(),
            None => self.text("pcb"),
        }
    }

    /// Leading integer of a count field, zero when absent.
    pub(crate) fn count(&self, field: &str) -> i64 {
        parse_leading_integer(self.raw(field)).unwrap_or(0)
    }

    /// Resolves a placeholder name: `@`-prefixed names are derived values, others are item fields.
    pub(crate) fn placeholder(&self, name: &str) -> String {
        match name {
            "@index" => self.index.to_string(),
            "@number" => self.number().to_string(),
            "@total" => self.total.to_string(),
            "@weight" => self.weight_text(),
            "@pcb" => self.pcb_text(),
            "@pcb_noun" => self.plurality.noun("pièce", "pièces").to_owned(),
            _ if name.starts_with('@') => String::new(),
            _ => self.text(name),
        }
    }
}
