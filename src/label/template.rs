use crate::error::RustyLabelError;
use crate::label::display::DisplayLabel;
use crate::label::RenderedItem;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// A printable layout for one label model.
pub(crate) trait LabelTemplate: Send + Sync {
    /// CSS class attached to the label container
    fn class(&self) -> &str;

    /// Markup of a single label
    fn render(&self, label: &DisplayLabel) -> String;
}

/// Template given as markup with `{{field}}` and `{{@derived}}` placeholders.
pub(crate) struct PlaceholderTemplate {
    class: String,
    markup: String,
    pattern: Regex,
}

impl PlaceholderTemplate {
    pub(crate) fn new(class: &str, markup: &str) -> Result<Self, RustyLabelError> {
        Ok(PlaceholderTemplate {
            class: class.to_owned(),
            markup: markup.to_owned(),
            pattern: Regex::new(r"\{\{\s*(@?[\w.\-]+)\s*\}\}")?,
        })
    }
}

impl LabelTemplate for PlaceholderTemplate {
    fn class(&self) -> &str {
        &self.class
    }

    fn render(&self, label: &DisplayLabel) -> String {
        self.pattern
            .replace_all(&self.markup, |captures: &regex::Captures| label.placeholder(&captures[1]))
            .into_owned()
    }
}

/// One rendered label, ready for the printable document.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LabelFragment {
    pub(crate) index: usize,
    pub(crate) total: usize,
    pub(crate) model: String,
    pub(crate) class: String,
    pub(crate) html: String,
}

/// Templates keyed by model name.
pub(crate) struct TemplateRegistry {
    templates: HashMap<String, Box<dyn LabelTemplate>>,
}

impl TemplateRegistry {
    pub(crate) fn empty() -> Self {
        TemplateRegistry {
            templates: HashMap::new(),
        }
    }

    /// Registers a template, replacing any template of the same model.
    pub(crate) fn register(&mut self, model: &str, template: Box<dyn LabelTemplate>) {
        self.templates.insert(model.to_owned(), template);
    }

    pub(crate) fn get(&self, model: &str) -> Option<&dyn LabelTemplate> {
        self.templates.get(model).map(|template| template.as_ref())
    }

    /// Renders every label with the template named by its model field.
    ///
    /// Labels of an unknown model keep their slot in the sequence with an empty
    /// class and no markup.
    pub(crate) fn render_all(&self, labels: &[RenderedItem], model_column: &str) -> Vec<LabelFragment> {
        let total = labels.len();
        labels
            .iter()
            .map(|label| {
                let display = DisplayLabel::new(label, total);
                let model = display.raw(model_column).to_owned();
                let (class, html) = match self.get(&model) {
                    Some(template) => (template.class().to_owned(), template.render(&display)),
                    None => {
                        warn!(index = label.index, model = %model, "no template for label model");
                        (String::new(), String::new())
                    }
                };
                LabelFragment {
                    index: label.index,
                    total,
                    model,
                    class,
                    html,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::assign_display_index;
    use crate::summary::Item;

    fn labels(rows: &[&[(&str, &str)]]) -> Vec<RenderedItem> {
        assign_display_index(
            rows.iter()
                .map(|fields| fields.iter().map(|(key, value)| (*key, *value)).collect::<Item>())
                .collect(),
        )
    }

    #[test]
    fn placeholder_interpolation() {
        let template = PlaceholderTemplate::new("custom", "<p>{{ref}} {{ @number }}/{{@total}} {{pcb}} {{@pcb_noun}}</p>").unwrap();
        let labels = labels(&[&[("ref", "A1"), ("pcb", "1")], &[("ref", "B<2>"), ("pcb", "3")]]);
        let first = DisplayLabel::new(&labels[0], 2);
        let second = DisplayLabel::new(&labels[1], 2);
        assert_eq!(template.render(&first), "<p>A1 1/2 1 pièce</p>");
        assert_eq!(template.render(&second), "<p>B&lt;2&gt; 2/2 3 pièces</p>");
    }

    #[test]
    fn unmatched_braces_are_kept() {
        let template = PlaceholderTemplate::new("custom", "{ref} {{ref").unwrap();
        let labels = labels(&[&[("ref", "A1")]]);
        assert_eq!(template.render(&DisplayLabel::new(&labels[0], 1)), "{ref} {{ref");
    }

    #[test]
    fn registered_template_replaces_previous() {
        let mut registry = TemplateRegistry::empty();
        registry.register("M", Box::new(PlaceholderTemplate::new("first", "1").unwrap()));
        registry.register("M", Box::new(PlaceholderTemplate::new("second", "2").unwrap()));
        assert_eq!(registry.get("M").map(|template| template.class()), Some("second"));
    }

    #[test]
    fn render_all_selects_by_model() {
        let mut registry = TemplateRegistry::empty();
        registry.register("Small", Box::new(PlaceholderTemplate::new("small", "<b>{{ref}}</b>").unwrap()));
        let labels = labels(&[
            &[("ref", "A1"), ("model_or_man", "Small")],
            &[("ref", "B2"), ("model_or_man", "Unknown")],
            &[("ref", "C3")],
        ]);
        let fragments = registry.render_all(&labels, "model_or_man");

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].class, "small");
        assert_eq!(fragments[0].html, "<b>A1</b>");
        assert_eq!(fragments[1].model, "Unknown");
        assert_eq!(fragments[1].class, "");
        assert_eq!(fragments[1].html, "");
        assert_eq!(fragments[2].model, "");
        assert!(fragments.iter().all(|fragment| fragment.total == 3));
        assert_eq!(fragments[2].index, 2);
    }
}
