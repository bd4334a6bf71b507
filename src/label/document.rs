use crate::helpers::html::escape;
use crate::label::template::LabelFragment;
use chrono::NaiveDateTime;

const STYLE: &str = r#".container { display: flex; flex-direction: column; }
.item { page-break-after: always; break-after: page; }
@media print { #print-button { display: none; } }"#;

/// Assembles rendered labels into one printable page with a print button.
pub(crate) fn render_document(fragments: &[LabelFragment], generated_at: NaiveDateTime) -> String {
    let mut items = String::new();
    for fragment in fragments {
        let class = if fragment.class.is_empty() {
            "item".to_owned()
        } else {
            format!("{} item", escape(&fragment.class))
        };
        items.push_str(&format!("<div class=\"{class}\">{}</div>\n", fragment.html));
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="generated" content="{generated}">
<title>Étiquettes</title>
<style>
{STYLE}
</style>
</head>
<body>
<div class="container">
{items}</div>
<button id="print-button" onclick="window.print()">Imprimer</button>
</body>
</html>
"#,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
