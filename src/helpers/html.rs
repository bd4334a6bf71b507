//! Markup helpers shared by the label templates.

use url::Url;

/// Barcode image service used by the label layouts.
const BARCODE_SERVICE: &str = "https://barcode.tec-it.com/barcode.ashx";

/// Escapes text for use inside HTML element content and quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(char),
        }
    }
    escaped
}

/// Builds the barcode image address for `data` encoded as `code`, with extra rendering options.
/// The result is already escaped for an HTML attribute.
pub(crate) fn barcode_src(data: &str, code: &str, options: &[(&str, &str)]) -> String {
    let mut url = Url::parse(BARCODE_SERVICE).expect("Hardcode barcode url");
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("data", data);
        query.append_pair("code", code);
        for (key, value) in options {
            query.append_pair(key, value);
        }
    }
    escape(url.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_markup() {
        assert_eq!(escape("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
        assert_eq!(escape(r#"say "hi" it's"#), "say &quot;hi&quot; it&#39;s");
        assert_eq!(escape("Peluche éveil"), "Peluche éveil");
    }

    #[test]
    fn barcode_parameters_are_encoded() {
        let src = barcode_src("3 760&1", "EAN13", &[("multiplebarcodes", "true")]);
        assert_eq!(
            src,
            "https://barcode.tec-it.com/barcode.ashx?data=3+760%261&amp;code=EAN13&amp;multiplebarcodes=true"
        );
    }
}
