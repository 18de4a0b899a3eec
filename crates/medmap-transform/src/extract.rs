//! Bracketed code extraction.

use std::sync::LazyLock;

use regex::Regex;

use medmap_model::ExtractedCode;

// First '[' up to the next ']'; anything in between is a legal code.
static BRACKETED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("bracketed code pattern is valid"));

/// Return the text between the first `[` and the next `]`.
///
/// Returns `None` when the text has no closed bracket pair. The code itself is
/// not validated; empty brackets yield an empty code.
///
/// ```
/// use medmap_transform::extract_code;
///
/// assert_eq!(extract_code("Diagnosis text [A123]").as_deref(), Some("A123"));
/// assert_eq!(extract_code("no brackets here"), None);
/// ```
pub fn extract_code(text: &str) -> Option<String> {
    BRACKETED_CODE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().to_string())
}

/// Run [`extract_code`] over many values, keeping the source text.
pub fn extract_codes<I, S>(values: I) -> Vec<ExtractedCode>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(|value| {
            let raw_text = value.into();
            let code = extract_code(&raw_text);
            ExtractedCode { raw_text, code }
        })
        .collect()
}
