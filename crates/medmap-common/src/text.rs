//! Text normalization helpers.

/// Title-cases a string word by word.
///
/// A word starts at every alphabetic character that follows a non-alphabetic
/// one; the first letter of a word is uppercased and the rest lowercased.
/// Digits and punctuation break words, so `"2nd"` becomes `"2Nd"` and
/// `"o'neil"` becomes `"O'Neil"`.
///
/// ```
/// use medmap_common::title_case;
///
/// assert_eq!(title_case("type 2 DIABETES [e11.9]"), "Type 2 Diabetes [E11.9]");
/// ```
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Normalizes a label for exact-map comparison: surrounding whitespace is
/// removed and the remainder title-cased.
pub fn normalize_label(value: &str) -> String {
    title_case(value.trim())
}

/// Collapses internal runs of whitespace to single spaces and trims the ends.
///
/// Used for column headers, which spreadsheet exports often pad or wrap.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
