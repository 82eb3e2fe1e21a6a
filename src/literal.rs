//! String-literal encoding for generated JavaScript.
//!
//! JSON string syntax is a subset of JavaScript string syntax, so
//! `serde_json` does the heavy lifting. The two line separators U+2028 and
//! U+2029 are legal in JSON strings but not in pre-ES2019 string literals,
//! so they are escaped on top.

/// Encode `s` as a double-quoted JavaScript string literal.
pub fn js_string_literal(s: &str) -> String {
    // Serializing a &str cannot fail.
    let json = serde_json::Value::String(s.to_owned()).to_string();
    if json.contains(['\u{2028}', '\u{2029}']) {
        json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029")
    } else {
        json
    }
}
