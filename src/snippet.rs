//! Generated registration code.
//!
//! Every snippet writes into one lazily created global object and only runs
//! where a `window` global exists, so the extracted code stays inert on the
//! client while its text remains addressable by key.

use crate::literal::js_string_literal;

/// Number of lines produced by [`block_registration`].
pub const BLOCK_SNIPPET_LINES: usize = 3;

/// `(window.REG = window.REG || {})["key"] = value`
fn registry_write(registry: &str, identifier: &str, value_literal: &str) -> String {
    format!(
        "(window.{registry} = window.{registry} || {{}})[{}] = {value_literal};",
        js_string_literal(identifier)
    )
}

/// One-line replacement for the target of a single-line marker.
///
/// `original` is the trimmed text of the replaced line; it is both the
/// registered value and echoed in a trailing comment.
pub fn line_registration(registry: &str, identifier: &str, original: &str) -> String {
    format!(
        "if (typeof window !== \"undefined\") {{ {} }} // {}",
        registry_write(registry, identifier, &js_string_literal(original)),
        original.replace(['\u{2028}', '\u{2029}'], " ")
    )
}

/// Body of the async function a block is wrapped in: the function
/// definition followed by a statement returning its invocation.
pub fn wrapper_body(name: &str, body: &[String]) -> String {
    let mut out = format!("async function {name}() {{\n");
    for line in body {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out.push_str(&format!("return {name}();"));
    out
}

/// Self-invoking async expression registered for a block.
pub fn block_expression(wrapper_body: &str) -> String {
    format!("(async () => {{\n{wrapper_body}\n}})()")
}

/// Registration lines emitted in place of a block body.
pub fn block_registration(registry: &str, identifier: &str, expression: &str) -> Vec<String> {
    vec![
        "if (typeof window !== \"undefined\") {".to_string(),
        format!(
            "  {}",
            registry_write(registry, identifier, &js_string_literal(expression))
        ),
        "}".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_snippet_shape() {
        let s = line_registration("__REG__", "src_foo_js_0", "console.log('secret')");
        assert_eq!(
            s,
            r#"if (typeof window !== "undefined") { (window.__REG__ = window.__REG__ || {})["src_foo_js_0"] = "console.log('secret')"; } // console.log('secret')"#
        );
    }

    #[test]
    fn line_snippet_comment_stays_on_one_line() {
        let s = line_registration("__REG__", "k", "a()\u{2028}b()\u{2029}");
        assert_eq!(s.lines().count(), 1);
        assert!(!s.contains(['\u{2028}', '\u{2029}']), "Got: {s:?}");
        assert!(s.ends_with("// a() b() "), "Got: {s:?}");
        assert!(s.contains(r#"= "a()\u2028b()\u2029";"#), "Got: {s:?}");
    }

    #[test]
    fn wrapper_wraps_body() {
        let body = vec!["const a = 1;".to_string(), "  return a;".to_string()];
        assert_eq!(
            wrapper_body("f", &body),
            "async function f() {\nconst a = 1;\n  return a;\n}\nreturn f();"
        );
    }

    #[test]
    fn wrapper_with_empty_body() {
        assert_eq!(wrapper_body("f", &[]), "async function f() {\n}\nreturn f();");
    }

    #[test]
    fn block_expression_self_invokes() {
        let e = block_expression("return 1;");
        assert!(e.starts_with("(async () => {\n"));
        assert!(e.ends_with("\n})()"));
    }

    #[test]
    fn block_snippet_is_three_lines() {
        let lines = block_registration("__REG__", "a_ts_block_0", "(async () => {\nx\n})()");
        assert_eq!(lines.len(), BLOCK_SNIPPET_LINES);
        assert_eq!(
            lines[1],
            r#"  (window.__REG__ = window.__REG__ || {})["a_ts_block_0"] = "(async () => {\nx\n})()";"#
        );
    }
}
