//! Pass 1: single-line markers.
//!
//! A marker line makes the line after it server-only. That line is replaced
//! by a one-line registration, so the line count never changes.

use crate::ident::line_identifier;
use crate::manifest::{Registration, RegistrationKind};
use crate::markers::{Marker, Markers};
use crate::snippet::line_registration;

/// Result of the single-line pass.
pub struct NextLinePass {
    pub lines: Vec<String>,
    pub markers: Vec<Marker>,
    pub registrations: Vec<Registration>,
}

impl NextLinePass {
    pub fn changed(&self) -> bool {
        !self.markers.is_empty()
    }
}

/// Rewrite the targets of every single-line marker in `lines`.
///
/// Matches are collected against the original lines before anything is
/// replaced, so a rewritten line is never read as another marker's target.
pub fn rewrite_next_lines(
    lines: &[&str],
    resource_path: &str,
    markers: &Markers,
    registry: &str,
) -> NextLinePass {
    let hits: Vec<usize> = lines
        .iter()
        .enumerate()
        .take(lines.len().saturating_sub(1))
        .filter(|(_, line)| markers.is_next_line(line))
        .map(|(i, _)| i)
        .collect();

    let mut out: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
    let mut found = Vec::with_capacity(hits.len());
    let mut registrations = Vec::with_capacity(hits.len());

    for i in hits {
        let target = lines[i + 1];
        let original = target.trim();
        let indent = &target[..target.len() - target.trim_start().len()];
        let eol = if target.ends_with('\r') { "\r" } else { "" };
        let identifier = line_identifier(resource_path, i);

        out[i + 1] = format!(
            "{indent}{}{eol}",
            line_registration(registry, &identifier, original)
        );
        found.push(Marker::SingleLine { at_line: i });
        registrations.push(Registration {
            identifier,
            kind: RegistrationKind::Line,
            resource_path: resource_path.to_string(),
            line: i,
            source: original.to_string(),
        });
    }

    NextLinePass {
        lines: out,
        markers: found,
        registrations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REG: &str = "__REG__";

    fn run(source: &str) -> NextLinePass {
        let lines: Vec<&str> = source.split('\n').collect();
        rewrite_next_lines(&lines, "src/foo.js", &Markers::default(), REG)
    }

    #[test]
    fn replaces_target_line() {
        let pass = run("// @eserver-register-next-line\nconsole.log('secret')");
        assert!(pass.changed());
        assert_eq!(pass.lines.len(), 2);
        assert_eq!(pass.lines[0], "// @eserver-register-next-line");
        assert!(pass.lines[1].starts_with("if (typeof window"), "Got: {}", pass.lines[1]);
        assert!(pass.lines[1].contains(r#"["src_foo_js_0"]"#), "Got: {}", pass.lines[1]);
        assert!(pass.lines[1].contains(r#""console.log('secret')""#));
        assert_eq!(pass.markers, vec![Marker::SingleLine { at_line: 0 }]);
        assert_eq!(pass.registrations[0].source, "console.log('secret')");
        assert_eq!(pass.registrations[0].kind, RegistrationKind::Line);
    }

    #[test]
    fn marker_on_last_line_is_ignored() {
        let pass = run("a()\n// @eserver-register-next-line");
        assert!(!pass.changed());
        assert_eq!(pass.lines, vec!["a()", "// @eserver-register-next-line"]);
    }

    #[test]
    fn keeps_indentation_and_trims_value() {
        let pass = run("  // @eserver-register-next-line\n    db.connect();  ");
        assert!(pass.lines[1].starts_with("    if (typeof window"), "Got: {}", pass.lines[1]);
        assert_eq!(pass.registrations[0].source, "db.connect();");
    }

    #[test]
    fn keeps_carriage_return() {
        let pass = run("// @eserver-register-next-line\r\nsecret();\r");
        assert!(pass.lines[1].ends_with("// secret();\r"), "Got: {:?}", pass.lines[1]);
        assert_eq!(pass.registrations[0].source, "secret();");
    }

    #[test]
    fn consecutive_markers_read_original_lines() {
        let pass = run(
            "// @eserver-register-next-line\n// @eserver-register-next-line\nsecret()",
        );
        assert_eq!(pass.registrations.len(), 2);
        // The second marker line is itself a target, registered verbatim.
        assert_eq!(pass.registrations[0].source, "// @eserver-register-next-line");
        assert_eq!(pass.registrations[1].source, "secret()");
        assert_eq!(pass.registrations[1].identifier, "src_foo_js_1");
        assert!(!pass.lines.iter().any(|l| l == "secret()"));
    }

    #[test]
    fn independent_markers() {
        let pass = run(
            "// @eserver-register-next-line\na()\nkeep()\n// @eserver-register-next-line\nb()",
        );
        assert_eq!(pass.lines.len(), 5);
        assert_eq!(pass.lines[2], "keep()");
        let ids: Vec<_> = pass.registrations.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["src_foo_js_0", "src_foo_js_3"]);
    }

    #[test]
    fn no_markers_no_change() {
        let pass = run("a()\nb()");
        assert!(!pass.changed());
        assert!(pass.registrations.is_empty());
    }
}
