//! Marker tokens and the marker data model.
//!
//! Markers are plain substrings matched anywhere in a line (case-sensitive),
//! so they work inside `//` comments, `/* */` comments and JSX comments alike.

/// Default token for "the next line is server-only".
pub const NEXT_LINE_MARKER: &str = "@eserver-register-next-line";
/// Default token opening a server-only block.
pub const BEGIN_MARKER: &str = "@eserver-begin";
/// Default token closing a server-only block.
pub const END_MARKER: &str = "@eserver-end";

/// The three tokens a scan looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers<'a> {
    pub next_line: &'a str,
    pub begin: &'a str,
    pub end: &'a str,
}

impl Default for Markers<'static> {
    fn default() -> Self {
        Markers {
            next_line: NEXT_LINE_MARKER,
            begin: BEGIN_MARKER,
            end: END_MARKER,
        }
    }
}

impl Markers<'_> {
    pub fn is_next_line(&self, line: &str) -> bool {
        line.contains(self.next_line)
    }

    pub fn is_begin(&self, line: &str) -> bool {
        line.contains(self.begin)
    }

    pub fn is_end(&self, line: &str) -> bool {
        line.contains(self.end)
    }

    /// True if any of the three tokens occurs anywhere in `source`.
    pub fn any_in(&self, source: &str) -> bool {
        self.is_begin(source) || self.is_end(source) || self.is_next_line(source)
    }
}

/// A marker occurrence found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Marker on `at_line`; its target is `at_line + 1`.
    SingleLine { at_line: usize },
    /// Begin marker on `start_line`, end marker on `end_line`; `body` holds
    /// every line strictly between them.
    Block {
        start_line: usize,
        end_line: usize,
        body: Vec<String>,
    },
}
