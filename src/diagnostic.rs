//! Out-of-band warnings.
//!
//! The transform never fails: anomalies are collected as [`Diagnostic`]s
//! and reported through `tracing` so that a build keeps going.

use std::fmt;

/// Tag prefixed to every warning.
pub const TAG: &str = "[eserver-loader]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A begin marker with no end marker before end of file. The block's
    /// body was dropped from the output.
    UnterminatedBlock { resource_path: String, line: usize },
}

impl Diagnostic {
    pub fn resource_path(&self) -> &str {
        match self {
            Diagnostic::UnterminatedBlock { resource_path, .. } => resource_path,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Diagnostic::UnterminatedBlock { line, .. } => *line,
        }
    }

    /// Report through the logging stack at warn level.
    pub fn emit(&self) {
        tracing::warn!(
            target: "eserver_loader",
            resource_path = self.resource_path(),
            line = self.line(),
            "{self}"
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnterminatedBlock {
                resource_path,
                line,
            } => write!(
                f,
                "{TAG} unterminated block in {resource_path}: begin marker at line {line} \
                 has no matching end marker; block body dropped"
            ),
        }
    }
}
