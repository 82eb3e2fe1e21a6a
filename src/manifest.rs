//! Extracted registrations and their JSON manifest.
//!
//! The rewritten code still carries registry writes for runtime use, but
//! tooling that runs the server-only code should read the manifest instead
//! of scraping a global.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    /// Target of a single-line marker; `source` is the trimmed line.
    Line,
    /// A begin/end block; `source` is a self-invoking async expression.
    Block,
}

/// One entry written into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub identifier: String,
    pub kind: RegistrationKind,
    pub resource_path: String,
    /// Line of the marker (single-line) or begin marker (block), 0-based.
    pub line: usize,
    pub source: String,
}

/// All registrations of one run.
#[derive(Debug, Default, Serialize)]
pub struct Manifest {
    pub registrations: Vec<Registration>,
}

impl Manifest {
    pub fn extend<I: IntoIterator<Item = Registration>>(&mut self, regs: I) {
        self.registrations.extend(regs);
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).context("failed to serialize manifest")?;
        json.push('\n');
        Ok(json)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}
