//! Loader configuration.
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! extensions = ["js", "jsx", "ts", "tsx"]
//! next_line_marker = "@eserver-register-next-line"
//! begin_marker = "@eserver-begin"
//! end_marker = "@eserver-end"
//! registry = "__ESERVER_REGISTRY__"
//! ```

use crate::gate::DEFAULT_EXTENSIONS;
use crate::markers::{Markers, BEGIN_MARKER, END_MARKER, NEXT_LINE_MARKER};
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Default name of the global registry object.
pub const DEFAULT_REGISTRY: &str = "__ESERVER_REGISTRY__";

static RE_JS_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Extensions (without a dot) of files that get scanned.
    pub extensions: Vec<String>,
    pub next_line_marker: String,
    pub begin_marker: String,
    pub end_marker: String,
    /// Property of `window` the generated code registers into.
    pub registry: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            next_line_marker: NEXT_LINE_MARKER.to_string(),
            begin_marker: BEGIN_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
            registry: DEFAULT_REGISTRY.to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn markers(&self) -> Markers<'_> {
        Markers {
            next_line: &self.next_line_marker,
            begin: &self.begin_marker,
            end: &self.end_marker,
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut config: LoaderConfig = toml::from_str(input).context("invalid loader config")?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Strip a leading dot so `".ts"` and `"ts"` mean the same.
    fn normalize(&mut self) {
        for ext in &mut self.extensions {
            if let Some(stripped) = ext.strip_prefix('.') {
                *ext = stripped.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() || self.extensions.iter().any(|e| e.is_empty()) {
            bail!("extensions must be a non-empty list of non-empty names");
        }
        let tokens = [
            ("next_line_marker", &self.next_line_marker),
            ("begin_marker", &self.begin_marker),
            ("end_marker", &self.end_marker),
        ];
        for (name, token) in &tokens {
            if token.trim().is_empty() {
                bail!("{name} must not be empty");
            }
        }
        for (i, (a_name, a)) in tokens.iter().enumerate() {
            for (b_name, b) in &tokens[i + 1..] {
                if a.contains(b.as_str()) || b.contains(a.as_str()) {
                    bail!("{a_name} and {b_name} overlap: {a:?} / {b:?}");
                }
            }
        }
        if !RE_JS_IDENT.is_match(&self.registry) {
            bail!("registry {:?} is not a valid JavaScript identifier", self.registry);
        }
        Ok(())
    }
}
