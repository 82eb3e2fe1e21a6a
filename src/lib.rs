//! Build-time loader that moves server-only code out of client bundles.
//!
//! Scans JavaScript/TypeScript sources for marker comments and rewrites the
//! marked code into inert registrations, in two passes:
//!
//! 1. **Next line** — `// @eserver-register-next-line` replaces the following
//!    line with a one-line registration of its text
//! 2. **Block** — lines between `// @eserver-begin` and `// @eserver-end` are
//!    wrapped in an async function and registered as a self-invoking
//!    expression
//!
//! The rewritten code writes each snippet into a global registry when it runs
//! in a browser; the same entries are returned as [`Registration`]s so that
//! tooling does not need the global.

pub mod block;
pub mod config;
pub mod diagnostic;
pub mod gate;
pub mod ident;
pub mod literal;
pub mod manifest;
pub mod markers;
pub mod next_line;
pub mod snippet;

pub use config::LoaderConfig;
pub use diagnostic::Diagnostic;
pub use manifest::{Manifest, Registration, RegistrationKind};
pub use markers::Marker;

/// Metadata the build pipeline hands to a loader.
#[derive(Debug, Clone, Copy)]
pub struct LoaderContext<'a> {
    pub resource_path: &'a str,
}

/// Outcome of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Rewritten source, or the input verbatim when nothing was marked.
    pub code: String,
    pub markers: Vec<Marker>,
    pub registrations: Vec<Registration>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Transformed {
    fn unchanged(source: &str) -> Self {
        Transformed {
            code: source.to_string(),
            markers: Vec::new(),
            registrations: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.markers.is_empty() && self.diagnostics.is_empty()
    }
}

/// Transform one file.
///
/// Never fails: an unterminated block is reported in
/// [`Transformed::diagnostics`] and its body is dropped.
pub fn transform(resource_path: &str, source: &str, config: &LoaderConfig) -> Transformed {
    if !gate::is_transformable(resource_path, &config.extensions) {
        return Transformed::unchanged(source);
    }
    let markers = config.markers();
    if !markers.any_in(source) {
        return Transformed::unchanged(source);
    }

    // A single trailing newline terminates the last line rather than
    // starting an empty one.
    let (body, trailing_newline) = match source.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (source, false),
    };
    let lines: Vec<&str> = body.split('\n').collect();

    let pass1 = next_line::rewrite_next_lines(&lines, resource_path, &markers, &config.registry);
    let pass2 = block::extract_blocks(&pass1.lines, resource_path, &markers, &config.registry);

    let output = if pass2.changed() {
        &pass2.lines
    } else if pass1.changed() {
        &pass1.lines
    } else {
        return Transformed::unchanged(source);
    };

    let mut code = output.join("\n");
    if trailing_newline {
        code.push('\n');
    }

    let mut found = pass1.markers;
    found.extend(pass2.markers);
    let mut registrations = pass1.registrations;
    registrations.extend(pass2.registrations);

    tracing::debug!(
        target: "eserver_loader",
        resource_path,
        registrations = registrations.len(),
        "transformed"
    );

    Transformed {
        code,
        markers: found,
        registrations,
        diagnostics: pass2.diagnostics,
    }
}

/// Loader entry point: transform with the default config, report
/// diagnostics as warnings, and return the code.
///
/// Warnings go to `tracing` only. Without an installed subscriber an
/// unterminated block is dropped with no visible trace; hosts that need the
/// diagnostics as values should call [`transform`] instead.
pub fn load(ctx: &LoaderContext<'_>, source: &str) -> String {
    load_with(ctx, source, &LoaderConfig::default())
}

/// [`load`] with an explicit config. Same `tracing` requirement.
pub fn load_with(ctx: &LoaderContext<'_>, source: &str, config: &LoaderConfig) -> String {
    let out = transform(ctx.resource_path, source, config);
    for diag in &out.diagnostics {
        diag.emit();
    }
    out.code
}
