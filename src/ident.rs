//! Registry identifiers and generated function names.
//!
//! Keys are derived from the resource path and a line index so that tooling
//! can locate each extracted snippet. Wrapper names are hashed from the same
//! inputs, which keeps the generated code reproducible across builds.

use regex::{Captures, Regex};
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::sync::LazyLock;

/// Anything outside `[A-Za-z0-9_]`. ASCII-only, like a JavaScript `\W`.
/// One match is one `char`.
static RE_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Hex digits of the digest kept in wrapper names.
const SUFFIX_LEN: usize = 8;

/// Replace every non-word character with `_`.
/// `"src/foo.js"` → `"src_foo_js"`.
///
/// Characters outside the BMP become one `_` per UTF-16 code unit, so keys
/// match what `path.replace(/\W/g, "_")` yields in JavaScript.
pub fn sanitize_path(resource_path: &str) -> String {
    RE_NON_WORD
        .replace_all(resource_path, |caps: &Captures| {
            let units: usize = caps[0].chars().map(char::len_utf16).sum();
            "_".repeat(units)
        })
        .into_owned()
}

/// Key for a single-line marker found on `line`.
pub fn line_identifier(resource_path: &str, line: usize) -> String {
    format!("{}_{}", sanitize_path(resource_path), line)
}

/// Key for a block whose begin marker sits on `line`.
pub fn block_identifier(resource_path: &str, line: usize) -> String {
    format!("{}_block_{}", sanitize_path(resource_path), line)
}

/// Name of the async function wrapping a block body.
///
/// `ordinal` counts blocks within one file, starting at 0.
pub fn wrapper_name(resource_path: &str, line: usize, ordinal: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resource_path.as_bytes());
    hasher.update([0u8]);
    hasher.update((line as u64).to_le_bytes());
    hasher.update((ordinal as u64).to_le_bytes());
    let digest = hasher.finalize();

    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for byte in digest.iter().take(SUFFIX_LEN / 2) {
        let _ = write!(suffix, "{byte:02x}");
    }
    format!("__eserver_block_{line}_{suffix}")
}
