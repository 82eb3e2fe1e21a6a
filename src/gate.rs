//! File-type gate.
//!
//! Only script sources are scanned; everything else (stylesheets, JSON,
//! images routed through the same rule) passes through untouched.

use std::path::Path;

/// Extensions recognized as script sources.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Returns true if `resource_path` ends in one of `extensions` (no leading dot).
pub fn is_transformable<S: AsRef<str>>(resource_path: &str, extensions: &[S]) -> bool {
    match Path::new(resource_path).extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|allowed| allowed.as_ref() == ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_script_variants() {
        for path in ["src/foo.js", "a.jsx", "pages/index.ts", "App.tsx"] {
            assert!(is_transformable(path, DEFAULT_EXTENSIONS), "{path}");
        }
    }

    #[test]
    fn rejects_other_files() {
        for path in ["styles.css", "data.json", "README.md", "Makefile", "foo.js.map"] {
            assert!(!is_transformable(path, DEFAULT_EXTENSIONS), "{path}");
        }
    }

    #[test]
    fn extension_match_is_exact() {
        assert!(!is_transformable("a.JS", DEFAULT_EXTENSIONS));
        assert!(!is_transformable("a.mjs", DEFAULT_EXTENSIONS));
        assert!(!is_transformable(".js", DEFAULT_EXTENSIONS));
    }

    #[test]
    fn custom_list() {
        let exts = vec!["mjs".to_string()];
        assert!(is_transformable("lib/x.mjs", &exts));
        assert!(!is_transformable("lib/x.js", &exts));
    }
}
