//! eserver-loader — strip server-only marked code from JS/TS sources.
//!
//! Two modes:
//!
//! - **stdin mode**: `eserver-loader --resource-path src/page.tsx < page.tsx`
//! - **file mode**: `eserver-loader -o build/ -m build/eserver.json src/*.tsx`
//!
//! Unterminated blocks are reported as warnings on stderr; the run still
//! succeeds unless `--deny-warnings` is given.

use anyhow::{bail, Context, Result};
use clap::Parser;
use eserver_loader::{gate, transform, LoaderConfig, Manifest, Transformed};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "eserver-loader",
    about = "Rewrite server-only marked code in JS/TS sources into registry entries"
)]
struct Cli {
    /// Input files, directories or glob patterns. If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Resource path of the stdin source (used for the file-type gate and identifiers)
    #[arg(long)]
    resource_path: Option<String>,

    /// Write every registration of the run to this JSON file
    #[arg(short = 'm', long)]
    manifest: Option<PathBuf>,

    /// TOML config file (markers, extensions, registry name)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Exit with an error if any warning was emitted
    #[arg(long)]
    deny_warnings: bool,

    /// Debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => LoaderConfig::from_toml_file(path)?,
        None => LoaderConfig::default(),
    };

    let mut manifest = Manifest::default();
    let warnings = if cli.files.is_empty() {
        stdin_mode(&cli, &config, &mut manifest)?
    } else {
        file_mode(&cli, &config, &mut manifest)?
    };

    if let Some(path) = &cli.manifest {
        manifest.write(path)?;
        info!(path = %path.display(), entries = manifest.registrations.len(), "manifest written");
    }

    if cli.deny_warnings && warnings > 0 {
        bail!("{warnings} warning(s) emitted and --deny-warnings is set");
    }
    Ok(())
}

/// Route `tracing` output to stderr so stdout stays clean for stdin mode.
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("ESERVER_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("eserver_loader=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

/// Emit diagnostics and collect registrations. Returns the warning count.
fn record(out: &Transformed, manifest: &mut Manifest) -> usize {
    for diag in &out.diagnostics {
        diag.emit();
    }
    manifest.extend(out.registrations.iter().cloned());
    out.diagnostics.len()
}

/// stdin mode: read one source from stdin, write the result to stdout.
fn stdin_mode(cli: &Cli, config: &LoaderConfig, manifest: &mut Manifest) -> Result<usize> {
    let resource_path = cli
        .resource_path
        .as_deref()
        .context("--resource-path is required when reading from stdin")?;

    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;

    let out = transform(resource_path, &source, config);
    let warnings = record(&out, manifest);

    io::stdout()
        .write_all(out.code.as_bytes())
        .context("failed to write stdout")?;
    Ok(warnings)
}

/// file mode: transform each input and write it into the output directory.
fn file_mode(cli: &Cli, config: &LoaderConfig, manifest: &mut Manifest) -> Result<usize> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let inputs = collect_inputs(&cli.files, &config.extensions)?;

    let mut warnings = inputs.unmatched.len();
    for arg in &inputs.unmatched {
        warn!("no files matched: {arg}");
    }

    let mut written = HashSet::new();
    for path in &inputs.files {
        let name = path
            .file_name()
            .with_context(|| format!("not a file: {}", path.display()))?;
        if !written.insert(name.to_os_string()) {
            bail!(
                "two inputs share the output name {}",
                Path::new(name).display()
            );
        }

        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let resource_path = path.to_string_lossy();
        let out = transform(&resource_path, &source, config);
        warnings += record(&out, manifest);
        debug!(
            path = %path.display(),
            registrations = out.registrations.len(),
            unchanged = out.is_unchanged(),
            "processed"
        );

        let out_path = output_dir.join(name);
        fs::write(&out_path, &out.code)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
    }

    Ok(warnings)
}

/// Resolved file-mode arguments.
#[derive(Debug, Default)]
struct Inputs {
    /// Sorted and deduplicated.
    files: BTreeSet<PathBuf>,
    /// Arguments that resolved to no file.
    unmatched: Vec<String>,
}

/// Resolve each argument as a file, a directory (non-recursive scan for
/// recognized extensions) or a glob pattern.
fn collect_inputs(args: &[String], extensions: &[String]) -> Result<Inputs> {
    let mut inputs = Inputs::default();
    for arg in args {
        let path = Path::new(arg);
        let found: Vec<PathBuf> = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && gate::is_transformable(&p.to_string_lossy(), extensions))
                .collect()
        } else {
            glob::glob(arg)
                .with_context(|| format!("invalid glob pattern: {arg}"))?
                .flatten()
                .filter(|p| p.is_file())
                .collect()
        };

        if found.is_empty() {
            inputs.unmatched.push(arg.clone());
        }
        inputs.files.extend(found);
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn default_exts() -> Vec<String> {
        LoaderConfig::default().extensions
    }

    fn arg(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn directory_scan_filters_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();
        fs::write(dir.path().join("b.css"), "").unwrap();
        fs::write(dir.path().join("c.jsx"), "").unwrap();

        let inputs = collect_inputs(&[arg(dir.path())], &default_exts()).unwrap();
        let names: Vec<_> = inputs
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ts", "c.jsx"]);
        assert!(inputs.unmatched.is_empty());
    }

    #[test]
    fn glob_and_file_dedup() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.js");
        fs::write(&a, "").unwrap();
        fs::write(dir.path().join("b.js"), "").unwrap();

        let pattern = format!("{}/*.js", dir.path().display());
        let inputs = collect_inputs(&[arg(&a), pattern], &default_exts()).unwrap();
        assert_eq!(inputs.files.len(), 2);
        // An argument whose files were already collected still counts as matched.
        assert!(inputs.unmatched.is_empty());
    }

    #[test]
    fn unmatched_arguments_are_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style.css"), "").unwrap();
        let pattern = format!("{}/*.tsx", dir.path().display());
        let missing = arg(&dir.path().join("missing.js"));

        let inputs = collect_inputs(
            &[pattern.clone(), missing.clone(), arg(dir.path())],
            &default_exts(),
        )
        .unwrap();
        assert!(inputs.files.is_empty());
        assert_eq!(inputs.unmatched, vec![pattern, missing, arg(dir.path())]);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = collect_inputs(&["src/[.js".to_string()], &default_exts()).unwrap_err();
        assert!(err.to_string().contains("invalid glob pattern"), "Got: {err}");
    }
}
