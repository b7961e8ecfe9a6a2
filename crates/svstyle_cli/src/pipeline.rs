//! Shared pipeline helpers for CLI commands.
//!
//! Configuration discovery, source file discovery, and the parallel
//! check-all-files step used by `lint`.

use std::error::Error;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use svstyle_common::Interner;
use svstyle_config::{FilesConfig, StyleConfig, CONFIG_FILE_NAME};
use svstyle_diagnostics::{Diagnostic, DiagnosticSink};
use svstyle_lint::LintEngine;
use svstyle_source::SourceDb;
use tracing::{debug, trace};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest `svstyle.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the configuration selected by the global flags.
///
/// `--config` may name a file or a directory holding `svstyle.toml`; without
/// it the nearest `svstyle.toml` above the working directory is used. When
/// no file is found the defaults apply.
pub fn load_style_config(global: &GlobalArgs) -> Result<StyleConfig, Box<dyn Error>> {
    let path = match &global.config {
        Some(path) if path.is_dir() => Some(path.join(CONFIG_FILE_NAME)),
        Some(path) => Some(path.clone()),
        None => find_config(&std::env::current_dir()?),
    };
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            svstyle_config::load_config_file(&path)
                .map_err(|e| format!("{}: {e}", path.display()).into())
        }
        None => {
            debug!("no configuration file found; using defaults");
            Ok(StyleConfig::default())
        }
    }
}

/// Expands the command-line paths into the list of files to check.
///
/// Directories are walked recursively, keeping files whose extension is
/// listed in `files.extensions` and skipping entries named in
/// `files.exclude`. Files named explicitly are always kept. The result is
/// sorted and free of duplicates.
pub fn discover_source_files(
    paths: &[PathBuf],
    files: &FilesConfig,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, files, &mut found)?;
        } else if path.is_file() {
            found.push(path.clone());
        } else {
            return Err(format!("no such file or directory: {}", path.display()).into());
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn walk_dir(dir: &Path, files: &FilesConfig, found: &mut Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_excluded(&path, &files.exclude) {
            trace!(path = %path.display(), "excluded");
            continue;
        }
        if path.is_dir() {
            walk_dir(&path, files, found)?;
        } else if has_source_extension(&path, &files.extensions) {
            found.push(path);
        }
    }
    Ok(())
}

/// Returns `true` if the path's extension is one of `extensions`.
pub fn has_source_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| exclude.iter().any(|e| e == name))
}

/// Reads every file into a fresh source database.
pub fn load_sources(files: &[PathBuf]) -> Result<SourceDb, Box<dyn Error>> {
    let mut db = SourceDb::new();
    for path in files {
        db.load_file(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    }
    Ok(db)
}

/// Checks every file of the database in parallel.
///
/// Each worker interns its own identifiers; results are collected in a
/// [`DiagnosticSink`] and returned sorted by file and location.
pub fn check_all(db: &SourceDb, engine: &LintEngine) -> Vec<Diagnostic> {
    let sink = DiagnosticSink::new();
    db.files().par_iter().for_each(|file| {
        let interner = Interner::new();
        let diags = engine.check_source(file, &interner);
        debug!(
            file = %file.path.display(),
            hash = %file.content_hash,
            count = diags.len(),
            "checked file"
        );
        sink.extend(diags);
    });
    sink.take_sorted()
}
