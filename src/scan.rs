//! Project-wide route discovery.
//!
//! Walks a source tree, dispatches every eligible file in parallel and
//! collects the per-file outcomes into a [`ScanReport`].

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::extract::Dispatcher;
use crate::route::{ParseOutcome, RouteDescriptor};

/// Directories that are never scanned, even without a .gitignore.
const BUILTIN_IGNORE: &[&str] = &[
    "node_modules",
    "bower_components",
    "jspm_packages",
    "dist",
    "build",
    "out",
    "coverage",
    ".git",
    ".svn",
    ".hg",
    ".next",
    ".nuxt",
    ".output",
    ".turbo",
    ".cache",
    ".yarn",
];

/// Per-project ignore file, same syntax as .gitignore.
pub const IGNORE_FILE: &str = ".routelensignore";

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileResult {
    Parsed(ParseOutcome),
    Unreadable { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Path relative to the scan root.
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: FileResult,
}

impl FileReport {
    pub fn outcome(&self) -> Option<&ParseOutcome> {
        match &self.result {
            FileResult::Parsed(outcome) => Some(outcome),
            FileResult::Unreadable { .. } => None,
        }
    }

    pub fn has_errors(&self) -> bool {
        match &self.result {
            FileResult::Parsed(outcome) => outcome.has_errors(),
            FileResult::Unreadable { .. } => true,
        }
    }
}

/// Results of a project scan, ordered by file path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.files
            .iter()
            .filter_map(FileReport::outcome)
            .flat_map(|outcome| outcome.routes.iter())
    }

    pub fn files_with_errors(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| file.has_errors())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes().count()
    }

    pub fn error_count(&self) -> usize {
        self.files_with_errors().count()
    }
}

fn is_ignored_dir(name: &OsStr, extra: &[String]) -> bool {
    let Some(name) = name.to_str() else {
        return false;
    };
    BUILTIN_IGNORE.contains(&name) || extra.iter().any(|e| e == name)
}

/// Collect every file under `root` the scanner should dispatch.
pub fn discover_files(root: &Path, config: &ScanConfig) -> Vec<PathBuf> {
    let exclude = config.exclude.clone();

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(config.follow_gitignore)
        .git_global(config.follow_gitignore)
        .git_exclude(config.follow_gitignore)
        .require_git(false)
        .add_custom_ignore_filename(IGNORE_FILE)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            entry.depth() == 0 || !is_dir || !is_ignored_dir(entry.file_name(), &exclude)
        })
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| config.accepts_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Scan a project. Never aborts on a single bad file.
pub fn scan_project(root: &Path, config: &ScanConfig, dispatcher: &Dispatcher) -> ScanReport {
    let files = discover_files(root, config);

    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|file_path| {
            let relative = file_path.strip_prefix(root).unwrap_or(file_path);
            scan_file(file_path, relative, dispatcher)
        })
        .collect();
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    let report = ScanReport {
        root: root.to_path_buf(),
        files: reports,
    };
    info!(
        root = %root.display(),
        files = report.file_count(),
        routes = report.route_count(),
        with_errors = report.error_count(),
        "scan complete"
    );
    report
}

/// Read and dispatch one file. `display_path` is what routes report.
pub fn scan_file(path: &Path, display_path: &Path, dispatcher: &Dispatcher) -> FileReport {
    let result = match fs::read_to_string(path) {
        Ok(source) => FileResult::Parsed(dispatcher.dispatch(&source, display_path)),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "failed to read file");
            FileResult::Unreadable {
                message: e.to_string(),
            }
        }
    };
    FileReport {
        path: display_path.to_path_buf(),
        result,
    }
}
