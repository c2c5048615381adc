//! Check command implementation.
//!
//! Walks a directory and parses every configuration file it finds.

use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::error::{Result, StoreError};
use crate::output::{display_path, plural, Printer};
use crate::store::{file, Format, FormatKind, Lightning, Yaml};

/// Parse every configuration file below a directory
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory or file to check (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Outcome of checking a tree of files.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Files that parsed.
    pub passed: Vec<PathBuf>,
    /// Files that failed, with the error.
    pub failed: Vec<(PathBuf, StoreError)>,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Find configuration files below `root` (or `root` itself when it is a file).
pub fn scan(root: &Path) -> Vec<(PathBuf, FormatKind)> {
    let mut found: Vec<(PathBuf, FormatKind)> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let kind = FormatKind::detect(e.path())?;
            Some((e.into_path(), kind))
        })
        .collect();
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

/// Parse one file in the format its extension names.
pub fn check_file(path: &Path, kind: FormatKind) -> Result<()> {
    let text = file::read(path)?;
    match kind {
        FormatKind::Lightning => Lightning::parse(&text).map(drop),
        FormatKind::Yaml => Yaml::parse(&text).map(drop),
    }
}

pub fn check_tree(root: &Path) -> CheckReport {
    let mut report = CheckReport::default();
    for (path, kind) in scan(root) {
        match check_file(&path, kind) {
            Ok(()) => report.passed.push(path),
            Err(err) => report.failed.push((path, err)),
        }
    }
    report
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    if !args.path.exists() {
        return Err(StoreError::Command {
            message: format!("{} does not exist", args.path.display()),
            help: None,
        });
    }

    printer.status("Checking", &display_path(&args.path));
    let report = check_tree(&args.path);

    for (path, err) in &report.failed {
        printer.error("Failed", &format!("{}: {}", display_path(path), err));
    }

    if report.failed.is_empty() {
        printer.status(
            "Finished",
            &format!("{} parsed", plural(report.total(), "file", "files")),
        );
        Ok(())
    } else {
        Err(StoreError::Command {
            message: format!(
                "{} of {} failed to parse",
                plural(report.failed.len(), "file", "files"),
                report.total()
            ),
            help: None,
        })
    }
}
