//! Removal of generated documents whose source recipe is gone.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
}

/// Deletes every `*.{extension}` file under `content_dir` that is not in
/// `expected`, then every directory left empty. `content_dir` itself is kept.
///
/// Failures are logged and skipped.
pub fn remove_orphans(
    content_dir: &Path,
    expected: &HashSet<PathBuf>,
    extension: &str,
) -> CleanupReport {
    let mut report = CleanupReport::default();
    if !content_dir.is_dir() {
        warn!("Content directory {} does not exist", content_dir.display());
        return report;
    }

    sweep(content_dir, expected, extension, &mut report);

    if !report.removed_files.is_empty() || !report.removed_dirs.is_empty() {
        info!(
            "Cleanup removed {} orphaned file(s) and {} empty director(ies)",
            report.removed_files.len(),
            report.removed_dirs.len()
        );
    }
    report
}

/// Post-order walk; returns true when `dir` is empty afterwards.
fn sweep(
    dir: &Path,
    expected: &HashSet<PathBuf>,
    extension: &str,
    report: &mut CleanupReport,
) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read directory {}: {}", dir.display(), e);
            return false;
        }
    };

    let mut remaining = 0usize;
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                error!("Failed to read entry in {}: {}", dir.display(), e);
                remaining += 1;
                continue;
            }
        };

        if path.is_dir() {
            if sweep(&path, expected, extension, report) {
                match fs::remove_dir(&path) {
                    Ok(()) => {
                        info!("Removed empty directory: {}", path.display());
                        report.removed_dirs.push(path);
                    }
                    Err(e) => {
                        error!("Failed to remove directory {}: {}", path.display(), e);
                        remaining += 1;
                    }
                }
            } else {
                remaining += 1;
            }
        } else if is_orphan(&path, expected, extension) {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("Removed orphaned file: {}", path.display());
                    report.removed_files.push(path);
                }
                Err(e) => {
                    error!("Failed to remove {}: {}", path.display(), e);
                    remaining += 1;
                }
            }
        } else {
            remaining += 1;
        }
    }

    remaining == 0
}

fn is_orphan(path: &Path, expected: &HashSet<PathBuf>, extension: &str) -> bool {
    let matches_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension);
    matches_extension && !expected.contains(path)
}
