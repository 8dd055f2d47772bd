pub mod modules;
pub mod scan;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand files and directories into an ordered file list. Directories are
/// walked recursively; ordering is deterministic so repeated runs produce
/// identical batches.
pub fn collect_files(paths: &[PathBuf]) -> Vec<String> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(walk_dir(path));
        } else {
            files.push(path.display().to_string());
        }
    }
    files
}

fn walk_dir(dir: &Path) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().display().to_string())
        .collect();
    found.sort();
    found
}
