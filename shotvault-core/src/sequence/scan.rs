use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Lists files in `dir` whose names end with `.{extension}`, case-insensitive,
/// sorted lexicographically by filename.
pub fn list_sequence_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension.to_lowercase());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.to_lowercase().ends_with(&suffix) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Finds the first file of a sequence in `dir`: the lexicographically first
/// file whose extension is in `allowed` (lowercased, without dot).
pub fn find_sequence_in_dir(dir: &Path, allowed: &[String]) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    for path in candidates {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if allowed.iter().any(|a| *a == extension) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
