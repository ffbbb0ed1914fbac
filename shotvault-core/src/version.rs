//! Next-version resolution.
//!
//! The filesystem is the source of truth: the next version number is derived
//! by scanning what already exists, so no counter state lives anywhere else.
//! The scan-then-write sequence is not atomic; two publishes racing on the
//! same task can resolve the same number. Serializing publishes per task is
//! the caller's responsibility.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::convention::{VERSION_NUMBER, VersionConvention};
use crate::error::Result;

static FILE_VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_v(\d{3})$").expect("valid regex"));

/// Computes the next 3-digit version number for a task from what is already
/// on disk in `task_dir`: `"001"` when nothing matches, else `max + 1`.
pub fn next_version(convention: &VersionConvention, task_dir: &Path) -> Result<String> {
    let found = match &convention.version_dir {
        Some(template) => versions_from_dirs(template, task_dir)?,
        None => versions_from_files(task_dir)?,
    };
    let next = found.into_iter().max().map_or(1, |max| max + 1);
    debug!(task = %convention.task, dir = %task_dir.display(), next, "resolved next version");
    Ok(format!("{next:03}"))
}

/// Directory-versioned mode: the template becomes an anchored pattern with a
/// 3-digit capture in place of `{VERSION_NUMBER}`, matched against immediate
/// subdirectory names.
fn versions_from_dirs(template: &str, task_dir: &Path) -> Result<Vec<u32>> {
    let pattern = version_dir_regex(template);
    let mut found = Vec::new();
    for entry in fs::read_dir(task_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(captures) = pattern.captures(name)
            && let Ok(number) = captures[1].parse()
        {
            found.push(number);
        }
    }
    Ok(found)
}

/// Filename-versioned mode: immediate files whose stem ends in `_v` plus
/// exactly three digits.
fn versions_from_files(task_dir: &Path) -> Result<Vec<u32>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(task_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(captures) = FILE_VERSION_RE.captures(stem)
            && let Ok(number) = captures[1].parse()
        {
            found.push(number);
        }
    }
    Ok(found)
}

fn version_dir_regex(template: &str) -> Regex {
    let escaped = regex::escape(template);
    let pattern = format!(
        "^{}$",
        escaped.replace(&regex::escape(VERSION_NUMBER), r"(\d{3})")
    );
    Regex::new(&pattern).expect("escaped template is a valid pattern")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{ExtensionSets, FileKind, FilenameTemplates};
    use std::fs::{self, File};

    fn convention(version_dir: Option<&str>) -> VersionConvention {
        VersionConvention {
            task: "compositing".to_string(),
            parent_dir: vec!["comp".to_string()],
            version_dir: version_dir.map(str::to_string),
            original: FileKind::Image,
            proxy: FileKind::Movie,
            templates: FilenameTemplates::default(),
            extensions: ExtensionSets::default(),
        }
    }

    #[test]
    fn empty_task_dir_starts_at_001() {
        let dir = tempfile::tempdir().expect("tempdir");
        let next = next_version(&convention(Some("v{VERSION_NUMBER}")), dir.path()).unwrap();
        assert_eq!(next, "001");
    }

    #[test]
    fn directory_versioning_advances_past_max() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["v001", "v003", "unrelated", "v12"] {
            fs::create_dir(dir.path().join(name)).expect("mkdir");
        }
        // A matching *file* must not count.
        File::create(dir.path().join("v002")).expect("create");

        let next = next_version(&convention(Some("v{VERSION_NUMBER}")), dir.path()).unwrap();
        assert_eq!(next, "004");
    }

    #[test]
    fn resolver_is_stable_without_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("v007")).expect("mkdir");

        let conv = convention(Some("v{VERSION_NUMBER}"));
        assert_eq!(next_version(&conv, dir.path()).unwrap(), "008");
        assert_eq!(next_version(&conv, dir.path()).unwrap(), "008");

        fs::create_dir(dir.path().join("v008")).expect("mkdir");
        assert_eq!(next_version(&conv, dir.path()).unwrap(), "009");
    }

    #[test]
    fn filename_versioning_reads_stems() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in [
            "SHOT0010_edit_v004.mov",
            "SHOT0010_edit_v002.mov",
            "SHOT0010_edit_draft.mov",
            "notes.txt",
        ] {
            File::create(dir.path().join(name)).expect("create");
        }

        let next = next_version(&convention(None), dir.path()).unwrap();
        assert_eq!(next, "005");
    }

    #[test]
    fn template_literals_are_escaped() {
        let dir = tempfile::tempdir().expect("tempdir");
        // The dot in the template must match a literal dot only.
        fs::create_dir(dir.path().join("ver.005")).expect("mkdir");
        fs::create_dir(dir.path().join("verX005")).expect("mkdir");

        let next = next_version(&convention(Some("ver.{VERSION_NUMBER}")), dir.path()).unwrap();
        assert_eq!(next, "006");
    }
}
