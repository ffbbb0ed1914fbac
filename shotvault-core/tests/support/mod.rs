#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use shotvault_core::convention::{
    ConventionTable, ExtensionSets, FileKind, FilenameTemplates, VersionConvention,
};

pub fn comp_convention() -> VersionConvention {
    VersionConvention {
        task: "compositing".to_string(),
        parent_dir: vec!["comp".to_string()],
        version_dir: Some("v{VERSION_NUMBER}".to_string()),
        original: FileKind::Image,
        proxy: FileKind::Movie,
        templates: FilenameTemplates {
            image: Some("{SHOT_CODE}_comp_v{VERSION_NUMBER}.{FRAME_NUMBER}".to_string()),
            movie: Some("{SHOT_CODE}_comp_v{VERSION_NUMBER}".to_string()),
            file: None,
        },
        extensions: ExtensionSets {
            image: vec!["exr".to_string(), "dpx".to_string(), "png".to_string()],
            movie: vec!["mp4".to_string(), "mov".to_string()],
            file: vec![],
        },
    }
}

pub fn edit_convention() -> VersionConvention {
    VersionConvention {
        task: "editorial".to_string(),
        parent_dir: vec!["editorial".to_string()],
        version_dir: None,
        original: FileKind::Movie,
        proxy: FileKind::Movie,
        templates: FilenameTemplates {
            image: None,
            movie: Some("{SHOT_CODE}_edit_v{VERSION_NUMBER}".to_string()),
            file: None,
        },
        extensions: ExtensionSets {
            image: vec![],
            movie: vec!["mov".to_string(), "mp4".to_string()],
            file: vec![],
        },
    }
}

pub fn table(root: &Path) -> ConventionTable {
    let output_dir = vec![
        root.to_str().expect("utf-8 temp path").to_string(),
        "{SEQ_CODE}".to_string(),
        "{SHOT_CODE}".to_string(),
        "publish".to_string(),
    ];
    let mut tasks = HashMap::new();
    tasks.insert("compositing".to_string(), comp_convention());
    tasks.insert("editorial".to_string(), edit_convention());
    ConventionTable::new(output_dir, tasks)
}

/// Creates `count` empty frame files `stem.<n>.ext` starting at `start`,
/// zero-padded to `padding`, and returns the path of the first one.
pub fn write_frames(
    dir: &Path,
    stem: &str,
    start: i64,
    count: usize,
    padding: usize,
    ext: &str,
) -> PathBuf {
    let mut first = None;
    for i in 0..count {
        let frame = start + i as i64;
        let name = format!("{stem}.{frame:0padding$}.{ext}");
        let path = dir.join(name);
        File::create(&path).expect("create frame");
        if first.is_none() {
            first = Some(path);
        }
    }
    first.expect("at least one frame")
}
