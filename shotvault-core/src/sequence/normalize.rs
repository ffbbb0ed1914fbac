use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PublishError, Result};

use super::frame::frame_label;
use super::scan::list_sequence_files;

/// Start of the canonical frame range for sequences whose native start frame
/// falls outside 101..=999.
const CANONICAL_START: i64 = 1001;

/// A validated image sequence, remapped onto the canonical frame range.
///
/// `frames` pairs each canonical zero-padded frame label with the source file
/// it was derived from, in ascending frame order. Labels are unique and
/// strictly consecutive by construction.
#[derive(Debug, Clone)]
pub struct SequenceDescriptor {
    pub frames: Vec<(String, PathBuf)>,
    pub original_start_frame: i64,
    pub frame_padding: usize,
    /// Lowercased extension, without dot.
    pub extension: String,
}

impl SequenceDescriptor {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first_source(&self) -> Option<&Path> {
        self.frames.first().map(|(_, path)| path.as_path())
    }
}

/// Validates the `.{extension}` sequence in `dir` and computes its canonical
/// numbering. Padding must be uniform, frame numbers strictly consecutive in
/// lexicographic file order. Start frames outside (100, 1000) are rebased so
/// the sequence starts at 1001; already-canonical ranges are left untouched.
///
/// This only computes the destination numbering; no file is renamed or moved.
pub fn normalize_sequence(dir: &Path, extension: &str) -> Result<SequenceDescriptor> {
    let files = list_sequence_files(dir, extension)?;
    if files.is_empty() {
        return Err(PublishError::EmptySequence {
            dir: dir.to_path_buf(),
            extension: extension.to_lowercase(),
        });
    }

    let mut labels = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        labels.push(frame_label(name)?);
    }

    let frame_padding = labels[0].len();
    if labels.iter().any(|label| label.len() != frame_padding) {
        return Err(PublishError::InconsistentPadding {
            dir: dir.to_path_buf(),
        });
    }

    let mut numbers = Vec::with_capacity(labels.len());
    for (label, path) in labels.iter().zip(&files) {
        let number: i64 = label
            .parse()
            .map_err(|_| PublishError::FrameFormat(path.display().to_string()))?;
        numbers.push(number);
    }

    let original_start_frame = numbers[0];
    for (i, number) in numbers.iter().enumerate() {
        if *number != original_start_frame + i as i64 {
            return Err(PublishError::NonConsecutive {
                dir: dir.to_path_buf(),
            });
        }
    }

    let offset = if 100 < original_start_frame && original_start_frame < 1000 {
        0
    } else {
        CANONICAL_START - original_start_frame
    };

    let frames = numbers
        .iter()
        .zip(&files)
        .map(|(number, path)| (zero_pad(number + offset, frame_padding), path.clone()))
        .collect();

    debug!(
        dir = %dir.display(),
        start = original_start_frame,
        offset,
        count = files.len(),
        "normalized image sequence"
    );

    Ok(SequenceDescriptor {
        frames,
        original_start_frame,
        frame_padding,
        extension: extension.to_lowercase(),
    })
}

fn zero_pad(value: i64, width: usize) -> String {
    format!("{value:0width$}")
}
