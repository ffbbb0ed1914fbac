use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PublishError, Result};

// Trailing digit run, tolerating a single `.` or `_` after it so names like
// `shot010_v001_0101_.exr` still yield `0101`.
static FRAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)[._]?$").expect("valid regex"));

/// Extracts the trailing frame label from a filename (extension ignored),
/// preserving leading zeros.
pub fn frame_label(file_name: &str) -> Result<String> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    FRAME_RE
        .captures(stem)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| PublishError::FrameFormat(file_name.to_string()))
}
