//! External-transcoder boundary.
//!
//! Sequences publish with a lightweight preview movie; when none is supplied,
//! one is encoded from the frames by invoking ffmpeg as a subprocess. The
//! contract is narrow: given an input numeral-pattern path, a start frame and
//! an output path, produce a playable proxy at the output path or fail with
//! the captured diagnostics. A hung encode is bounded by a timeout and
//! surfaces the same way.

use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info};

use crate::error::{PublishError, Result};
use crate::sequence::SequenceDescriptor;

// Digit run immediately before the extension, replaced with the fixed-width
// `%0Nd` pattern ffmpeg expects for image-sequence input.
static FRAME_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(\.\w+)$").expect("valid regex"));

/// Linear EXR input to Rec. 709, scaled to the house proxy resolution.
const TONEMAP_FILTER: &str = "zscale=t=linear,tonemap=hable,zscale=p=bt709,zscale=t=bt709,zscale=m=bt709,format=yuv420p,scale=1920:1080";

const PROXY_FRAME_RATE: u32 = 24;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct ProxyEncoder {
    ffmpeg_path: String,
    timeout: Duration,
}

impl Default for ProxyEncoder {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProxyEncoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The ffmpeg input pattern for a normalized sequence: the first frame's
    /// path with its frame numerals replaced by `%0<padding>d`.
    pub fn input_pattern(&self, descriptor: &SequenceDescriptor) -> Result<PathBuf> {
        let first = descriptor.first_source().ok_or_else(|| {
            PublishError::ProxyGeneration("sequence has no frames".to_string())
        })?;
        let name = first
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PublishError::ProxyGeneration(format!(
                    "unrepresentable frame filename: {}",
                    first.display()
                ))
            })?;
        let replacement = format!("%0{}d${{2}}", descriptor.frame_padding);
        let pattern = FRAME_RUN_RE.replace(name, replacement.as_str());
        Ok(first.with_file_name(pattern.as_ref()))
    }

    /// Encodes a proxy movie for `descriptor` at `output`. Blocks until the
    /// external process exits; non-zero exit or timeout fails with the
    /// captured diagnostics.
    pub async fn encode(&self, descriptor: &SequenceDescriptor, output: &Path) -> Result<PathBuf> {
        let input = self.input_pattern(descriptor)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            start = descriptor.original_start_frame,
            "encoding proxy"
        );

        let mut cmd = Command::new(&self.ffmpeg_path);
        // A timed-out encode must not leave the process running.
        cmd.kill_on_drop(true);
        cmd.arg("-y");
        cmd.arg("-framerate").arg(PROXY_FRAME_RATE.to_string());
        cmd.arg("-start_number")
            .arg(descriptor.original_start_frame.to_string());
        cmd.arg("-i").arg(&input);
        cmd.arg("-vf").arg(TONEMAP_FILTER);
        cmd.arg("-c:v").arg("libx264");
        cmd.arg(output);

        let finished = timeout(self.timeout, cmd.output()).await.map_err(|_| {
            PublishError::ProxyGeneration(format!(
                "transcode did not finish within {}s",
                self.timeout.as_secs()
            ))
        })?;
        let process_output = finished.map_err(|e| {
            PublishError::ProxyGeneration(format!("failed to run {}: {e}", self.ffmpeg_path))
        })?;

        if !process_output.status.success() {
            let stderr = String::from_utf8_lossy(&process_output.stderr);
            error!(status = %process_output.status, "proxy transcode failed");
            return Err(PublishError::ProxyGeneration(stderr.into_owned()));
        }

        info!(output = %output.display(), "proxy encoded");
        Ok(output.to_path_buf())
    }
}
