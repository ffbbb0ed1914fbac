use std::path::Path;

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// MIME type for a file path, by extension. Unrecognized extensions fall back
/// to a generic octet-stream type; this lookup never fails.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("tiff") => "image/tiff",
        Some("exr") => "image/x-exr",
        Some("dpx") => "image/x-dpx",
        _ => DEFAULT_MIME,
    }
}
