//! Filename extraction, sanitization, and path resolution for saved artifacts.
//!
//! The backend suggests a name through a Content-Disposition header. The
//! suggestion is untrusted: it is sanitized before use and always resolved
//! inside the output directory.

use std::path::{Component, Path, PathBuf};

/// Filename used when the backend does not suggest a usable one.
pub const DEFAULT_FILENAME: &str = "youtube_video.mp4";

/// Derives the artifact filename from an optional Content-Disposition value.
///
/// Falls back to [`DEFAULT_FILENAME`] when the header is absent, has no
/// filename parameter, or names something that sanitizes to nothing usable.
#[must_use]
pub fn filename_from_header(content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(parse_content_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| is_usable_filename(name))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Parses Content-Disposition header to extract filename.
///
/// Handles:
/// - `attachment; filename="example.mp4"`
/// - `attachment; filename=example.mp4`
/// - `attachment; filename*=UTF-8''example.mp4` (RFC 5987)
///
/// Returns `None` when no non-empty filename parameter is present.
#[must_use]
pub fn parse_content_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            let encoded_name = encoded[..end].trim();
            if let Ok(decoded) = urlencoding::decode(encoded_name)
                && !decoded.is_empty()
            {
                return Some(decoded.into_owned());
            }
        }
    }

    let pos = header.find("filename=")?;
    let value = header[pos + 9..].trim();

    let filename = if let Some(stripped) = value.strip_prefix('"') {
        // Unterminated quote is malformed
        let end = stripped.find('"')?;
        &stripped[..end]
    } else {
        let end = value.find(';').unwrap_or(value.len());
        value[..end].trim()
    };

    (!filename.is_empty()).then(|| filename.to_string())
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_usable_filename(name: &str) -> bool {
    !name.trim_matches(|c| c == '_' || c == '.').is_empty()
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Number of suffixed names tried after the suggested one is taken.
pub const UNIQUE_SUFFIX_LIMIT: u32 = 999;

/// Path of the `attempt`-th candidate for `filename` inside `dir`.
///
/// Attempt 0 is the sanitized name itself, then `clip_1.mp4`, `clip_2.mp4`,
/// and so on. Names that sanitize to nothing usable become
/// [`DEFAULT_FILENAME`]. This only builds the path; the caller decides
/// whether it is free by creating the file exclusively.
#[must_use]
pub fn numbered_path(dir: &Path, filename: &str, attempt: u32) -> PathBuf {
    let sanitized = sanitize_filename(filename);
    let filename = if is_usable_filename(&sanitized) {
        sanitized.as_str()
    } else {
        DEFAULT_FILENAME
    };
    if attempt == 0 {
        return dir.join(filename);
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename, ""),
    };
    dir.join(format!("{stem}_{attempt}{ext}"))
}
