//! Input normalization and the accepted video URL shape.
//!
//! Validation is purely textual. The input is trimmed and matched against a
//! pattern for the two supported video hosts; nothing is resolved or fetched.

mod error;

pub use error::ValidationError;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

/// Accepted URL shape: optional scheme, optional `www.`, a supported host,
/// and at least one character of path. Matching is case-insensitive.
#[allow(clippy::expect_used)]
static VIDEO_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$")
        .expect("video URL regex is valid") // Static pattern, safe to panic
});

/// Trims surrounding whitespace and rejects empty input.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] when nothing remains after trimming.
pub fn normalize_input(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(trimmed)
}

/// Returns true if `candidate` matches the accepted video URL shape.
///
/// The candidate is matched as given; callers wanting whitespace tolerance
/// should go through [`validate_video_url`].
#[must_use]
pub fn is_supported_video_url(candidate: &str) -> bool {
    VIDEO_URL_PATTERN.is_match(candidate)
}

/// Normalizes raw input and checks it against the accepted URL shape.
///
/// The returned string is the trimmed input, unchanged otherwise. It is sent
/// to the backend verbatim, so no scheme is added and no case is folded.
///
/// # Errors
///
/// - [`ValidationError::Empty`] if the input is blank
/// - [`ValidationError::UnrecognizedUrl`] if the shape check fails
///
/// # Examples
///
/// ```
/// use vidfetch_core::input::validate_video_url;
///
/// assert_eq!(
///     validate_video_url("  youtu.be/abc123 ").unwrap(),
///     "youtu.be/abc123"
/// );
/// assert!(validate_video_url("http://example.com/video").is_err());
/// ```
#[tracing::instrument(level = "trace", skip(raw), fields(input_len = raw.len()))]
pub fn validate_video_url(raw: &str) -> Result<String, ValidationError> {
    let normalized = normalize_input(raw)?;
    trace!(url = %normalized, "checking URL shape");

    if !is_supported_video_url(normalized) {
        debug!(url = %normalized, "input rejected by URL shape check");
        return Err(ValidationError::unrecognized(normalized));
    }

    Ok(normalized.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ==================== Normalization ====================

    #[test]
    fn test_normalize_input_trims_whitespace() {
        assert_eq!(
            normalize_input("  https://youtu.be/x \n").unwrap(),
            "https://youtu.be/x"
        );
    }

    #[test]
    fn test_normalize_input_rejects_empty_and_blank() {
        for raw in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(normalize_input(raw), Err(ValidationError::Empty), "{raw:?}");
        }
    }

    // ==================== Accepted shapes ====================

    #[test]
    fn test_validate_accepts_full_watch_url() {
        let url = "https://www.youtube.com/watch?v=abc123";
        assert_eq!(validate_video_url(url).unwrap(), url);
    }

    #[test]
    fn test_validate_accepts_short_link_without_scheme() {
        assert_eq!(
            validate_video_url("youtu.be/abc123").unwrap(),
            "youtu.be/abc123"
        );
    }

    #[test]
    fn test_validate_accepts_http_and_no_www() {
        assert!(validate_video_url("http://youtube.com/shorts/xyz").is_ok());
        assert!(validate_video_url("www.youtube.com/watch?v=1").is_ok());
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        let url = "HTTPS://WWW.YouTube.COM/watch?v=abc";
        assert_eq!(validate_video_url(url).unwrap(), url);
    }

    #[test]
    fn test_validate_returns_trimmed_input_verbatim() {
        assert_eq!(
            validate_video_url("\t youtube.com/watch?v=Q  ").unwrap(),
            "youtube.com/watch?v=Q"
        );
    }

    // ==================== Rejected shapes ====================

    #[test]
    fn test_validate_rejects_plain_text() {
        assert_eq!(
            validate_video_url("not a url"),
            Err(ValidationError::unrecognized("not a url"))
        );
    }

    #[test]
    fn test_validate_rejects_other_hosts() {
        for url in [
            "http://example.com/video",
            "https://vimeo.com/123",
            "https://notyoutube.com/watch?v=1",
        ] {
            assert!(
                matches!(
                    validate_video_url(url),
                    Err(ValidationError::UnrecognizedUrl { .. })
                ),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_requires_path_segment() {
        assert!(validate_video_url("https://youtube.com").is_err());
        assert!(validate_video_url("https://youtube.com/").is_err());
        assert!(validate_video_url("youtu.be/").is_err());
    }

    #[test]
    fn test_validate_rejects_unsupported_scheme() {
        assert!(validate_video_url("ftp://youtube.com/watch?v=1").is_err());
    }

    #[test]
    fn test_validate_empty_reports_empty_not_unrecognized() {
        assert_eq!(validate_video_url("   "), Err(ValidationError::Empty));
    }
}
