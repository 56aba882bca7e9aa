//! reqwest-backed implementation of [`DownloadBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_DISPOSITION;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::DownloadBackend;
use super::constants::{DOWNLOAD_PATH, GENERIC_ERROR_DESCRIPTION};
use super::error::{BackendError, BackendSetupError};
use crate::artifact::DownloadedArtifact;
use crate::user_agent;

/// JSON body of a download request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadRequest<'a> {
    /// The validated, trimmed video URL.
    pub url: &'a str,
}

/// Failure body returned by the backend on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Transport settings for [`BackendClient`].
///
/// The default leaves both timeouts to the transport, which imposes none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Time allowed to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Overall request deadline.
    pub request_timeout: Option<Duration>,
}

/// HTTP client for the download backend.
///
/// Created once and reused, taking advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: Url,
}

impl BackendClient {
    /// Creates a client posting to `{base_url}/download`.
    ///
    /// # Errors
    ///
    /// - [`BackendSetupError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   http(s) URL with a host
    /// - [`BackendSetupError::ClientBuild`] if the HTTP client cannot be built
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, BackendSetupError> {
        let endpoint = download_endpoint(base_url)?;

        let mut builder = Client::builder().user_agent(user_agent::default_backend_user_agent());
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| BackendSetupError::ClientBuild { source })?;

        debug!(endpoint = %endpoint, "backend client ready");
        Ok(Self { client, endpoint })
    }

    /// The resolved download endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DownloadBackend for BackendClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn request_download(&self, url: &str) -> Result<DownloadedArtifact, BackendError> {
        debug!("sending download request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&DownloadRequest { url })
            .send()
            .await
            .map_err(|e| {
                let error = transport_error(&e);
                warn!(error = %error, "no response from backend");
                error
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(|e| {
                let error = transport_error(&e);
                warn!(status = status.as_u16(), error = %error, "failed to read error body");
                error
            })?;
            let description = extract_error_description(&body)
                .unwrap_or_else(|| GENERIC_ERROR_DESCRIPTION.to_string());
            warn!(status = status.as_u16(), description = %description, "backend reported failure");
            return Err(BackendError::remote(status.as_u16(), description));
        }

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = response.bytes().await.map_err(|e| {
            let error = transport_error(&e);
            warn!(error = %error, "failed to read response body");
            error
        })?;

        let artifact = DownloadedArtifact::from_response_parts(content_disposition.as_deref(), bytes);
        info!(
            status = status.as_u16(),
            filename = %artifact.filename,
            bytes = artifact.len(),
            "download received"
        );
        Ok(artifact)
    }
}

/// Extracts the `error` field from a failure body.
///
/// Returns `None` for empty or non-JSON bodies, bodies without the field, and
/// a field that is not a non-empty string.
#[must_use]
pub fn extract_error_description(body: &[u8]) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_slice(body).ok()?;
    parsed.error.filter(|e| !e.trim().is_empty())
}

/// Maps a reqwest failure to [`BackendError::Transport`], keeping the causes.
fn transport_error(error: &reqwest::Error) -> BackendError {
    let mut detail = error_chain(error);
    if error.is_timeout() && !detail.contains("timed out") {
        detail.push_str(" (timed out)");
    } else if error.is_connect() && !detail.contains("connect") {
        detail.push_str(" (connection failed)");
    }
    BackendError::transport(detail)
}

/// Joins an error and its `source()` chain with `": "`.
///
/// A cause whose text is already part of the message is skipped.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}

fn download_endpoint(base_url: &str) -> Result<Url, BackendSetupError> {
    let base = base_url.trim();
    let invalid = |reason: String| BackendSetupError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };

    let parsed = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("scheme '{scheme}' is not supported"))),
    }
    if parsed.host().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    let joined = format!("{}{DOWNLOAD_PATH}", base.trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=abc123";

    async fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&server.uri(), ClientOptions::default()).unwrap()
    }

    // ==================== Endpoint construction ====================

    #[test]
    fn test_download_endpoint_appends_path() {
        let endpoint = download_endpoint("http://127.0.0.1:5000").unwrap();
        assert_eq!(endpoint.as_str(), "http://127.0.0.1:5000/download");
    }

    #[test]
    fn test_download_endpoint_strips_trailing_slash_and_keeps_prefix() {
        let endpoint = download_endpoint("https://api.example.com/v1/").unwrap();
        assert_eq!(endpoint.as_str(), "https://api.example.com/v1/download");
    }

    #[test]
    fn test_download_endpoint_rejects_bad_bases() {
        for base in ["", "not a url", "ftp://example.com", "file:///tmp"] {
            assert!(
                matches!(
                    download_endpoint(base),
                    Err(BackendSetupError::InvalidBaseUrl { .. })
                ),
                "{base:?} should be rejected"
            );
        }
    }

    // ==================== Options ====================

    #[test]
    fn test_default_options_impose_no_timeouts() {
        let options = ClientOptions::default();
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.request_timeout, None);
        assert!(BackendClient::new("http://127.0.0.1:5000", options).is_ok());
    }

    // ==================== Error chains ====================

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Outer(#[source] Middle);

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct Middle(#[source] std::io::Error);

    #[test]
    fn test_error_chain_joins_every_cause() {
        let err = Outer(Middle(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused (os error 111)",
        )));
        assert_eq!(
            error_chain(&err),
            "error sending request: client error (Connect): Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_error_chain_skips_repeated_text() {
        #[derive(Debug, thiserror::Error)]
        #[error("read failed: {0}")]
        struct Wrapper(#[source] std::io::Error);

        let err = Wrapper(std::io::Error::other("broken pipe"));
        assert_eq!(error_chain(&err), "read failed: broken pipe");
    }

    // ==================== Error body parsing ====================

    #[test]
    fn test_extract_error_description_reads_error_field() {
        assert_eq!(
            extract_error_description(br#"{"error": "video unavailable"}"#),
            Some("video unavailable".to_string())
        );
    }

    #[test]
    fn test_extract_error_description_tolerates_bad_bodies() {
        assert_eq!(extract_error_description(b""), None);
        assert_eq!(extract_error_description(b"<html>oops</html>"), None);
        assert_eq!(extract_error_description(br#"{"message": "x"}"#), None);
        assert_eq!(extract_error_description(br#"{"error": 42}"#), None);
        assert_eq!(extract_error_description(br#"{"error": null}"#), None);
        assert_eq!(extract_error_description(br#"{"error": ""}"#), None);
        assert_eq!(extract_error_description(b"[1, 2]"), None);
    }

    // ==================== Requests ====================

    #[tokio::test]
    async fn test_request_posts_json_body_to_download_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/download"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "url": VIDEO_URL })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let artifact = client_for(&server)
            .await
            .request_download(VIDEO_URL)
            .await
            .unwrap();
        assert_eq!(&artifact.bytes[..], b"mp4");
    }

    #[tokio::test]
    async fn test_request_uses_content_disposition_filename() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/download"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Disposition", r#"attachment; filename="clip.mp4""#)
                    .set_body_bytes(b"bytes".to_vec()),
            )
            .mount(&server)
            .await;

        let artifact = client_for(&server)
            .await
            .request_download(VIDEO_URL)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "clip.mp4");
    }

    #[tokio::test]
    async fn test_request_without_header_uses_default_filename() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
            .mount(&server)
            .await;

        let artifact = client_for(&server)
            .await
            .request_download(VIDEO_URL)
            .await
            .unwrap();
        assert_eq!(artifact.filename, crate::artifact::DEFAULT_FILENAME);
    }

    #[tokio::test]
    async fn test_request_non_success_surfaces_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "video unavailable" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .request_download(VIDEO_URL)
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::remote(500, "video unavailable"));
    }

    #[tokio::test]
    async fn test_request_non_success_with_empty_body_uses_generic_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .request_download(VIDEO_URL)
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::remote(404, GENERIC_ERROR_DESCRIPTION));
    }

    #[tokio::test]
    async fn test_request_non_success_with_html_body_uses_generic_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<h1>Bad Gateway</h1>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .request_download(VIDEO_URL)
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::remote(502, GENERIC_ERROR_DESCRIPTION));
    }

    #[tokio::test]
    async fn test_request_connection_refused_is_transport_error() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            BackendClient::new(&format!("http://{addr}"), ClientOptions::default()).unwrap();
        let err = client.request_download(VIDEO_URL).await.unwrap_err();
        match err {
            BackendError::Transport { detail } => {
                assert!(detail.contains("/download"), "got {detail}");
                assert!(
                    detail.to_lowercase().contains("refused"),
                    "underlying cause missing: {detail}"
                );
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"slow".to_vec())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let options = ClientOptions {
            request_timeout: Some(Duration::from_millis(200)),
            ..ClientOptions::default()
        };
        let client = BackendClient::new(&server.uri(), options).unwrap();
        let err = client.request_download(VIDEO_URL).await.unwrap_err();
        match err {
            BackendError::Transport { detail } => {
                assert!(detail.contains("timed out"), "got {detail}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_repeated_requests_are_independent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.request_download(VIDEO_URL).await.unwrap();
        client.request_download(VIDEO_URL).await.unwrap();
        // MockServer verifies the expected call count on drop
    }
}
