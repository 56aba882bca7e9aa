//! User-Agent string for backend requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/vidfetch";

/// Default User-Agent for backend requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_backend_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("vidfetch/{version} (+{PROJECT_UA_URL})")
}
