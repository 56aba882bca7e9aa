//! Constants for the backend client.

/// Path of the download endpoint, appended to the backend base URL.
pub const DOWNLOAD_PATH: &str = "/download";

/// Description used when a failure response carries no usable `error` field.
pub const GENERIC_ERROR_DESCRIPTION: &str = "Unknown error";
