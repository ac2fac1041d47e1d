//! Error types for registry-creds-rs.
//!
//! "No credential available" is deliberately not an error: retrieval
//! returns `Result<Option<Credential>>`, and `Ok(None)` means the strategy
//! simply does not apply. The variants here cover the conditions where a
//! credential backend itself is broken or misconfigured.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving registry credentials.
#[derive(Error, Debug)]
pub enum Error {
    /// The named credential helper executable cannot be located or started.
    ///
    /// Fatal when the helper was explicitly named by the caller; skippable
    /// when the helper was inferred from the registry suffix.
    #[error("credential helper not found: {helper}")]
    HelperNotFound {
        helper: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The helper executed successfully but has no entry for this registry.
    #[error("no credentials for {registry} in {helper}")]
    ServerUrlNotConfigured { helper: String, registry: String },

    /// I/O failure talking to the helper process, or a malformed protocol
    /// response. Always fatal.
    #[error("credential helper {helper} failed: {message}")]
    HelperTransport {
        helper: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to read a Docker config file that exists.
    #[error("failed to read Docker config {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Docker config file exists but is not well-formed JSON.
    #[error("failed to parse Docker config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

/// Result type alias for registry-creds-rs operations.
pub type Result<T> = std::result::Result<T, Error>;
