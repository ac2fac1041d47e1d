//! Docker credential helper invocation.
//!
//! Implements the client side of the docker-credential-helper protocol:
//! the helper executable is run with the `get` argument, the registry host
//! is written to its stdin, and a JSON `{"Username": ..., "Secret": ...}`
//! document is read back from stdout. A helper that has no entry for the
//! requested host reports that with a well-known message and a non-zero
//! exit, which is classified separately from genuine transport failures.

use crate::credential::Credential;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Messages a helper prints when it holds no entry for the server URL.
const NO_SERVER_URL_MESSAGES: &[&str] = &[
    "credentials not found in native keychain",
    "no credentials server URL",
];

/// Transport seam for executing one credential helper lookup.
///
/// One external process execution per call; no retries, no timeout. Retry
/// and fallback policy live in the caller.
pub trait CredentialHelperClient: Send + Sync {
    /// Run `helper` once for `registry` and return the stored credential.
    fn retrieve(&self, helper: &Path, registry: &str) -> Result<Credential>;
}

/// Wire format of a successful `docker-credential-* get` response.
#[derive(Debug, Deserialize)]
struct HelperResponse {
    #[serde(rename = "Username", default)]
    username: String,
    #[serde(rename = "Secret", default)]
    secret: String,
}

/// [`CredentialHelperClient`] that spawns the helper as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct DockerCredentialHelperClient;

impl DockerCredentialHelperClient {
    /// Resolve a bare helper name on `PATH`; explicit paths pass through.
    fn resolve_executable(helper: &Path) -> Result<PathBuf> {
        if helper.components().count() > 1 {
            return Ok(helper.to_path_buf());
        }
        which::which(helper).map_err(|e| Error::HelperNotFound {
            helper: helper.display().to_string(),
            source: Some(std::io::Error::new(std::io::ErrorKind::NotFound, e)),
        })
    }
}

impl CredentialHelperClient for DockerCredentialHelperClient {
    fn retrieve(&self, helper: &Path, registry: &str) -> Result<Credential> {
        let helper_name = helper.display().to_string();
        let executable = Self::resolve_executable(helper)?;

        let mut child = Command::new(&executable)
            .arg("get")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::HelperNotFound {
                        helper: helper_name.clone(),
                        source: Some(e),
                    }
                } else {
                    Error::HelperTransport {
                        helper: helper_name.clone(),
                        message: "failed to start credential helper".to_string(),
                        source: Some(e),
                    }
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A helper may exit or close stdin before consuming the server
            // URL; the outcome is then classified from its exit status and
            // output, not from the broken pipe.
            if let Err(e) = stdin.write_all(registry.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(Error::HelperTransport {
                        helper: helper_name,
                        message: "failed to write server URL to helper".to_string(),
                        source: Some(e),
                    });
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::HelperTransport {
                helper: helper_name.clone(),
                message: "failed to read helper output".to_string(),
                source: Some(e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            return Err(classify_failure(&helper_name, registry, &stdout));
        }

        parse_response(&helper_name, &stdout)
    }
}

/// Classify a non-zero helper exit: "no entry for this host" is a distinct
/// outcome from a broken helper.
fn classify_failure(helper: &str, registry: &str, stdout: &str) -> Error {
    if NO_SERVER_URL_MESSAGES.iter().any(|m| stdout.contains(m)) {
        return Error::ServerUrlNotConfigured {
            helper: helper.to_string(),
            registry: registry.to_string(),
        };
    }
    Error::HelperTransport {
        helper: helper.to_string(),
        message: format!("helper exited with an error: {}", stdout.trim()),
        source: None,
    }
}

/// Parse the JSON credential document a helper prints on success.
fn parse_response(helper: &str, stdout: &str) -> Result<Credential> {
    let response: HelperResponse =
        serde_json::from_str(stdout).map_err(|e| Error::HelperTransport {
            helper: helper.to_string(),
            message: format!("malformed helper response: {}", e),
            source: None,
        })?;

    if response.username.is_empty() && response.secret.is_empty() {
        return Err(Error::HelperTransport {
            helper: helper.to_string(),
            message: "helper response carries no username or secret".to_string(),
            source: None,
        });
    }

    Ok(Credential::new(response.username, response.secret))
}

/// One helper bound to one registry host.
///
/// Holds its parameters from construction time; `retrieve` executes the
/// external lookup protocol exactly once per call.
#[derive(Clone)]
pub struct CredentialHelper {
    helper: PathBuf,
    registry: String,
    client: Arc<dyn CredentialHelperClient>,
}

impl CredentialHelper {
    /// Bind `helper` to `registry` using the process-spawning client.
    pub fn new(helper: impl Into<PathBuf>, registry: impl Into<String>) -> Self {
        Self::with_client(helper, registry, Arc::new(DockerCredentialHelperClient))
    }

    /// Bind `helper` to `registry` with a caller-supplied client.
    pub fn with_client(
        helper: impl Into<PathBuf>,
        registry: impl Into<String>,
        client: Arc<dyn CredentialHelperClient>,
    ) -> Self {
        CredentialHelper {
            helper: helper.into(),
            registry: registry.into(),
            client,
        }
    }

    /// The helper executable this invoker is bound to.
    pub fn helper(&self) -> &Path {
        &self.helper
    }

    /// Execute the lookup for the bound registry.
    pub fn retrieve(&self) -> Result<Credential> {
        self.client.retrieve(&self.helper, &self.registry)
    }
}
