//! Docker config.json credential lookup.
//!
//! Parses the `auths` section of the Docker client config file
//! (default: `~/.docker/config.json`) and resolves stored entries for a
//! registry host. Entries carry either a base64-encoded
//! `username:password` blob in the `auth` field or plain `username` and
//! `password` fields.

use crate::credential::Credential;
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Parsed `auths` section of a Docker client config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
}

/// One stored auth entry.
#[derive(Debug, Clone, Default, Deserialize)]
struct AuthEntry {
    /// Base64-encoded `username:password`.
    auth: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// Default config location: `$DOCKER_CONFIG/config.json` when set,
/// otherwise `~/.docker/config.json`.
///
/// Returns `None` if neither the environment variable nor a home
/// directory is available.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCKER_CONFIG") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join("config.json"));
        }
    }
    dirs::home_dir().map(|home| home.join(".docker").join("config.json"))
}

impl DockerConfig {
    /// Load a config file.
    ///
    /// Returns `Ok(None)` if the file does not exist. Returns `Err` if the
    /// file exists but cannot be read or is not well-formed JSON.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Some(config))
    }

    /// Look up stored credentials for a registry host.
    ///
    /// Entries are matched by exact host, by `https://<host>`, and for
    /// Docker Hub by the legacy `https://index.docker.io/v1/` key. An
    /// entry whose `auth` blob cannot be decoded contributes nothing.
    pub fn credentials_for(&self, registry: &str) -> Option<Credential> {
        if let Some(credential) = self.auths.get(registry).and_then(AuthEntry::credential) {
            return Some(credential);
        }

        let https_key = format!("https://{}", registry);
        if let Some(credential) = self.auths.get(&https_key).and_then(AuthEntry::credential) {
            return Some(credential);
        }

        if registry == "docker.io" || registry == "registry-1.docker.io" {
            return self
                .auths
                .get("https://index.docker.io/v1/")
                .and_then(AuthEntry::credential);
        }

        None
    }

    /// All registry keys with stored entries.
    pub fn registries(&self) -> Vec<&str> {
        self.auths.keys().map(|k| k.as_str()).collect()
    }
}

impl AuthEntry {
    /// Explicit username/password fields win over the `auth` blob.
    fn credential(&self) -> Option<Credential> {
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            return Some(Credential::new(username, password));
        }

        let auth = self.auth.as_deref()?;
        let decoded = String::from_utf8(BASE64.decode(auth).ok()?).ok()?;
        let (username, secret) = decoded.split_once(':')?;
        Some(Credential::new(username, secret))
    }
}

/// Config-file lookup bound to one registry host.
///
/// A missing file is not-found rather than a failure; only a file that
/// exists but cannot be read or parsed is an error.
#[derive(Debug, Clone)]
pub struct DockerConfigCredentialRetriever {
    registry: String,
    path: Option<PathBuf>,
}

impl DockerConfigCredentialRetriever {
    /// Look up `registry` in the default config location.
    pub fn new(registry: impl Into<String>) -> Self {
        DockerConfigCredentialRetriever {
            registry: registry.into(),
            path: None,
        }
    }

    /// Look up `registry` in a specific config file.
    pub fn with_path(registry: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DockerConfigCredentialRetriever {
            registry: registry.into(),
            path: Some(path.into()),
        }
    }

    /// Resolve the bound registry to a stored credential.
    pub fn retrieve(&self) -> Result<Option<Credential>> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        let Some(config) = DockerConfig::load_from_path(&path)? else {
            return Ok(None);
        };

        Ok(config.credentials_for(&self.registry))
    }
}
