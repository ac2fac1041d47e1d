//! Credential retriever construction.
//!
//! The factory builds individually invokable retrieval strategies, each
//! bound to one registry host. Construction performs no I/O; a strategy
//! touches the filesystem or spawns a helper process only when its
//! `retrieve` method runs. The caller owns the chain: it invokes the
//! retrievers it built in its own priority order and decides whether a
//! raised failure aborts the whole resolution.

use crate::credential::Credential;
use crate::docker_config::DockerConfigCredentialRetriever;
use crate::error::{Error, Result};
use crate::helper::{CredentialHelper, CredentialHelperClient, DockerCredentialHelperClient};
use crate::logging::LogSink;
use crate::registry::registry_of;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Executable name prefix shared by all Docker credential helpers.
pub const CREDENTIAL_HELPER_PREFIX: &str = "docker-credential-";

/// Registry-domain suffix to credential-helper suffix, in lookup order.
///
/// Kept as an ordered slice rather than a map so inference over multiple
/// matches is deterministic.
const COMMON_CREDENTIAL_HELPERS: &[(&str, &str)] =
    &[("gcr.io", "gcr"), ("amazonaws.com", "ecr-login")];

/// A single credential retrieval strategy.
///
/// Every strategy is bound to one registry host at construction time;
/// rebinding the factory afterwards does not change retrievers already
/// handed out.
///
/// `Ok(None)` means the strategy has no applicable credential and the
/// caller may try the next one. `Err` means the credential backend itself
/// is broken or misconfigured and resolution should surface that.
pub trait CredentialRetriever {
    /// Attempt to produce a credential for the bound registry.
    fn retrieve(&self) -> Result<Option<Credential>>;
}

/// Builds [`CredentialRetriever`]s for one registry host.
pub struct CredentialRetrieverFactory {
    registry: String,
    log: Arc<dyn LogSink>,
    client: Arc<dyn CredentialHelperClient>,
}

impl CredentialRetrieverFactory {
    /// Create a factory bound to a registry host. No I/O.
    pub fn for_registry(registry: impl Into<String>, log: Arc<dyn LogSink>) -> Self {
        CredentialRetrieverFactory {
            registry: registry.into(),
            log,
            client: Arc::new(DockerCredentialHelperClient),
        }
    }

    /// Create a factory for the registry an image reference names.
    pub fn for_image(image: &str, log: Arc<dyn LogSink>) -> Self {
        Self::for_registry(registry_of(image), log)
    }

    /// Replace the helper transport. Intended for tests or embedders that
    /// run helpers through their own process supervision.
    pub fn with_helper_client(mut self, client: Arc<dyn CredentialHelperClient>) -> Self {
        self.client = client;
        self
    }

    /// Rebind the factory to another registry host.
    ///
    /// Only affects retrievers constructed afterwards; existing
    /// retrievers keep the host captured at their construction.
    pub fn set_registry(&mut self, registry: impl Into<String>) {
        self.registry = registry.into();
    }

    /// The registry host retrievers are currently built for.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// A retriever that always yields `credential`, logging `source` as
    /// its origin. Performs no I/O and never fails.
    pub fn known(
        &self,
        credential: Credential,
        source: impl Into<String>,
    ) -> KnownCredentialRetriever {
        KnownCredentialRetriever {
            credential,
            source: source.into(),
            registry: self.registry.clone(),
            log: Arc::clone(&self.log),
        }
    }

    /// A retriever that asks an explicitly named credential helper, e.g.
    /// `docker-credential-gcr` or `/usr/local/bin/docker-credential-foo`.
    ///
    /// "No entry for this registry" is not-found; a helper that cannot be
    /// located or talked to is a hard failure, because the caller
    /// explicitly asked for it.
    pub fn docker_credential_helper(
        &self,
        helper: impl Into<PathBuf>,
    ) -> DockerCredentialHelperRetriever {
        DockerCredentialHelperRetriever {
            helper: helper.into(),
            registry: self.registry.clone(),
            log: Arc::clone(&self.log),
            client: Arc::clone(&self.client),
        }
    }

    /// A retriever that tries credential helpers inferred from the
    /// registry's domain suffix, e.g. `docker-credential-gcr` for
    /// `us.gcr.io`.
    ///
    /// Candidates are collected here, in table order; a registry may
    /// match several suffixes. An inferred helper missing from the system
    /// is skipped with a warning rather than raised, since the user never
    /// asked for it by name.
    pub fn infer_credential_helper(&self) -> InferredCredentialHelperRetriever {
        let candidates = COMMON_CREDENTIAL_HELPERS
            .iter()
            .filter(|(registry_suffix, _)| self.registry.ends_with(registry_suffix))
            .map(|(_, helper_suffix)| {
                PathBuf::from(format!("{}{}", CREDENTIAL_HELPER_PREFIX, helper_suffix))
            })
            .collect();

        InferredCredentialHelperRetriever {
            candidates,
            registry: self.registry.clone(),
            log: Arc::clone(&self.log),
            client: Arc::clone(&self.client),
        }
    }

    /// A retriever over the default Docker config location.
    pub fn docker_config(&self) -> DockerConfigRetriever {
        DockerConfigRetriever {
            inner: DockerConfigCredentialRetriever::new(self.registry.clone()),
            registry: self.registry.clone(),
            log: Arc::clone(&self.log),
        }
    }

    /// A retriever over a specific Docker config file.
    pub fn docker_config_at(&self, path: impl Into<PathBuf>) -> DockerConfigRetriever {
        DockerConfigRetriever {
            inner: DockerConfigCredentialRetriever::with_path(self.registry.clone(), path),
            registry: self.registry.clone(),
            log: Arc::clone(&self.log),
        }
    }
}

/// Log-friendly name for a helper: the executable file name when the
/// helper was given as a path.
fn helper_display_name(helper: &Path) -> String {
    helper
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| helper.display().to_string())
}

/// Always yields a credential supplied up front.
pub struct KnownCredentialRetriever {
    credential: Credential,
    source: String,
    registry: String,
    log: Arc<dyn LogSink>,
}

impl CredentialRetriever for KnownCredentialRetriever {
    fn retrieve(&self) -> Result<Option<Credential>> {
        self.log
            .info(&format!("Using {} for {}", self.source, self.registry));
        Ok(Some(self.credential.clone()))
    }
}

/// Asks one explicitly named credential helper.
pub struct DockerCredentialHelperRetriever {
    helper: PathBuf,
    registry: String,
    log: Arc<dyn LogSink>,
    client: Arc<dyn CredentialHelperClient>,
}

impl CredentialRetriever for DockerCredentialHelperRetriever {
    fn retrieve(&self) -> Result<Option<Credential>> {
        self.log.info(&format!(
            "Checking credentials from {}",
            self.helper.display()
        ));

        let invoker = CredentialHelper::with_client(
            self.helper.clone(),
            self.registry.clone(),
            Arc::clone(&self.client),
        );

        match invoker.retrieve() {
            Ok(credential) => {
                self.log.info(&format!(
                    "Using {} for {}",
                    helper_display_name(&self.helper),
                    self.registry
                ));
                Ok(Some(credential))
            }
            Err(Error::ServerUrlNotConfigured { .. }) => {
                self.log.info(&format!(
                    "No credentials for {} in {}",
                    self.registry,
                    self.helper.display()
                ));
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Tries helpers inferred from the registry suffix, in fixed order.
pub struct InferredCredentialHelperRetriever {
    candidates: Vec<PathBuf>,
    registry: String,
    log: Arc<dyn LogSink>,
    client: Arc<dyn CredentialHelperClient>,
}

impl CredentialRetriever for InferredCredentialHelperRetriever {
    fn retrieve(&self) -> Result<Option<Credential>> {
        for helper in &self.candidates {
            let invoker = CredentialHelper::with_client(
                helper.clone(),
                self.registry.clone(),
                Arc::clone(&self.client),
            );

            match invoker.retrieve() {
                Ok(credential) => {
                    self.log.info(&format!(
                        "Using {} for {}",
                        helper_display_name(helper),
                        self.registry
                    ));
                    return Ok(Some(credential));
                }
                // An inferred helper the system lacks is skippable; the
                // next candidate may still succeed.
                Err(err @ Error::HelperNotFound { .. }) => {
                    self.log.warn(&err.to_string());
                    if let Error::HelperNotFound {
                        source: Some(cause),
                        ..
                    } = &err
                    {
                        self.log.info(&format!("  Caused by: {}", cause));
                    }
                }
                Err(Error::ServerUrlNotConfigured { helper, registry }) => {
                    self.log
                        .info(&format!("No credentials for {} in {}", registry, helper));
                }
                // Transport-level failures short-circuit the remaining
                // candidates.
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}

/// Looks the registry up in a Docker config file.
///
/// A malformed or unreadable config file is never a hard failure here; it
/// is logged and treated as not-found so later strategies still run.
pub struct DockerConfigRetriever {
    inner: DockerConfigCredentialRetriever,
    registry: String,
    log: Arc<dyn LogSink>,
}

impl CredentialRetriever for DockerConfigRetriever {
    fn retrieve(&self) -> Result<Option<Credential>> {
        match self.inner.retrieve() {
            Ok(Some(credential)) => {
                self.log.info(&format!(
                    "Using credentials from Docker config for {}",
                    self.registry
                ));
                Ok(Some(credential))
            }
            Ok(None) => Ok(None),
            Err(_) => {
                self.log.info("Unable to parse Docker config");
                Ok(None)
            }
        }
    }
}
