//! Credential resolution for container registries.
//!
//! This crate answers one question: what static credential should a
//! registry client present for registry `R` right now? It builds
//! individually invokable retrieval strategies, each bound to one
//! registry host:
//!
//! - a known credential supplied up front,
//! - an explicitly named Docker credential helper,
//! - helpers inferred from the registry's domain suffix
//!   (`docker-credential-gcr` for `*.gcr.io`, `docker-credential-ecr-login`
//!   for `*.amazonaws.com`),
//! - a lookup in the Docker client config (`~/.docker/config.json`).
//!
//! The caller chains the strategies in its own priority order. A strategy
//! that simply does not apply returns `Ok(None)` so the next one can run;
//! only a broken credential backend (an unreachable helper process, a
//! malformed helper response) raises an error.
//!
//! # Quick Start
//!
//! ```no_run
//! use registry_creds_rs::{CredentialRetriever, CredentialRetrieverFactory, TracingSink};
//! use std::sync::Arc;
//!
//! let factory = CredentialRetrieverFactory::for_image(
//!     "gcr.io/my-project/app",
//!     Arc::new(TracingSink),
//! );
//!
//! let chain: Vec<Box<dyn CredentialRetriever>> = vec![
//!     Box::new(factory.infer_credential_helper()),
//!     Box::new(factory.docker_config()),
//! ];
//!
//! for retriever in &chain {
//!     match retriever.retrieve() {
//!         Ok(Some(credential)) => {
//!             println!("authenticating as {}", credential.username());
//!             break;
//!         }
//!         Ok(None) => continue,
//!         Err(err) => panic!("credential backend misconfigured: {err}"),
//!     }
//! }
//! ```
//!
//! # Failure semantics
//!
//! "No credential" and "found a credential" are both ordinary outcomes,
//! logged through the injected [`LogSink`] and surfaced as
//! `Ok(Option<Credential>)`. The error channel is reserved for the
//! conditions in [`Error`]: a helper the caller named that cannot be
//! found, or transport-level trouble talking to a helper process. Inside
//! suffix inference a missing helper is only a warning, because the user
//! never asked for that helper by name.

mod credential;
mod docker_config;
mod error;
mod factory;
mod helper;
mod logging;
pub mod registry;

pub use credential::Credential;
pub use docker_config::{default_config_path, DockerConfig, DockerConfigCredentialRetriever};
pub use error::{Error, Result};
pub use factory::{
    CredentialRetriever, CredentialRetrieverFactory, DockerConfigRetriever,
    DockerCredentialHelperRetriever, InferredCredentialHelperRetriever, KnownCredentialRetriever,
    CREDENTIAL_HELPER_PREFIX,
};
pub use helper::{CredentialHelper, CredentialHelperClient, DockerCredentialHelperClient};
pub use logging::{LogSink, TracingSink};
