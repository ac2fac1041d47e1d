//! Docker config lookup tests against real files on disk.

use registry_creds_rs::{
    CredentialRetriever, CredentialRetrieverFactory, DockerConfigCredentialRetriever, Error,
    LogSink,
};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct CapturingSink {
    lines: Mutex<Vec<String>>,
}

impl CapturingSink {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for CapturingSink {
    fn info(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

/// Write a config.json into a fresh temp dir and return both.
fn setup_config(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, content).unwrap();
    (temp, path)
}

#[test]
fn test_lookup_finds_matching_entry() {
    // "user:pass" in base64
    let (_temp, path) = setup_config(r#"{"auths": {"ghcr.io": {"auth": "dXNlcjpwYXNz"}}}"#);

    let retriever = DockerConfigCredentialRetriever::with_path("ghcr.io", &path);
    let credential = retriever.retrieve().unwrap().unwrap();
    assert_eq!(credential.username(), "user");
    assert_eq!(credential.secret(), "pass");
}

#[test]
fn test_lookup_without_matching_entry_is_not_found() {
    let (_temp, path) = setup_config(r#"{"auths": {"ghcr.io": {"auth": "dXNlcjpwYXNz"}}}"#);

    let retriever = DockerConfigCredentialRetriever::with_path("quay.io", &path);
    assert!(retriever.retrieve().unwrap().is_none());
}

#[test]
fn test_lookup_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let retriever =
        DockerConfigCredentialRetriever::with_path("ghcr.io", temp.path().join("no-such.json"));
    assert!(retriever.retrieve().unwrap().is_none());
}

#[test]
fn test_lookup_malformed_file_is_parse_error() {
    let (_temp, path) = setup_config("][ definitely not json");

    let retriever = DockerConfigCredentialRetriever::with_path("ghcr.io", &path);
    assert!(matches!(
        retriever.retrieve().unwrap_err(),
        Error::ConfigParse { .. }
    ));
}

#[test]
fn test_factory_retriever_found_entry_logs_source() {
    let (_temp, path) = setup_config(
        r#"{"auths": {"registry.example.com": {"username": "svc", "password": "hunter2"}}}"#,
    );

    let sink = Arc::new(CapturingSink::default());
    let factory =
        CredentialRetrieverFactory::for_registry("registry.example.com", sink.clone());
    let retriever = factory.docker_config_at(&path);

    let credential = retriever.retrieve().unwrap().unwrap();
    assert_eq!(credential.username(), "svc");
    assert_eq!(
        sink.lines(),
        vec!["Using credentials from Docker config for registry.example.com".to_string()]
    );
}

#[test]
fn test_factory_retriever_swallows_parse_failure() {
    let (_temp, path) = setup_config("{broken");

    let sink = Arc::new(CapturingSink::default());
    let factory = CredentialRetrieverFactory::for_registry("ghcr.io", sink.clone());
    let retriever = factory.docker_config_at(&path);

    // Parse failure is a loggable miss for the chain, not a hard failure.
    assert!(retriever.retrieve().unwrap().is_none());
    assert_eq!(sink.lines(), vec!["Unable to parse Docker config".to_string()]);
}

#[test]
fn test_factory_retriever_no_matching_entry_logs_nothing() {
    let (_temp, path) = setup_config(r#"{"auths": {"ghcr.io": {"auth": "dXNlcjpwYXNz"}}}"#);

    let sink = Arc::new(CapturingSink::default());
    let factory = CredentialRetrieverFactory::for_registry("quay.io", sink.clone());
    let retriever = factory.docker_config_at(&path);

    assert!(retriever.retrieve().unwrap().is_none());
    assert!(sink.lines().is_empty());
}

#[test]
fn test_factory_retriever_missing_file_logs_nothing() {
    let temp = TempDir::new().unwrap();

    let sink = Arc::new(CapturingSink::default());
    let factory = CredentialRetrieverFactory::for_registry("ghcr.io", sink.clone());
    let retriever = factory.docker_config_at(temp.path().join("absent.json"));

    assert!(retriever.retrieve().unwrap().is_none());
    assert!(sink.lines().is_empty());
}

#[test]
fn test_default_config_path_points_at_config_json() {
    let path = registry_creds_rs::default_config_path().unwrap();
    assert!(path.ends_with("config.json"));
}
