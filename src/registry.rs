//! Registry host extraction from image references.
//!
//! An image reference like `ghcr.io/owner/repo:tag` names both a registry
//! and a repository; credential resolution only cares about the registry
//! host.

/// The registry assumed when an image reference names none.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Extract the registry host (with port, if any) from an image reference.
///
/// # Examples
///
/// ```
/// use registry_creds_rs::registry::registry_of;
///
/// assert_eq!(registry_of("ubuntu:latest"), "docker.io");
/// assert_eq!(registry_of("ghcr.io/owner/repo:tag"), "ghcr.io");
/// assert_eq!(registry_of("localhost:5000/image"), "localhost:5000");
/// ```
pub fn registry_of(image: &str) -> String {
    // Digests never affect the registry part.
    let name = image.split('@').next().unwrap_or(image);

    // The first path component is a registry host only if it looks like
    // one; "library/ubuntu" is a Docker Hub repository, not a host.
    match name.split_once('/') {
        Some((first, _)) if first.contains('.') || first.contains(':') || first == "localhost" => {
            first.to_string()
        }
        _ => DEFAULT_REGISTRY.to_string(),
    }
}
