//! Credential value type for registry authentication.

use std::fmt;

/// Username marker used by Docker credential helpers to signal that the
/// secret is an identity/refresh token rather than a password.
const TOKEN_USERNAME: &str = "<token>";

/// A username/secret pair for authenticating with a container registry.
///
/// # Security Notes
///
/// - The `Debug` implementation redacts the secret to prevent accidental
///   credential leakage in logs or error messages.
/// - `PartialEq` is intentionally not implemented to prevent timing
///   attacks when comparing credentials.
#[derive(Clone)]
pub struct Credential {
    username: String,
    secret: String,
}

impl Credential {
    /// Create a credential from a username and secret.
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Credential {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// The username to present to the registry.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The secret (password or token) to present to the registry.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether the secret is an identity token rather than a password.
    ///
    /// Credential helpers store identity tokens under the special username
    /// `<token>`; registries accept such secrets through the token
    /// endpoint rather than basic auth.
    pub fn is_identity_token(&self) -> bool {
        self.username == TOKEN_USERNAME
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let credential = Credential::new("user", "pass");
        assert_eq!(credential.username(), "user");
        assert_eq!(credential.secret(), "pass");
    }

    #[test]
    fn test_identity_token() {
        assert!(Credential::new("<token>", "ey...").is_identity_token());
        assert!(!Credential::new("user", "pass").is_identity_token());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("myuser", "super-secret-password");
        let debug_output = format!("{:?}", credential);
        assert!(
            !debug_output.contains("super-secret-password"),
            "Debug output should not contain the actual secret"
        );
        assert!(
            debug_output.contains("myuser"),
            "Debug output should still show username"
        );
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should show [REDACTED]"
        );
    }
}
