//! Type-safe identifiers for provisioning input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LabUserError, Result};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_-]*$").expect("username pattern is valid"));

static BASE64_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").expect("base64 pattern is valid"));

/// Key types accepted in an `authorized_keys` line.
pub const SUPPORTED_KEY_TYPES: &[&str] = &[
    "ssh-rsa",
    "ssh-dss",
    "ssh-ed25519",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
    "sk-ssh-ed25519@openssh.com",
    "sk-ecdsa-sha2-nistp256@openssh.com",
];

/// A validated Linux account name.
///
/// Usernames must:
/// - Be between 1 and 32 characters long
/// - Start with a lowercase letter or underscore
/// - Contain only lowercase letters, digits, underscores, and hyphens
///
/// The same value is used as a file name component, so these rules also
/// keep path separators out of generated file names.
///
/// # Example
///
/// ```
/// use labuser_types::Username;
///
/// let user = Username::new("alice").unwrap();
/// assert_eq!(user.as_str(), "alice");
///
/// assert!(Username::new("").is_err());
/// assert!(Username::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Longest name `useradd` accepts.
    pub const MAX_LEN: usize = 32;

    /// Create a new validated username.
    ///
    /// # Errors
    ///
    /// Returns `LabUserError::Validation` if the name doesn't meet the rules above.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if !Self::is_valid(name) {
            return Err(LabUserError::Validation(format!(
                "Invalid username '{}': must be 1-{} characters of lowercase letters, digits, \
                underscores, and hyphens, starting with a letter or underscore",
                name,
                Self::MAX_LEN
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Check if a name is valid without allocating.
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty() && name.len() <= Self::MAX_LEN && USERNAME_RE.is_match(name)
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Username {
    type Err = LabUserError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Username {
    type Error = LabUserError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// A single-line OpenSSH public key, as pasted into `authorized_keys`.
///
/// The key is later embedded in a single-quoted shell argument, so quotes
/// and control characters are refused outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    line: String,
}

impl PublicKey {
    /// Parse and validate a public key line.
    pub fn new(line: impl AsRef<str>) -> Result<Self> {
        let line = line.as_ref().trim();

        if line.is_empty() {
            return Err(LabUserError::Validation("SSH public key is empty".to_string()));
        }
        if line.chars().any(char::is_control) {
            return Err(LabUserError::Validation(
                "SSH public key must be a single line without control characters".to_string(),
            ));
        }
        if line.contains('\'') {
            return Err(LabUserError::Validation(
                "SSH public key must not contain single quotes".to_string(),
            ));
        }

        let mut fields = line.split_whitespace();
        let key_type = fields.next().unwrap_or_default();
        if !SUPPORTED_KEY_TYPES.contains(&key_type) {
            return Err(LabUserError::Validation(format!(
                "Unsupported SSH key type '{}'; expected one of: {}",
                key_type,
                SUPPORTED_KEY_TYPES.join(", ")
            )));
        }

        match fields.next() {
            Some(blob) if BASE64_RE.is_match(blob) => {}
            _ => {
                return Err(LabUserError::Validation(
                    "SSH public key is missing its base64 key data".to_string(),
                ))
            }
        }

        Ok(Self { line: line.to_string() })
    }

    /// Key algorithm, e.g. `ssh-ed25519`.
    pub fn key_type(&self) -> &str {
        self.line.split_whitespace().next().unwrap_or_default()
    }

    /// Trailing comment, usually `user@host`.
    pub fn comment(&self) -> Option<String> {
        let rest: Vec<&str> = self.line.split_whitespace().skip(2).collect();
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }

    /// The full key line.
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)
    }
}

impl FromStr for PublicKey {
    type Err = LabUserError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ED25519: &str =
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIGw8lDHcrvRr4mUhp1fJ0XKqZ3t5e3D0o2mVw0bN8w1Q bob@host";

    #[test]
    fn test_username_validation() {
        assert!(Username::new("alice").is_ok());
        assert!(Username::new("_svc").is_ok());
        assert!(Username::new("dev-ops_2").is_ok());

        assert!(Username::new("").is_err());
        assert!(Username::new("Alice").is_err());
        assert!(Username::new("1alice").is_err());
        assert!(Username::new("-alice").is_err());
        assert!(Username::new("al ice").is_err());
        assert!(Username::new("al/ice").is_err());
        assert!(Username::new("a".repeat(33)).is_err());
    }

    #[test]
    fn test_username_trims_surrounding_whitespace() {
        let user = Username::new("  bob\n").unwrap();
        assert_eq!(user.as_str(), "bob");
    }

    #[test]
    fn test_username_serde_is_transparent() {
        let user: Username = serde_json::from_str("\"carol\"").unwrap();
        assert_eq!(user.to_string(), "carol");
        assert!(serde_json::from_str::<Username>("\"Carol\"").is_err());
    }

    #[test]
    fn test_public_key_parsing() {
        let key = PublicKey::new(ED25519).unwrap();
        assert_eq!(key.key_type(), "ssh-ed25519");
        assert_eq!(key.comment().as_deref(), Some("bob@host"));

        let bare = PublicKey::new("ssh-rsa AAAAB3NzaC1yc2E=").unwrap();
        assert_eq!(bare.comment(), None);
    }

    #[test]
    fn test_public_key_rejections() {
        assert!(PublicKey::new("").is_err());
        assert!(PublicKey::new("ssh-foo AAAA bob@host").is_err());
        assert!(PublicKey::new("ssh-ed25519").is_err());
        assert!(PublicKey::new("ssh-ed25519 not*base64").is_err());
        assert!(PublicKey::new("ssh-ed25519 AAAA bob'; rm -rf /").is_err());
        assert!(PublicKey::new("ssh-ed25519 AAAA\nssh-rsa BBBB").is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_usernames_accepted(name in "[a-z_][a-z0-9_-]{0,31}") {
            prop_assert!(Username::new(&name).is_ok());
        }

        #[test]
        fn prop_names_with_separators_rejected(
            head in "[a-z]{1,8}",
            sep in prop::sample::select(vec!['/', '.', ' ', ':', '\\']),
            tail in "[a-z]{1,8}",
        ) {
            let name = format!("{}{}{}", head, sep, tail);
            prop_assert!(Username::new(&name).is_err());
        }
    }
}
