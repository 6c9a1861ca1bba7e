//! Hashed credentials.

use std::fmt;

/// A salted one-way hash of a password.
///
/// `hash` is a complete modular-crypt string (`$2b$12$<salt><digest>`) that
/// the remote account mechanism accepts as a pre-hashed password. `salt` is
/// kept alongside for inspection; it is already embedded in `hash`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    hash: String,
    salt: String,
}

impl Credential {
    /// Wrap an already computed hash and its salt.
    pub fn new(hash: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            salt: salt.into(),
        }
    }

    /// The crypt-style hash string.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The encoded salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("hash", &"<redacted>")
            .field("salt", &self.salt)
            .finish()
    }
}
