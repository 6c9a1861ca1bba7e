//! bcrypt credential hasher.

use bcrypt::Version;
use labuser_types::{Credential, CredentialHasher, LabUserError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

/// Longest password bcrypt takes into account, in bytes.
pub const MAX_SECRET_BYTES: usize = 72;

/// Hashes passwords with bcrypt and a fresh 16-byte salt from the OS.
///
/// The output is a `$2b$` modular-crypt string made only of
/// `[./A-Za-z0-9$]`, so it can be placed in a playbook verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the given work factor.
    ///
    /// The cost is checked when hashing; bcrypt accepts 4 through 31.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    fn fresh_salt() -> Result<[u8; 16]> {
        let mut salt = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| LabUserError::HashingUnavailable(format!("No randomness available: {}", e)))?;
        Ok(salt)
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, secret: &str) -> Result<Credential> {
        let salt = Self::fresh_salt()?;

        let parts = bcrypt::hash_with_salt(secret, self.cost, salt)
            .map_err(|e| LabUserError::HashingUnavailable(format!("Failed to bcrypt hash: {}", e)))?;

        debug!(cost = parts.get_cost(), "Hashed password with bcrypt");
        Ok(Credential::new(
            parts.format_for_version(Version::TwoB),
            parts.get_salt(),
        ))
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(secret, hash)
            .map_err(|e| LabUserError::HashingUnavailable(format!("Failed to verify hash: {}", e)))
    }

    fn scheme(&self) -> &'static str {
        "bcrypt"
    }
}
