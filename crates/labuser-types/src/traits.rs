//! Core trait definitions for labuser abstractions.

use std::path::PathBuf;
use crate::credential::Credential;
use crate::errors::Result;

/// Trait for password hashing schemes.
///
/// Implementers turn a plaintext secret into a crypt-style hash the remote
/// account mechanism accepts as-is.
pub trait CredentialHasher {
    /// Hash `secret` with a freshly generated salt.
    ///
    /// Two calls with the same secret must produce different hashes.
    fn hash(&self, secret: &str) -> Result<Credential>;

    /// Check `secret` against a hash previously produced by `hash`.
    fn verify(&self, secret: &str, hash: &str) -> Result<bool>;

    /// Scheme name for log messages (e.g. "bcrypt").
    fn scheme(&self) -> &'static str;
}

/// Trait for the place generated playbooks are kept.
///
/// The validator only reads from it; the pipeline writes each document once,
/// and takes it back out if the run fails after the write.
pub trait PlaybookStore {
    /// Check whether a playbook with this file name already exists.
    fn exists(&self, file_name: &str) -> Result<bool>;

    /// Persist `contents` under `file_name`, returning the full path.
    ///
    /// Implementations must never leave a truncated document visible under
    /// the final name.
    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf>;

    /// Delete a playbook written by `write`. A missing playbook is not an error.
    fn remove(&self, file_name: &str) -> Result<()>;
}

impl<T: CredentialHasher + ?Sized> CredentialHasher for &T {
    fn hash(&self, secret: &str) -> Result<Credential> {
        (**self).hash(secret)
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool> {
        (**self).verify(secret, hash)
    }

    fn scheme(&self) -> &'static str {
        (**self).scheme()
    }
}

impl<T: PlaybookStore + ?Sized> PlaybookStore for &T {
    fn exists(&self, file_name: &str) -> Result<bool> {
        (**self).exists(file_name)
    }

    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        (**self).write(file_name, contents)
    }

    fn remove(&self, file_name: &str) -> Result<()> {
        (**self).remove(file_name)
    }
}
