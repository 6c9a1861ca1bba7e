//! Request validation.
//!
//! Checks run before any hashing or writing happens. Only the existence probe
//! touches the store, and it never modifies it.

use labuser_secrets::hasher::MAX_SECRET_BYTES;
use labuser_types::{
    LabUserError, Operation, PlaybookStore, ProvisioningRequest, PublicKey, Result, Username,
};
use tracing::debug;

/// Validates identities and secrets against a playbook store.
#[derive(Debug, Clone)]
pub struct RequestValidator<S> {
    store: S,
}

impl<S: PlaybookStore> RequestValidator<S> {
    /// Validator probing `store` for existing playbooks.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Check `identity` may be used for `operation`.
    ///
    /// Adding fails with `DuplicateIdentity` when an add playbook for the
    /// identity already exists. Removal is always allowed.
    pub fn validate(&self, identity: &Username, operation: Operation) -> Result<()> {
        match operation {
            Operation::Add => {
                let file_name = operation.file_name(identity);
                if self.store.exists(&file_name)? {
                    debug!("Playbook {} already exists", file_name);
                    return Err(LabUserError::DuplicateIdentity(identity.to_string()));
                }
                Ok(())
            }
            Operation::Remove => Ok(()),
        }
    }

    /// Validate a complete request.
    pub fn validate_request(&self, request: &ProvisioningRequest) -> Result<()> {
        if let ProvisioningRequest::Add { secret, .. } = request {
            validate_secret(secret)?;
        }
        self.validate(request.identity(), request.operation())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Check the confirmation matches the secret.
pub fn confirm_secret(secret: &str, confirmation: &str) -> Result<()> {
    if secret == confirmation {
        Ok(())
    } else {
        Err(LabUserError::SecretMismatch)
    }
}

/// Check a secret can be hashed without silent truncation.
pub fn validate_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(LabUserError::Validation("Password cannot be empty".to_string()));
    }
    if secret.len() > MAX_SECRET_BYTES {
        return Err(LabUserError::Validation(format!(
            "Password is {} bytes long; at most {} bytes are supported",
            secret.len(),
            MAX_SECRET_BYTES
        )));
    }
    Ok(())
}

/// Parse a single-line SSH public key.
pub fn validate_public_key(line: &str) -> Result<PublicKey> {
    PublicKey::new(line)
}
