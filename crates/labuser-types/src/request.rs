//! Provisioning requests.

use crate::enums::Operation;
use crate::identifiers::{PublicKey, Username};
use std::fmt;
use zeroize::Zeroizing;

/// One user to add or remove.
///
/// The password only exists on the `Add` variant and is wiped from memory
/// when the request is dropped.
#[derive(Clone)]
pub enum ProvisioningRequest {
    /// Create `identity` with a password and an authorized key
    Add {
        /// Account to create
        identity: Username,
        /// Plaintext password, hashed before it reaches the playbook
        secret: Zeroizing<String>,
        /// Key appended to `authorized_keys`
        public_key: PublicKey,
    },
    /// Remove `identity` and its home directory
    Remove {
        /// Account to remove
        identity: Username,
    },
}

impl ProvisioningRequest {
    /// Build an add request.
    pub fn add(identity: Username, secret: impl Into<String>, public_key: PublicKey) -> Self {
        ProvisioningRequest::Add {
            identity,
            secret: Zeroizing::new(secret.into()),
            public_key,
        }
    }

    /// Build a remove request.
    pub fn remove(identity: Username) -> Self {
        ProvisioningRequest::Remove { identity }
    }

    /// The account this request is about.
    pub fn identity(&self) -> &Username {
        match self {
            ProvisioningRequest::Add { identity, .. } => identity,
            ProvisioningRequest::Remove { identity } => identity,
        }
    }

    /// Which playbook variant this request produces.
    pub fn operation(&self) -> Operation {
        match self {
            ProvisioningRequest::Add { .. } => Operation::Add,
            ProvisioningRequest::Remove { .. } => Operation::Remove,
        }
    }

    /// Playbook file name for this request.
    pub fn file_name(&self) -> String {
        self.operation().file_name(self.identity())
    }
}

impl fmt::Debug for ProvisioningRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisioningRequest::Add { identity, public_key, .. } => f
                .debug_struct("Add")
                .field("identity", identity)
                .field("secret", &"<redacted>")
                .field("public_key", &public_key.key_type())
                .finish(),
            ProvisioningRequest::Remove { identity } => {
                f.debug_struct("Remove").field("identity", identity).finish()
            }
        }
    }
}
