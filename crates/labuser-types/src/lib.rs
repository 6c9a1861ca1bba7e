//! # labuser Types
//!
//! Core types, traits, and enums shared across all labuser crates.
//!
//! This crate provides the fundamental building blocks for the playbook
//! generator, including:
//!
//! - Validated identifiers for usernames and SSH public keys
//! - The provisioning request and the operations it can carry
//! - Common enums for operations, playbook actions, and logging
//! - Seam traits for credential hashing and playbook storage
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use labuser_types::{Operation, Username};
//!
//! let user = Username::new("bob").unwrap();
//! assert_eq!(Operation::Add.file_name(&user), "bob.yml");
//! assert_eq!(Operation::Remove.file_name(&user), "remove_bob.yml");
//!
//! // Invalid names are rejected
//! assert!(Username::new("Bob Smith").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod credential;
pub mod request;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{LabUserError, Result};
pub use identifiers::{PublicKey, Username};
pub use enums::{ActionKind, LogLevel, Operation};
pub use credential::Credential;
pub use request::ProvisioningRequest;
pub use traits::{CredentialHasher, PlaybookStore};

/// File extension used for every generated playbook.
pub const PLAYBOOK_EXTENSION: &str = "yml";

/// File the calling process polls for the name of the last generated playbook.
pub const DEFAULT_HANDOFF_PATH: &str = "/tmp/python_script_output.txt";
