//! Error types for labuser operations.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labuser operations.
///
/// The first five variants form the generation pipeline's taxonomy.
/// `SecretMismatch` and `DuplicateIdentity` are recoverable: the input
/// collaborator re-prompts. Everything else aborts the invocation.
#[derive(Error, Debug)]
pub enum LabUserError {
    /// A playbook for this identity has already been generated
    #[error("A user with the name '{0}' already exists. Please choose a different username.")]
    DuplicateIdentity(String),

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    SecretMismatch,

    /// The hashing primitive or its randomness source failed
    #[error("Password hashing unavailable: {0}")]
    HashingUnavailable(String),

    /// A value cannot be represented safely in the playbook
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The playbook or handoff file could not be written
    #[error("Failed to write {}: {reason}", path.display())]
    Write {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error. Please report it to the lab infrastructure team.")]
    Bug(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl LabUserError {
    /// Build a write error for `path`.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LabUserError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the input collaborator should ask again instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LabUserError::SecretMismatch | LabUserError::DuplicateIdentity(_)
        )
    }
}

/// A specialized Result type for labuser operations.
pub type Result<T> = std::result::Result<T, LabUserError>;

/// Helper macro to create and return a LabUserError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation and indicate a bug in labuser itself.
///
/// # Example
///
/// ```ignore
/// if some_impossible_condition {
///     bug!("This should never happen: {:?}", condition);
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::LabUserError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LabUserError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a LabUserError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Validation, "Invalid key: {}", reason);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LabUserError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LabUserError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::LabUserError::Other($msg.to_string()))
    };
}
