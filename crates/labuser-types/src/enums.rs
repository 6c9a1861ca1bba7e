//! Common enumerations used throughout labuser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LabUserError, Result};
use crate::identifiers::Username;
use crate::PLAYBOOK_EXTENSION;

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LabUserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(LabUserError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_directive())
    }
}

/// Which playbook variant a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Create the account, its `.ssh` directory, and authorized key
    Add,
    /// Remove the account and its home directory
    Remove,
}

impl Operation {
    /// Playbook file name for `identity`.
    ///
    /// `bob.yml` for additions, `remove_bob.yml` for removals.
    pub fn file_name(&self, identity: &Username) -> String {
        match self {
            Operation::Add => format!("{}.{}", identity, PLAYBOOK_EXTENSION),
            Operation::Remove => format!("remove_{}.{}", identity, PLAYBOOK_EXTENSION),
        }
    }

    /// Title of the single play wrapping the generated document.
    pub fn title(&self) -> &'static str {
        match self {
            Operation::Add => {
                "Create new user with password and SSH key on Linux Support Lab hosts"
            }
            Operation::Remove => "Remove user and home directory from Linux Support Lab hosts",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Remove => write!(f, "remove"),
        }
    }
}

/// Declarative actions a playbook step can perform.
///
/// The names of the runner modules are fixed vocabulary of the downstream
/// runner; labuser only emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Create an account with shell, groups, and a pre-hashed password
    CreateUser,
    /// Ensure a directory exists with owner, group, and mode
    EnsureDirectory,
    /// Append the public key to `authorized_keys` unless the file exists
    AppendAuthorizedKey,
    /// Mark an account absent
    RemoveUser,
    /// Mark the home directory absent
    RemoveHomeDirectory,
}

impl ActionKind {
    /// Runner module implementing this action.
    pub fn module(&self) -> &'static str {
        match self {
            ActionKind::CreateUser | ActionKind::RemoveUser => "user",
            ActionKind::EnsureDirectory | ActionKind::RemoveHomeDirectory => "file",
            ActionKind::AppendAuthorizedKey => "shell",
        }
    }

    /// Parameter rendered as the module's free-form value, if the module takes one.
    ///
    /// Remaining parameters of such a step go under `args`.
    pub fn free_form_param(&self) -> Option<&'static str> {
        match self {
            ActionKind::AppendAuthorizedKey => Some("cmd"),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::CreateUser => write!(f, "create-user"),
            ActionKind::EnsureDirectory => write!(f, "ensure-directory"),
            ActionKind::AppendAuthorizedKey => write!(f, "append-authorized-key"),
            ActionKind::RemoveUser => write!(f, "remove-user"),
            ActionKind::RemoveHomeDirectory => write!(f, "remove-home-directory"),
        }
    }
}
