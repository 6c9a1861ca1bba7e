//! # labuser Core
//!
//! Configuration management, logging, and shared utilities for the labuser
//! playbook generator.
//!
//! This crate provides:
//!
//! - **Configuration**: layered configuration (defaults, file, environment, CLI)
//!   validated against a JSON schema
//! - **Logging**: `tracing` subscriber setup with pretty, JSON, or compact output
//!   and an optional log file
//! - **Utilities**: YAML loading, deep merging, path expansion
//!
//! ## Example
//!
//! ```no_run
//! use labuser_core::config::GeneratorConfig;
//!
//! let layered = GeneratorConfig::layered(GeneratorConfig::default_path()?)?;
//! let config = GeneratorConfig::from_config(&layered)?;
//! labuser_core::log::init(&config.log, None)?;
//! println!("playbooks go to {}", config.output_dir.display());
//! # Ok::<(), labuser_core::LabUserError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod util;

// Re-export commonly used items
pub use config::{Config, GeneratorConfig};
pub use labuser_types::{LabUserError, Result};

/// labuser application name, the prefix of every labuser log target
pub const APP_NAME: &str = "labuser";
