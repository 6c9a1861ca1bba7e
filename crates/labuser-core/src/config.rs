//! Configuration management for labuser.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration (YAML)
//! - Environment variable overrides
//! - Programmatic updates (command-line flags)
//! - Schema validation
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Programmatically set values (command-line flags)
//! 2. Environment variables
//! 3. Values loaded from file
//! 4. Default values
//!
//! ## Example
//!
//! ```no_run
//! use labuser_core::config::GeneratorConfig;
//!
//! let mut layered = GeneratorConfig::layered(GeneratorConfig::default_path()?)?;
//! layered.set("output_dir", "/srv/ansible/users")?;
//!
//! let config = GeneratorConfig::from_config(&layered)?;
//! assert_eq!(config.output_dir.to_str(), Some("/srv/ansible/users"));
//! # Ok::<(), labuser_core::LabUserError>(())
//! ```

use crate::util::{data, fs::expand_path};
use labuser_types::config::LogConfig;
use labuser_types::{LabUserError, Result, DEFAULT_HANDOFF_PATH};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values from environment variables
    Environment = 2,
    /// Values set programmatically
    Set = 3,
}

impl ConfigLayer {
    const LOWEST_FIRST: [ConfigLayer; 4] = [
        ConfigLayer::Default,
        ConfigLayer::Loaded,
        ConfigLayer::Environment,
        ConfigLayer::Set,
    ];
}

/// How an environment variable's text is turned into a config value.
#[derive(Debug, Clone, Copy)]
enum EnvKind {
    Text,
    Integer,
}

/// Environment variables recognised by the environment layer.
const ENV_OVERRIDES: &[(&str, &str, EnvKind)] = &[
    ("LABUSER_OUTPUT_DIR", "output_dir", EnvKind::Text),
    ("LABUSER_HANDOFF_PATH", "handoff_path", EnvKind::Text),
    ("LABUSER_BCRYPT_COST", "bcrypt_cost", EnvKind::Integer),
    ("LABUSER_LOG_LEVEL", "log.level", EnvKind::Text),
];

/// Main configuration structure with multi-layer support.
///
/// This is the low-level configuration type. Most callers want
/// [`GeneratorConfig`], which is resolved from it.
#[derive(Clone, Debug, Default)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
    schema: Option<Value>,
}

impl Config {
    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, an empty configuration is created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut layers = HashMap::new();

        if path.exists() {
            let value = data::load_yaml_file(path).map_err(|e| {
                LabUserError::Config(format!("Failed to parse config {}: {}", path.display(), e))
            })?;

            match value {
                Value::Null => {}
                Value::Object(_) => {
                    layers.insert(ConfigLayer::Loaded, value);
                }
                _ => {
                    return Err(LabUserError::Config(format!(
                        "Config file {} must contain a mapping",
                        path.display()
                    )))
                }
            }
            debug!("Loaded configuration from {}", path.display());
        }

        Ok(Self {
            layers,
            schema: None,
        })
    }

    /// Set the default layer.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.layers.insert(ConfigLayer::Default, defaults);
        self
    }

    /// Fill the environment layer using `lookup` to read variables.
    pub fn with_environment<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_layer = Value::Object(Default::default());

        for (var, key, kind) in ENV_OVERRIDES {
            let Some(raw) = lookup(var) else { continue };

            let value = match kind {
                EnvKind::Text => Value::String(raw),
                EnvKind::Integer => {
                    let parsed: u64 = raw.trim().parse().map_err(|_| {
                        LabUserError::Config(format!("{} must be an integer, got '{}'", var, raw))
                    })?;
                    Value::from(parsed)
                }
            };

            debug!("Config key {} overridden by {}", key, var);
            Self::set_value_at_path(&mut env_layer, key, value)?;
        }

        self.layers.insert(ConfigLayer::Environment, env_layer);
        Ok(self)
    }

    /// Fill the environment layer from the process environment.
    pub fn with_process_environment(self) -> Result<Self> {
        self.with_environment(|var| std::env::var(var).ok())
    }

    /// Set validation schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| LabUserError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert(Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)
    }

    /// Get merged data from all layers.
    pub fn merged_data(&self) -> Value {
        let mut merged = Value::Object(serde_json::Map::new());

        for layer in &ConfigLayer::LOWEST_FIRST {
            if let Some(layer_data) = self.layers.get(layer) {
                merged = data::deep_merge(merged, layer_data.clone());
            }
        }

        merged
    }

    /// Validate configuration against schema (if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            let instance = self.merged_data();

            let compiled = jsonschema::JSONSchema::compile(schema)
                .map_err(|e| LabUserError::Config(format!("Invalid schema: {}", e)))?;

            let result = compiled.validate(&instance);
            if let Err(errors) = result {
                let error_msgs: Vec<String> = errors
                    .map(|e| format!("{} (at '{}')", e, e.instance_path))
                    .collect();
                return Err(LabUserError::Config(format!(
                    "Validation failed: {}",
                    error_msgs.join(", ")
                )));
            }
        }
        Ok(())
    }

    // Helper: Set value at dotted path, creating intermediate objects as needed
    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = parts.split_last() else {
            return Err(LabUserError::Config("Empty path".to_string()));
        };

        let mut current = data;
        for part in parents {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            let Value::Object(map) = current else {
                return Err(LabUserError::Bug(format!("Expected object at '{}'", part)));
            };
            current = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }

        match current {
            Value::Object(obj) => {
                obj.insert(last.to_string(), value);
                Ok(())
            }
            _ => Err(LabUserError::Config(format!("Cannot set '{}': parent is not a mapping", path))),
        }
    }
}

/// Resolved generator settings.
///
/// Paths are tilde-expanded by [`GeneratorConfig::from_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory generated playbooks are written to
    pub output_dir: PathBuf,

    /// File receiving the name of the last generated playbook
    pub handoff_path: PathBuf,

    /// Login shell given to new accounts
    pub login_shell: String,

    /// Administrative group new accounts are appended to
    pub admin_group: String,

    /// Parent directory of home directories on the target hosts.
    ///
    /// Interpolated into a remote shell command, so restricted to plain
    /// path characters.
    pub home_root: String,

    /// bcrypt work factor
    pub bcrypt_cost: u32,

    /// Log configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("~/ansible/users"),
            handoff_path: PathBuf::from(DEFAULT_HANDOFF_PATH),
            login_shell: "/bin/bash".to_string(),
            admin_group: "sudo".to_string(),
            home_root: "/home".to_string(),
            bcrypt_cost: 12,
            log: LogConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Build the layered configuration without resolving it.
    ///
    /// Callers apply command-line overrides with [`Config::set`] before
    /// passing the result to [`GeneratorConfig::from_config`].
    pub fn layered(path: impl AsRef<Path>) -> Result<Config> {
        let defaults = serde_json::to_value(Self::default())?;

        Config::load(path)?
            .with_defaults(defaults)
            .with_schema(Self::schema())
            .with_process_environment()
    }

    /// Validate and resolve a layered configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut resolved: GeneratorConfig = serde_json::from_value(config.merged_data())
            .map_err(|e| LabUserError::Config(format!("Failed to parse config: {}", e)))?;

        resolved.output_dir = expand_path(&resolved.output_dir);
        resolved.handoff_path = expand_path(&resolved.handoff_path);
        resolved.log.file = resolved.log.file.map(expand_path);

        Ok(resolved)
    }

    /// Get the default path for the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".labuser").join("config.yml"))
            .ok_or_else(|| LabUserError::Config("Could not determine home directory".to_string()))
    }

    /// JSON schema every merged configuration must satisfy.
    pub fn schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "additionalProperties": false,
            "required": ["output_dir", "handoff_path", "login_shell", "admin_group", "home_root", "bcrypt_cost"],
            "properties": {
                "output_dir": { "type": "string", "minLength": 1 },
                "handoff_path": { "type": "string", "minLength": 1 },
                "login_shell": { "type": "string", "pattern": "^/" },
                "admin_group": { "type": "string", "pattern": "^[a-z_][a-z0-9_-]*$" },
                "home_root": { "type": "string", "pattern": "^/[A-Za-z0-9._/-]*$" },
                "bcrypt_cost": { "type": "integer", "minimum": 4, "maximum": 31 },
                "log": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "level": { "enum": ["error", "warn", "info", "debug", "trace"] },
                        "format": { "enum": ["pretty", "json", "compact"] },
                        "file": { "type": "string", "minLength": 1 }
                    }
                }
            }
        })
    }
}
