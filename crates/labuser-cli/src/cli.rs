//! CLI structure and command definitions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use labuser_core::GeneratorConfig;
use labuser_types::LogLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labuser")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Ansible playbooks that add or remove Linux Support Lab users", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file [default: ~/.labuser/config.yml]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory generated playbooks are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File receiving the name of the generated playbook
    #[arg(long, global = true, value_name = "FILE")]
    pub handoff: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress output
    #[arg(short, long, global = true, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a playbook creating a user with a password and SSH key
    Add(AddArgs),

    /// Generate a playbook removing a user and their home directory
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Username to create (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// SSH public key line (prompted when omitted)
    #[arg(long, value_name = "KEY", conflicts_with = "ssh_key_file")]
    pub ssh_key: Option<String>,

    /// Read the SSH public key from a file
    #[arg(long, value_name = "FILE")]
    pub ssh_key_file: Option<PathBuf>,

    /// Read the password from the first line of stdin, without confirmation
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Username to remove (prompted when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Skip confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Cli {
    /// Level requested by verbosity flags, if any.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.debug {
            Some(LogLevel::Debug)
        } else if self.verbose {
            Some(LogLevel::Info)
        } else if self.quiet {
            Some(LogLevel::Error)
        } else {
            None
        }
    }

    /// Resolve configuration, with command-line flags as the top layer.
    pub fn load_config(&self) -> Result<GeneratorConfig> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => GeneratorConfig::default_path()?,
        };

        let mut layered = GeneratorConfig::layered(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        if let Some(dir) = &self.output_dir {
            layered.set("output_dir", dir)?;
        }
        if let Some(handoff) = &self.handoff {
            layered.set("handoff_path", handoff)?;
        }

        Ok(GeneratorConfig::from_config(&layered)?)
    }

    pub fn execute(&self) -> Result<()> {
        use crate::commands::*;

        let config = self.load_config()?;
        let _log_guard = labuser_core::log::init(&config.log, self.log_level())?;

        match &self.command {
            Commands::Add(args) => add::execute(&config, args),
            Commands::Remove(args) => remove::execute(&config, args),
        }
    }
}
