//! Generate a remove-user playbook.

use crate::cli::RemoveArgs;
use crate::ui::prompt;
use anyhow::{Context, Result};
use colored::Colorize;
use labuser_core::GeneratorConfig;
use labuser_types::{ProvisioningRequest, Username};

pub fn execute(config: &GeneratorConfig, args: &RemoveArgs) -> Result<()> {
    let identity = match &args.username {
        Some(name) => Username::new(name).context("Invalid username")?,
        None => prompt::existing_username()?,
    };

    if !args.yes {
        let question = format!(
            "Generate a playbook removing '{}' and their home directory?",
            identity
        );
        if !prompt::confirm(&question)? {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    let result = super::pipeline(config).execute(ProvisioningRequest::remove(identity))?;

    println!("{} {}", "Generated playbook:".green().bold(), result.file_name);

    Ok(())
}
