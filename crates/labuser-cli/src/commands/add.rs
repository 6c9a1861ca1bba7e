//! Generate an add-user playbook.

use crate::cli::AddArgs;
use crate::ui::prompt;
use anyhow::{Context, Result};
use colored::Colorize;
use labuser_core::util::slurp;
use labuser_core::GeneratorConfig;
use labuser_provision::validate_public_key;
use labuser_types::{Operation, ProvisioningRequest, Username};
use tracing::info;

pub fn execute(config: &GeneratorConfig, args: &AddArgs) -> Result<()> {
    let pipeline = super::pipeline(config);

    // A name given on the command line is not re-prompted on conflict.
    let identity = match &args.username {
        Some(name) => {
            let identity = Username::new(name).context("Invalid username")?;
            pipeline.validator().validate(&identity, Operation::Add)?;
            identity
        }
        None => prompt::new_username(pipeline.validator())?,
    };

    let secret = if args.password_stdin {
        prompt::password_from_stdin()?
    } else {
        prompt::new_password()?
    };

    let public_key = match (&args.ssh_key, &args.ssh_key_file) {
        (Some(line), _) => validate_public_key(line).context("Invalid SSH public key")?,
        (None, Some(path)) => {
            let text = slurp(path)
                .with_context(|| format!("Failed to read SSH public key from {}", path.display()))?;
            validate_public_key(text.trim())
                .with_context(|| format!("Invalid SSH public key in {}", path.display()))?
        }
        (None, None) => prompt::public_key()?,
    };

    info!("Generating add playbook for {} ({} key)", identity, public_key.key_type());

    let result = pipeline.execute(ProvisioningRequest::add(identity, secret, public_key))?;

    println!("{} {}", "Generated playbook:".green().bold(), result.file_name);
    info!("Playbook written to {:?}", result.path);

    Ok(())
}
