//! CLI command implementations.

pub mod add;
pub mod remove;

use labuser_core::GeneratorConfig;
use labuser_playbook::PlaybookSettings;
use labuser_provision::{FsPipeline, FsPlaybookStore, Handoff};

/// Pipeline for the resolved configuration.
pub fn pipeline(config: &GeneratorConfig) -> FsPipeline {
    FsPipeline::standard(
        config.bcrypt_cost,
        FsPlaybookStore::new(&config.output_dir),
        PlaybookSettings {
            login_shell: config.login_shell.clone(),
            admin_group: config.admin_group.clone(),
            home_root: config.home_root.clone(),
        },
        Handoff::new(&config.handoff_path),
    )
}
