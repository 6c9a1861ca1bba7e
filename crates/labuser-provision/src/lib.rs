//! # labuser provision
//!
//! Everything between a validated request and a playbook on disk:
//! - Request validation (duplicate identities, secret confirmation)
//! - Filesystem playbook store with atomic writes
//! - The handoff record read by the calling process
//! - The pipeline tying hashing, building, rendering, and writing together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handoff;
pub mod pipeline;
pub mod store;
pub mod validator;

pub use handoff::Handoff;
pub use pipeline::{PipelineResult, ProvisioningPipeline};
pub use store::FsPlaybookStore;
pub use validator::{confirm_secret, validate_public_key, validate_secret, RequestValidator};

use labuser_playbook::{PlaybookBuilder, PlaybookSettings};
use labuser_secrets::BcryptHasher;

/// Pipeline writing to the filesystem with bcrypt hashing.
pub type FsPipeline = ProvisioningPipeline<BcryptHasher, FsPlaybookStore>;

impl FsPipeline {
    /// Standard pipeline: bcrypt at `cost`, playbooks under `store`.
    pub fn standard(
        cost: u32,
        store: FsPlaybookStore,
        settings: PlaybookSettings,
        handoff: Handoff,
    ) -> Self {
        ProvisioningPipeline::new(
            BcryptHasher::new(cost),
            store,
            PlaybookBuilder::new(settings),
            handoff,
        )
    }
}
