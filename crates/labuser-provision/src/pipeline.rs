//! The generation pipeline: validate, hash, build, render, write, hand off.

use crate::handoff::Handoff;
use crate::validator::RequestValidator;
use labuser_playbook::{render, PlaybookBuilder};
use labuser_types::{CredentialHasher, PlaybookStore, ProvisioningRequest, Result};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    /// Bare playbook file name, as written to the handoff
    pub file_name: String,
    /// Full path of the written playbook
    pub path: PathBuf,
}

/// Runs one provisioning request end to end.
///
/// Stages run strictly in order and any failure stops the run before the
/// handoff is recorded, so the calling process never sees a file name for a
/// playbook that was not fully written. If the handoff itself fails, the
/// playbook just written is removed again.
pub struct ProvisioningPipeline<H, S> {
    hasher: H,
    validator: RequestValidator<S>,
    builder: PlaybookBuilder,
    handoff: Handoff,
}

impl<H: CredentialHasher, S: PlaybookStore> ProvisioningPipeline<H, S> {
    /// Create a pipeline.
    pub fn new(hasher: H, store: S, builder: PlaybookBuilder, handoff: Handoff) -> Self {
        Self {
            hasher,
            validator: RequestValidator::new(store),
            builder,
            handoff,
        }
    }

    /// Validator sharing this pipeline's store.
    pub fn validator(&self) -> &RequestValidator<S> {
        &self.validator
    }

    /// Handoff this pipeline records to.
    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    /// Generate, write, and hand off the playbook for `request`.
    ///
    /// The request is consumed; for additions the plaintext secret is wiped
    /// as soon as it has been hashed.
    #[instrument(skip_all, fields(user = %request.identity(), operation = %request.operation()))]
    pub fn execute(&self, request: ProvisioningRequest) -> Result<PipelineResult> {
        self.validator.validate_request(&request)?;
        info!("Request validated");

        let credential = match &request {
            ProvisioningRequest::Add { secret, .. } => {
                let credential = self.hasher.hash(secret)?;
                info!("Password hashed with {}", self.hasher.scheme());
                Some(credential)
            }
            ProvisioningRequest::Remove { .. } => None,
        };

        let document = self.builder.build(&request, credential.as_ref())?;
        let file_name = request.file_name();
        drop(request);

        let rendered = render(document)?;
        info!("Playbook rendered");

        let store = self.validator.store();
        let path = store.write(&file_name, rendered.as_str())?;

        // Without a handoff the caller never learns of the playbook, and a
        // leftover add playbook would block the retry as a duplicate.
        if let Err(e) = self.handoff.record(&file_name) {
            if let Err(cleanup) = store.remove(&file_name) {
                warn!("Failed to remove {} after handoff failure: {}", file_name, cleanup);
            }
            return Err(e);
        }
        info!("Recorded {} for the caller", file_name);

        Ok(PipelineResult { file_name, path })
    }
}
