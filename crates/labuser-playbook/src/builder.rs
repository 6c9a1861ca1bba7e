//! Playbook builder: maps a provisioning request onto an ordered list of steps.

use super::types::{PlaybookDocument, Step};
use labuser_types::{
    ActionKind, Credential, LabUserError, Operation, ProvisioningRequest, PublicKey, Result,
    Username,
};
use tracing::debug;

/// Variable holding the account name in add playbooks.
pub const VAR_NEW_USERNAME: &str = "new_username";
/// Variable holding the password hash in add playbooks.
pub const VAR_NEW_USER_PASSWORD: &str = "new_user_password";
/// Variable holding the SSH public key in add playbooks.
pub const VAR_PUBLIC_SSH_KEY: &str = "users_public_ssh_key";
/// Variable holding the account name in remove playbooks.
pub const VAR_USERNAME: &str = "username";

/// Host-side settings baked into generated steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybookSettings {
    /// Login shell for new accounts
    pub login_shell: String,
    /// Group new accounts are appended to
    pub admin_group: String,
    /// Parent of home directories
    pub home_root: String,
}

impl Default for PlaybookSettings {
    fn default() -> Self {
        Self {
            login_shell: "/bin/bash".to_string(),
            admin_group: "sudo".to_string(),
            home_root: "/home".to_string(),
        }
    }
}

/// `{{ name }}` reference to a playbook variable.
pub fn placeholder(var: &str) -> String {
    format!("{{{{ {} }}}}", var)
}

/// Builds playbook documents for add and remove requests.
///
/// Steps never contain the identity, hash, or key literally; they reference
/// the document's variables through placeholders.
#[derive(Debug, Clone, Default)]
pub struct PlaybookBuilder {
    settings: PlaybookSettings,
}

impl PlaybookBuilder {
    /// Create a builder with the given host settings.
    pub fn new(settings: PlaybookSettings) -> Self {
        Self { settings }
    }

    /// Build the document for `request`.
    ///
    /// Add requests need the credential hashed from the request's secret.
    pub fn build(
        &self,
        request: &ProvisioningRequest,
        credential: Option<&Credential>,
    ) -> Result<PlaybookDocument> {
        let document = match request {
            ProvisioningRequest::Add { identity, public_key, .. } => {
                let credential = credential.ok_or_else(|| {
                    LabUserError::Validation(format!(
                        "Cannot build add playbook for '{}' without a hashed password",
                        identity
                    ))
                })?;
                self.add_user(identity, credential, public_key)
            }
            ProvisioningRequest::Remove { identity } => self.remove_user(identity),
        };

        debug!(
            operation = %document.operation,
            steps = document.steps.len(),
            "Built playbook document"
        );
        Ok(document)
    }

    /// Create account, then `.ssh`, then `authorized_keys`.
    pub fn add_user(
        &self,
        identity: &Username,
        credential: &Credential,
        public_key: &PublicKey,
    ) -> PlaybookDocument {
        let user = placeholder(VAR_NEW_USERNAME);
        let ssh_dir = format!("{}/.ssh", self.home_of(&user));
        let authorized_keys = format!("{}/authorized_keys", ssh_dir);

        PlaybookDocument::new(Operation::Add)
            .var(VAR_NEW_USERNAME, identity.as_str())
            .var(VAR_NEW_USER_PASSWORD, credential.hash())
            .var(VAR_PUBLIC_SSH_KEY, public_key.as_str())
            .step(
                Step::new("Create new user", ActionKind::CreateUser)
                    .param("name", user.as_str())
                    .param("password", placeholder(VAR_NEW_USER_PASSWORD))
                    .param("shell", self.settings.login_shell.as_str())
                    .param("groups", self.settings.admin_group.as_str())
                    .param("append", true),
            )
            .step(
                Step::new("Ensure .ssh directory exists", ActionKind::EnsureDirectory)
                    .param("path", ssh_dir.as_str())
                    .param("state", "directory")
                    .param("owner", user.as_str())
                    .param("group", user.as_str())
                    .param("mode", "0700"),
            )
            .step(
                // Guarded by `creates`: once the file exists the step is skipped,
                // even if the key has changed since.
                Step::new(
                    "Set authorized key for SSH access using shell command",
                    ActionKind::AppendAuthorizedKey,
                )
                .param(
                    "cmd",
                    format!(
                        "echo '{}' >> {}",
                        placeholder(VAR_PUBLIC_SSH_KEY),
                        authorized_keys
                    ),
                )
                .param("creates", authorized_keys.as_str()),
            )
    }

    /// Remove account, then its home directory.
    pub fn remove_user(&self, identity: &Username) -> PlaybookDocument {
        let user = placeholder(VAR_USERNAME);

        PlaybookDocument::new(Operation::Remove)
            .var(VAR_USERNAME, identity.as_str())
            .step(
                Step::new("Remove user", ActionKind::RemoveUser)
                    .param("name", user.as_str())
                    .param("state", "absent"),
            )
            .step(
                Step::new("Remove user home directory", ActionKind::RemoveHomeDirectory)
                    .param("path", self.home_of(&user))
                    .param("state", "absent"),
            )
    }

    fn home_of(&self, user: &str) -> String {
        format!("{}/{}", self.settings.home_root.trim_end_matches('/'), user)
    }
}
