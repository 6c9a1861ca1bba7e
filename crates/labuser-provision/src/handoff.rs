//! Side-channel file telling the calling process which playbook was produced.

use labuser_types::{LabUserError, Result, DEFAULT_HANDOFF_PATH};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Handoff record at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    path: PathBuf,
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new(DEFAULT_HANDOFF_PATH)
    }
}

impl Handoff {
    /// Handoff written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the record with `file_name`, without a trailing newline.
    ///
    /// The reader sees either the previous name or the new one, never a
    /// partial write.
    pub fn record(&self, file_name: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| LabUserError::write(&self.path, e))?;
        temp.write_all(file_name.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| LabUserError::write(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| LabUserError::write(&self.path, e.error))?;

        debug!("Recorded {} in {:?}", file_name, self.path);
        Ok(())
    }
}
