//! Filesystem playbook store.

use labuser_types::{LabUserError, PlaybookStore, Result};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Playbooks kept as files in a single directory.
#[derive(Debug, Clone)]
pub struct FsPlaybookStore {
    dir: PathBuf,
}

impl FsPlaybookStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path a playbook named `file_name` lives at.
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    fn check_file_name(&self, file_name: &str) -> Result<()> {
        let plain = Path::new(file_name)
            .file_name()
            .map(|name| name == file_name)
            .unwrap_or(false);

        if plain {
            Ok(())
        } else {
            Err(LabUserError::Bug(format!(
                "Playbook file name is not a plain file name: {:?}",
                file_name
            )))
        }
    }
}

impl PlaybookStore for FsPlaybookStore {
    fn exists(&self, file_name: &str) -> Result<bool> {
        self.check_file_name(file_name)?;
        let path = self.path_of(file_name);

        match path.try_exists() {
            Ok(found) => {
                debug!("Existence probe for {:?}: {}", path, found);
                Ok(found)
            }
            Err(e) => Err(LabUserError::Io(e)),
        }
    }

    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        self.check_file_name(file_name)?;
        let path = self.path_of(file_name);

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| LabUserError::write(&self.dir, e))?;

        // Written beside the target so the final rename stays on one filesystem.
        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| LabUserError::write(&path, e))?;
        temp.write_all(contents.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| LabUserError::write(&path, e))?;
        temp.persist(&path)
            .map_err(|e| LabUserError::write(&path, e.error))?;

        info!("Wrote playbook {:?} ({} bytes)", path, contents.len());
        Ok(path)
    }

    fn remove(&self, file_name: &str) -> Result<()> {
        self.check_file_name(file_name)?;
        let path = self.path_of(file_name);

        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed playbook {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LabUserError::Io(e)),
        }
    }
}
