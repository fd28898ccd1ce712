// Managed upload directory: recipe images keyed by filename

use crate::error::{Error, Result};
use crate::utils::sanitize::secure_filename;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open the upload directory, creating it if it doesn't exist
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a sanitized form of `filename`.
    /// Returns the name the file was actually stored as. An existing file
    /// with the same name is replaced.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let safe = secure_filename(filename);
        if safe.is_empty() {
            return Err(Error::Validation(format!(
                "Unusable upload filename: {filename:?}"
            )));
        }

        tokio::fs::write(self.root.join(&safe), bytes).await?;
        debug!("Stored upload {} ({} bytes)", safe, bytes.len());

        Ok(safe)
    }

    /// Remove a stored file; a missing file is not an error
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let safe = secure_filename(filename);
        if safe.is_empty() {
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(safe)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
