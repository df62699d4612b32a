use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Manages the on-disk upload directory.
///
/// Files keep their original name, so two uploads with the same name
/// overwrite each other. No locking on the directory.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Path a stored filename resolves to.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write an uploaded file under its original filename and return the
    /// name it was stored as. Only the final path component of the client
    /// supplied name is used.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let name = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("unusable upload filename: {:?}", original_name))?;

        fs::write(self.dir.join(name), data).await?;
        Ok(name.to_string())
    }
}
