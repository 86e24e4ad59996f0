//! Blob storage under the public download directory.

use std::path::{Path, PathBuf};

use {chrono::Local, tracing::debug, uuid::Uuid};

use crate::error::{Error, Result};

/// Saved blob inside the download directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub name: String,
}

/// Writes blobs into a directory served at `{base_url}/downloaded/`.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    base_url: String,
}

impl ContentStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Create the backing directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::storage(format!("create {}", self.root.display()), e))
    }

    /// Persist a blob under a name unique per call.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> Result<StoredFile> {
        let name = unique_name(extension);
        let path = self.root.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Error::storage(format!("write {}", path.display()), e))?;
        debug!(name, size = bytes.len(), "content stored");
        Ok(StoredFile { path, name })
    }

    /// Path for a file derived from `stored`, e.g. the preview frame of a
    /// video. Nothing is written; the transform produces the file.
    #[must_use]
    pub fn derived(&self, stored: &StoredFile, suffix: &str, extension: &str) -> StoredFile {
        let stem = stored
            .name
            .rsplit_once('.')
            .map_or(stored.name.as_str(), |(stem, _)| stem);
        let name = format!("{stem}-{suffix}.{extension}");
        StoredFile {
            path: self.root.join(&name),
            name,
        }
    }

    /// Public URL for a stored file name.
    #[must_use]
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/downloaded/{name}", self.base_url)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// `{local timestamp}-{uuid}.{ext}`. The UUID alone guarantees
/// uniqueness; the timestamp keeps directory listings scannable.
fn unique_name(extension: &str) -> String {
    format!(
        "{}-{}.{}",
        Local::now().format("%Y%m%d-%H%M%S"),
        Uuid::new_v4(),
        extension
    )
}
