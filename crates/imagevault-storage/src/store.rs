//! Local filesystem store with atomic writes.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rand::RngCore;
use tokio::fs;
use tracing::debug;

use imagevault_core::error::{AppError, ErrorKind};
use imagevault_core::result::AppResult;

/// Size and modification time of a stored file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modification time.
    pub modified_at: Option<DateTime<Utc>>,
}

/// Local filesystem store rooted at a configured directory.
///
/// All operations take root-relative paths. Writes are atomic: bytes land
/// in a temp sibling first and are renamed into place, so a reader can
/// never observe a partially written file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    ///
    /// Rejects any path carrying non-normal components so a hostile
    /// relative path can never escape the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Path '{path}' escapes the storage root"
                    )))
                }
            }
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    ///
    /// `create_dir_all` is idempotent and safe under concurrent creation
    /// of the same shard by multiple writers.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Write bytes to a relative path atomically.
    pub async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        let temp_path = temp_sibling(&full_path);
        fs::write(&temp_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write temp file for: {path}"),
                e,
            )
        })?;

        if let Err(e) = fs::rename(&temp_path, &full_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to move file into place: {path}"),
                e,
            ));
        }

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    /// Read the full contents of a relative path.
    pub async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    /// Delete a file if it exists. Missing files are not an error.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    /// Check whether a relative path exists.
    pub async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        Ok(full_path.exists())
    }

    /// Return size and mtime for a relative path, or `None` if missing.
    pub async fn file_info(&self, path: &str) -> AppResult<Option<FileInfo>> {
        let full_path = self.resolve(path)?;
        match fs::metadata(&full_path).await {
            Ok(meta) => Ok(Some(FileInfo {
                size_bytes: meta.len(),
                modified_at: meta.modified().ok().map(DateTime::<Utc>::from),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to get metadata: {path}"),
                e,
            )),
        }
    }

    /// Remove files under a relative directory whose mtime is older than
    /// the cutoff. Returns the number of files removed.
    pub async fn cleanup_older_than(
        &self,
        dir: &str,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let full_dir = self.resolve(dir)?;
        if !full_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0u64;
        let mut entries = fs::read_dir(&full_dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {dir}"),
                e,
            )
        })?;

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let meta = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta,
                _ => continue,
            };
            let modified = meta.modified().ok().map(DateTime::<Utc>::from);
            if matches!(modified, Some(mtime) if mtime < cutoff) {
                if fs::remove_file(entry.path()).await.is_ok() {
                    removed += 1;
                }
            }
        }

        debug!(dir, removed, "Cleaned up stale files");
        Ok(removed)
    }
}

/// Build a temp-file path next to the target so the final rename stays on
/// one filesystem.
fn temp_sibling(target: &Path) -> PathBuf {
    let mut random = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut random);
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!(".{file_name}.tmp-{}", hex::encode(random)))
}
