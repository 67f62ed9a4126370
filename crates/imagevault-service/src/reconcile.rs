//! Orphan reconciliation sweep.
//!
//! A successful physical write whose metadata create fails leaves a file
//! on disk with no record (duplicate content hitting the uniqueness check,
//! or a crash between delete phases). The sweep walks the media tree, diffs physical
//! files against the storage names the repository knows about (primary
//! files plus version artifacts), and reports the difference. Removal is
//! opt-in; scheduling belongs to the caller.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tracing::{info, warn};

use imagevault_core::error::{AppError, ErrorKind};
use imagevault_core::result::AppResult;
use imagevault_core::types::pagination::PageRequest;
use imagevault_core::types::sorting::SortField;
use imagevault_metadata::{ListQuery, MetadataRepository};
use imagevault_storage::{LocalStore, PathPlanner};

/// Walks the physical tree and reports files no record references.
#[derive(Clone)]
pub struct Reconciler {
    repo: Arc<dyn MetadataRepository>,
    store: LocalStore,
    planner: PathPlanner,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish()
    }
}

impl Reconciler {
    /// Create a sweep over the given repository and storage layer.
    pub fn new(
        repo: Arc<dyn MetadataRepository>,
        store: LocalStore,
        planner: PathPlanner,
    ) -> Self {
        Self {
            repo,
            store,
            planner,
        }
    }

    /// Collect every storage name the repository references, including
    /// soft-deleted records (their bytes legitimately remain on disk).
    async fn known_names(&self) -> AppResult<HashSet<String>> {
        let mut known = HashSet::new();
        let query = ListQuery {
            include_deleted: true,
            ..ListQuery::default()
        };
        let sort = SortField::asc("created_at");

        let mut page_number = 1;
        loop {
            let page = self
                .repo
                .list(&query, &PageRequest::new(page_number, 100), &sort)
                .await?;
            for record in &page.items {
                known.insert(record.storage_name.clone());
                for version in &record.versions {
                    known.insert(version.storage_name.clone());
                }
            }
            if !page.has_next {
                break;
            }
            page_number += 1;
        }
        Ok(known)
    }

    /// Scan the media tree and return the relative paths of orphan files.
    pub async fn scan(&self) -> AppResult<Vec<String>> {
        let known = self.known_names().await?;
        let media_root = self.planner.media_root();
        let root = self.planner.root().to_path_buf();

        let mut orphans = Vec::new();
        let mut pending: Vec<PathBuf> = vec![media_root];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to list directory: {}", dir.display()),
                        e,
                    ))
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
            })? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to stat entry", e)
                })?;

                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let name = entry.file_name().to_string_lossy().to_string();
                if known.contains(&name) {
                    continue;
                }

                let relative = path
                    .strip_prefix(&root)
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_else(|_| path.to_string_lossy().to_string());
                warn!(path = %relative, "Found orphan file");
                orphans.push(relative);
            }
        }

        orphans.sort();
        info!(orphans = orphans.len(), "Reconciliation scan complete");
        Ok(orphans)
    }

    /// Scan and unlink every orphan found. Returns the number removed.
    pub async fn remove_orphans(&self) -> AppResult<u64> {
        let orphans = self.scan().await?;
        let mut removed = 0u64;
        for relative in orphans {
            self.store.delete(&relative).await?;
            removed += 1;
        }
        if removed > 0 {
            info!(removed, "Removed orphan files");
        }
        Ok(removed)
    }
}
