//! In-memory metadata repository.
//!
//! The reference backend: a map guarded by an async `RwLock` with
//! secondary indexes on `hash` and `storage_name` standing in for the
//! unique indexes a relational backend would declare.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use imagevault_core::error::AppError;
use imagevault_core::result::AppResult;
use imagevault_core::types::pagination::{PageRequest, PageResponse};
use imagevault_core::types::sorting::SortField;
use imagevault_entity::{
    CreateFileRecord, FileCategory, FileRecord, FileStatus, FileVersion, StorageStats,
};

use crate::query::{compare_records, ListQuery};
use crate::repository::MetadataRepository;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<Uuid, FileRecord>,
    id_by_hash: HashMap<String, Uuid>,
    id_by_storage_name: HashMap<String, Uuid>,
}

impl Inner {
    fn get_mut(&mut self, id: Uuid) -> AppResult<&mut FileRecord> {
        self.records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File record {id} not found")))
    }
}

/// In-memory implementation of [`MetadataRepository`].
#[derive(Debug, Default)]
pub struct MemoryMetadataRepository {
    inner: RwLock<Inner>,
}

impl MemoryMetadataRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataRepository for MemoryMetadataRepository {
    async fn create(&self, create: CreateFileRecord) -> AppResult<FileRecord> {
        let mut inner = self.inner.write().await;

        if inner.id_by_hash.contains_key(&create.hash) {
            return Err(AppError::conflict(format!(
                "A record with hash {} already exists",
                create.hash
            )));
        }
        if inner.id_by_storage_name.contains_key(&create.storage_name) {
            return Err(AppError::conflict(format!(
                "A record with storage name {} already exists",
                create.storage_name
            )));
        }

        let record = FileRecord::new(create);
        inner.id_by_hash.insert(record.hash.clone(), record.id);
        inner
            .id_by_storage_name
            .insert(record.storage_name.clone(), record.id);
        inner.records.insert(record.id, record.clone());

        debug!(id = %record.id, storage_name = %record.storage_name, "Created file record");
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn find_by_hash(&self, hash: &str) -> AppResult<Option<FileRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .id_by_hash
            .get(hash)
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<FileRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<FileRecord> = inner
            .records
            .values()
            .filter(|r| !r.is_deleted() && r.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find_by_category(&self, category: FileCategory) -> AppResult<Vec<FileRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<FileRecord> = inner
            .records
            .values()
            .filter(|r| !r.is_deleted() && r.category == category)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn list(
        &self,
        query: &ListQuery,
        page: &PageRequest,
        sort: &SortField,
    ) -> AppResult<PageResponse<FileRecord>> {
        let inner = self.inner.read().await;
        let mut matches: Vec<FileRecord> = inner
            .records
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        matches.sort_by(|a, b| compare_records(a, b, sort));

        let total = matches.len() as u64;
        let items: Vec<FileRecord> = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn update_status(&self, id: Uuid, target: FileStatus) -> AppResult<FileRecord> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(id)?;

        if !record.status.can_transition_to(target) {
            return Err(AppError::invalid_transition(format!(
                "Cannot transition file {id} from {} to {target}",
                record.status
            )));
        }

        record.status = target;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn append_version(&self, id: Uuid, version: FileVersion) -> AppResult<FileRecord> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(id)?;
        record.versions.push(version);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<FileRecord> {
        self.update_status(id, FileStatus::Deleted).await
    }

    async fn mark_deleted(&self, id: Uuid) -> AppResult<FileRecord> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(id)?;
        if record.status != FileStatus::Deleted {
            record.status = FileStatus::Deleted;
            record.updated_at = Utc::now();
        }
        Ok(record.clone())
    }

    async fn remove(&self, id: Uuid) -> AppResult<FileRecord> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .remove(&id)
            .ok_or_else(|| AppError::not_found(format!("File record {id} not found")))?;
        inner.id_by_hash.remove(&record.hash);
        inner.id_by_storage_name.remove(&record.storage_name);

        debug!(id = %id, "Removed file record");
        Ok(record)
    }

    async fn increment_access(&self, id: Uuid) -> AppResult<FileRecord> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(id)?;
        record.access_count += 1;
        let now = Utc::now();
        record.last_accessed_at = Some(now);
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn stats(&self, include_deleted: bool) -> AppResult<StorageStats> {
        let inner = self.inner.read().await;
        let mut stats = StorageStats::default();
        for record in inner.records.values() {
            if !include_deleted && record.is_deleted() {
                continue;
            }
            stats.observe(
                record.status.as_str(),
                record.category.as_str(),
                &record.extension,
                record.size_bytes,
            );
        }
        Ok(stats)
    }

    async fn count(&self) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().filter(|r| !r.is_deleted()).count() as u64)
    }
}
