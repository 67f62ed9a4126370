//! The metadata repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use imagevault_core::result::AppResult;
use imagevault_core::types::pagination::{PageRequest, PageResponse};
use imagevault_core::types::sorting::SortField;
use imagevault_entity::{
    CreateFileRecord, FileCategory, FileRecord, FileStatus, FileVersion, StorageStats,
};

use crate::query::ListQuery;

/// Repository for file metadata records.
///
/// The repository owns the record invariants: `hash` and `storage_name`
/// uniqueness is enforced at `create`, and `update_status` rejects any
/// transition the [`FileStatus`] state machine disallows, so no caller can
/// write a status directly.
#[async_trait]
pub trait MetadataRepository: Send + Sync + 'static {
    /// Create a new record. Fails with `Conflict` if the hash or storage
    /// name is already taken; never overwrites.
    async fn create(&self, create: CreateFileRecord) -> AppResult<FileRecord>;

    /// Find a record by its identifier.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>>;

    /// Find a record by its content digest.
    async fn find_by_hash(&self, hash: &str) -> AppResult<Option<FileRecord>>;

    /// Find all live records for an owner, newest first.
    async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<FileRecord>>;

    /// Find all live records in a category, newest first.
    async fn find_by_category(&self, category: FileCategory) -> AppResult<Vec<FileRecord>>;

    /// List records matching a filter, paginated and sorted.
    async fn list(
        &self,
        query: &ListQuery,
        page: &PageRequest,
        sort: &SortField,
    ) -> AppResult<PageResponse<FileRecord>>;

    /// Transition a record to a target status. Fails with
    /// `InvalidTransition` if the state machine disallows it.
    async fn update_status(&self, id: Uuid, target: FileStatus) -> AppResult<FileRecord>;

    /// Append a derived-artifact version to a record. Append-only.
    async fn append_version(&self, id: Uuid, version: FileVersion) -> AppResult<FileRecord>;

    /// Mark a record deleted without removing it. Fails with
    /// `InvalidTransition` unless the record is `Uploaded` or `Processed`.
    async fn soft_delete(&self, id: Uuid) -> AppResult<FileRecord>;

    /// Force-mark a record deleted from any state, bypassing the
    /// transition rule. For the permanent-delete path only, where the
    /// record must stop being served before its files are unlinked.
    async fn mark_deleted(&self, id: Uuid) -> AppResult<FileRecord>;

    /// Remove a record entirely, returning it so the caller can unlink the
    /// physical files it references.
    async fn remove(&self, id: Uuid) -> AppResult<FileRecord>;

    /// Record one explicit access: bump the counter and stamp the time.
    async fn increment_access(&self, id: Uuid) -> AppResult<FileRecord>;

    /// Aggregate statistics over the corpus. Soft-deleted records are
    /// excluded unless `include_deleted` is set.
    async fn stats(&self, include_deleted: bool) -> AppResult<StorageStats>;

    /// Count live records.
    async fn count(&self) -> AppResult<u64>;
}
