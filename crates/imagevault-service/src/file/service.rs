//! The file storage service — orchestrates validation, hashing, naming,
//! path planning, the durable write, and the metadata record.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use imagevault_core::config::storage::StorageConfig;
use imagevault_core::result::AppResult;
use imagevault_core::types::pagination::{PageRequest, PageResponse};
use imagevault_core::types::sorting::SortField;
use imagevault_entity::{
    CreateFileRecord, FileCategory, FileDescriptor, FileRecord, StorageStats,
};
use imagevault_metadata::{ListQuery, MetadataRepository};
use imagevault_storage::{sha256_hex, LocalStore, PathPlanner, SecureNamer, UploadValidator};

/// Options accompanying a store request.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Caller-supplied display name. Used only for the extension and the
    /// record's `original_name` field, never for paths.
    pub original_name: String,
    /// Owner identifier, if any.
    pub owner_id: Option<String>,
    /// Storage category (defaults to uploads).
    pub category: FileCategory,
    /// Organizational tags.
    pub tags: Vec<String>,
}

impl StoreOptions {
    /// Options with just a display name, defaulting everything else.
    pub fn named(original_name: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            owner_id: None,
            category: FileCategory::default(),
            tags: Vec::new(),
        }
    }
}

/// Orchestrates the full upload pipeline and the record lifecycle.
#[derive(Clone)]
pub struct FileService {
    repo: Arc<dyn MetadataRepository>,
    store: LocalStore,
    validator: UploadValidator,
    namer: SecureNamer,
    planner: PathPlanner,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish()
    }
}

impl FileService {
    /// Create a service over the given configuration and repository,
    /// creating the storage root if needed.
    pub async fn new(
        config: StorageConfig,
        repo: Arc<dyn MetadataRepository>,
    ) -> AppResult<Self> {
        let store = LocalStore::new(&config.root_path).await?;
        let planner = PathPlanner::new(&config);
        Ok(Self {
            repo,
            store,
            validator: UploadValidator::new(config.clone()),
            namer: SecureNamer::new(config),
            planner,
        })
    }

    /// The path planner (shared with the reconciliation sweep).
    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    /// The underlying local store.
    pub fn local_store(&self) -> &LocalStore {
        &self.store
    }

    /// The metadata repository.
    pub fn repository(&self) -> &Arc<dyn MetadataRepository> {
        &self.repo
    }

    pub(crate) fn namer(&self) -> &SecureNamer {
        &self.namer
    }

    /// Store a payload durably and create its metadata record.
    ///
    /// Validation failures are returned before any filesystem work. If the
    /// physical write succeeds but the record create fails (e.g. duplicate
    /// content hash), the freshly written file is logged as an orphan
    /// candidate for the reconciliation sweep and the error is surfaced.
    pub async fn store(
        &self,
        data: Bytes,
        declared_type: &str,
        options: StoreOptions,
    ) -> AppResult<FileDescriptor> {
        self.validator.validate(declared_type, data.len() as u64)?;

        let hash = sha256_hex(&data);
        let storage_name = self
            .namer
            .generate(&options.original_name, options.owner_id.as_deref())?;
        let extension = self.namer.extract_extension(&options.original_name)?;
        let paths = self
            .planner
            .plan(&storage_name, options.category, Utc::now())?;

        self.store.write(&paths.relative_path, data.clone()).await?;

        let create = CreateFileRecord {
            original_name: options.original_name,
            storage_name: storage_name.clone(),
            size_bytes: data.len() as u64,
            declared_type: declared_type.to_string(),
            extension,
            hash,
            relative_path: paths.relative_path.clone(),
            public_reference: paths.public_reference.clone(),
            owner_id: options.owner_id,
            category: options.category,
            tags: options.tags,
        };

        let record = match self.repo.create(create).await {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    path = %paths.relative_path,
                    error = %e,
                    "Physical write succeeded but record create failed; orphan candidate"
                );
                return Err(e);
            }
        };

        info!(
            id = %record.id,
            storage_name = %storage_name,
            size = record.size_bytes,
            category = %record.category,
            "Stored file"
        );

        Ok(FileDescriptor {
            id: record.id,
            storage_name: record.storage_name,
            size_bytes: record.size_bytes,
            declared_type: record.declared_type,
            hash: record.hash,
            relative_path: record.relative_path,
            absolute_path: paths.absolute_path,
            public_reference: record.public_reference,
            created_at: record.created_at,
        })
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: Uuid) -> AppResult<FileRecord> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| imagevault_core::AppError::not_found(format!("File {id} not found")))
    }

    /// Delete a file.
    ///
    /// Non-permanent marks the record deleted and keeps the bytes; it is
    /// only allowed from the settled states (`Uploaded`, `Processed`).
    /// Permanent works from any state and is two-phase: the record is
    /// force-marked deleted so concurrent readers stop returning it, then
    /// dropped, then the version files and primary file are unlinked from
    /// the removed record so a version appended mid-flight is not missed.
    /// A crash between the phases leaves orphan files for the
    /// reconciliation sweep. Missing physical files are tolerated.
    pub async fn delete(&self, id: Uuid, permanent: bool) -> AppResult<()> {
        if !permanent {
            self.repo.soft_delete(id).await?;
            info!(id = %id, "Soft-deleted file");
            return Ok(());
        }

        self.repo.mark_deleted(id).await?;
        let record = self.repo.remove(id).await?;

        for version in &record.versions {
            let relative = relative_from_public(&version.public_reference);
            self.store.delete(&relative).await?;
        }
        self.store.delete(&record.relative_path).await?;

        info!(id = %id, versions = record.versions.len(), "Permanently deleted file");
        Ok(())
    }

    /// List records matching a filter, paginated and sorted.
    pub async fn list(
        &self,
        query: &ListQuery,
        page: &PageRequest,
        sort: &SortField,
    ) -> AppResult<PageResponse<FileRecord>> {
        self.repo.list(query, page, sort).await
    }

    /// Aggregate statistics over the live corpus.
    pub async fn stats(&self) -> AppResult<StorageStats> {
        self.repo.stats(false).await
    }
}

/// Recover the root-relative path from a public reference.
///
/// Public references are always `/storage/<relative_path>`.
pub(crate) fn relative_from_public(public_reference: &str) -> String {
    public_reference
        .strip_prefix("/storage/")
        .unwrap_or(public_reference)
        .to_string()
}
