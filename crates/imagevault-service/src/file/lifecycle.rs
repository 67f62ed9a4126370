//! Processing lifecycle and access tracking.
//!
//! The transformation pipeline itself is external; these calls record its
//! progress against the metadata store and persist the artifacts it hands
//! back.

use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use imagevault_core::result::AppResult;
use imagevault_entity::{FileCategory, FileRecord, FileStatus, FileVersion, VersionKind};

use super::service::FileService;

impl FileService {
    /// Mark a file as picked up by the transformation pipeline.
    pub async fn begin_processing(&self, id: Uuid) -> AppResult<FileRecord> {
        let record = self
            .repository()
            .update_status(id, FileStatus::Processing)
            .await?;
        info!(id = %id, "File entered processing");
        Ok(record)
    }

    /// Persist a derived artifact and mark the file processed.
    ///
    /// The artifact bytes are written under the category matching the
    /// artifact kind, appended to the record's version history, and the
    /// record transitions `Processing -> Processed`.
    pub async fn complete_processing(
        &self,
        id: Uuid,
        kind: VersionKind,
        data: Bytes,
    ) -> AppResult<FileRecord> {
        let record = self.get(id).await?;

        // Refuse up front so a bad state never leaves a stray artifact.
        if !record.status.can_transition_to(FileStatus::Processed) {
            return Err(imagevault_core::AppError::invalid_transition(format!(
                "Cannot complete processing for file {id} in status {}",
                record.status
            )));
        }

        let category = match kind {
            VersionKind::Thumbnail => FileCategory::Thumbnails,
            _ => FileCategory::Processed,
        };

        let storage_name = self
            .namer()
            .generate(&record.original_name, record.owner_id.as_deref())?;
        let paths = self.planner().plan(&storage_name, category, Utc::now())?;

        self.local_store()
            .write(&paths.relative_path, data.clone())
            .await?;

        let version = FileVersion::new(
            kind,
            storage_name,
            paths.public_reference.clone(),
            data.len() as u64,
        );
        self.repository().append_version(id, version).await?;

        let record = self
            .repository()
            .update_status(id, FileStatus::Processed)
            .await?;

        info!(id = %id, kind = %kind, size = data.len(), "Stored processing artifact");
        Ok(record)
    }

    /// Record a transformation failure.
    pub async fn fail_processing(&self, id: Uuid) -> AppResult<FileRecord> {
        let record = self
            .repository()
            .update_status(id, FileStatus::Failed)
            .await?;
        info!(id = %id, "File processing failed");
        Ok(record)
    }

    /// Record one explicit access of a file.
    pub async fn track_access(&self, id: Uuid) -> AppResult<FileRecord> {
        self.repository().increment_access(id).await
    }
}
