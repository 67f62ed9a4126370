//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::FileCategory;
use super::status::FileStatus;
use super::version::FileVersion;

/// The persistent metadata record for a stored file.
///
/// `relative_path` and `public_reference` are derived from `storage_name`
/// and `category` at store time; the absolute path is always recomputed
/// from the configured storage root, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique record identifier, immutable after creation.
    pub id: Uuid,
    /// Caller-supplied display name. Untrusted, never used in paths.
    pub original_name: String,
    /// System-generated name, unique across the corpus.
    pub storage_name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Declared MIME type.
    pub declared_type: String,
    /// Lowercase extension with leading dot (e.g. `.png`).
    pub extension: String,
    /// SHA-256 content digest (hex), unique across the corpus.
    pub hash: String,
    /// Path relative to the storage root.
    pub relative_path: String,
    /// Stable public-facing reference path.
    pub public_reference: String,
    /// Owner identifier, if any.
    pub owner_id: Option<String>,
    /// Storage category.
    pub category: FileCategory,
    /// Organizational tags (trimmed, deduplicated).
    pub tags: Vec<String>,
    /// Lifecycle status.
    pub status: FileStatus,
    /// Derived-artifact descriptors, append-only.
    pub versions: Vec<FileVersion>,
    /// Number of explicit access-tracking calls.
    pub access_count: u64,
    /// When the file was last accessed, if ever.
    pub last_accessed_at: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Build a new record from creation data.
    ///
    /// The record starts at `Uploaded`: it is only created after the
    /// physical write has completed.
    pub fn new(create: CreateFileRecord) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            original_name: create.original_name,
            storage_name: create.storage_name,
            size_bytes: create.size_bytes,
            declared_type: create.declared_type,
            extension: create.extension,
            hash: create.hash,
            relative_path: create.relative_path,
            public_reference: create.public_reference,
            owner_id: create.owner_id,
            category: create.category,
            tags: normalize_tags(create.tags),
            status: FileStatus::Uploaded,
            versions: Vec::new(),
            access_count: 0,
            last_accessed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// File size in mebibytes, rounded to two decimals.
    pub fn size_in_mb(&self) -> f64 {
        let mb = self.size_bytes as f64 / (1024.0 * 1024.0);
        (mb * 100.0).round() / 100.0
    }

    /// Whether the declared type is an image type.
    pub fn is_image(&self) -> bool {
        self.declared_type.starts_with("image/")
    }

    /// Whether the record is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.status == FileStatus::Deleted
    }

    /// Whether the record carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRecord {
    /// Caller-supplied display name.
    pub original_name: String,
    /// System-generated storage name.
    pub storage_name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Declared MIME type.
    pub declared_type: String,
    /// Lowercase extension with leading dot.
    pub extension: String,
    /// SHA-256 content digest (hex).
    pub hash: String,
    /// Path relative to the storage root.
    pub relative_path: String,
    /// Stable public-facing reference path.
    pub public_reference: String,
    /// Owner identifier, if any.
    pub owner_id: Option<String>,
    /// Storage category.
    pub category: FileCategory,
    /// Organizational tags.
    pub tags: Vec<String>,
}

/// The descriptor returned to callers after a successful store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// The created record's identifier.
    pub id: Uuid,
    /// System-generated storage name.
    pub storage_name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Declared MIME type.
    pub declared_type: String,
    /// SHA-256 content digest (hex).
    pub hash: String,
    /// Path relative to the storage root.
    pub relative_path: String,
    /// Absolute path under the storage root.
    pub absolute_path: std::path::PathBuf,
    /// Stable public-facing reference path.
    pub public_reference: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Trim tags and drop duplicates and empties, preserving first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
