//! Aggregate storage statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single aggregation bucket: how many files and how many bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBucket {
    /// Number of files in the bucket.
    pub count: u64,
    /// Total bytes in the bucket.
    pub total_size: u64,
}

impl StatsBucket {
    /// Fold one file of the given size into the bucket.
    pub fn add(&mut self, size_bytes: u64) {
        self.count += 1;
        self.total_size += size_bytes;
    }
}

/// Read-side aggregation over the file corpus.
///
/// Computed in a single pass; soft-deleted records are excluded unless the
/// caller explicitly includes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total bytes across all files.
    pub total_size: u64,
    /// Average file size in bytes (0 when empty).
    pub avg_size: u64,
    /// Largest file size in bytes.
    pub max_size: u64,
    /// Smallest file size in bytes.
    pub min_size: u64,
    /// Buckets keyed by lifecycle status.
    pub by_status: BTreeMap<String, StatsBucket>,
    /// Buckets keyed by storage category.
    pub by_category: BTreeMap<String, StatsBucket>,
    /// Buckets keyed by file extension.
    pub by_type: BTreeMap<String, StatsBucket>,
}

impl StorageStats {
    /// Fold one file into the aggregate.
    pub fn observe(&mut self, status: &str, category: &str, extension: &str, size_bytes: u64) {
        self.total_files += 1;
        self.total_size += size_bytes;
        self.max_size = self.max_size.max(size_bytes);
        self.min_size = if self.total_files == 1 {
            size_bytes
        } else {
            self.min_size.min(size_bytes)
        };
        self.avg_size = self.total_size / self.total_files;

        self.by_status
            .entry(status.to_string())
            .or_default()
            .add(size_bytes);
        self.by_category
            .entry(category.to_string())
            .or_default()
            .add(size_bytes);
        self.by_type
            .entry(extension.to_string())
            .or_default()
            .add(size_bytes);
    }
}
