//! List-query filtering and in-memory ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use imagevault_core::types::sorting::SortField;
use imagevault_entity::{FileCategory, FileRecord};

/// Filter for listing file records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Only records owned by this identifier.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Only records in this category.
    #[serde(default)]
    pub category: Option<FileCategory>,
    /// Only records carrying every one of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Include soft-deleted records (off by default).
    #[serde(default)]
    pub include_deleted: bool,
}

impl ListQuery {
    /// Check whether a record matches this filter.
    pub fn matches(&self, record: &FileRecord) -> bool {
        if !self.include_deleted && record.is_deleted() {
            return false;
        }
        if let Some(owner) = &self.owner_id {
            if record.owner_id.as_deref() != Some(owner.as_str()) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }
        if !self.tags.iter().all(|tag| record.has_tag(tag)) {
            return false;
        }
        true
    }
}

/// Compare two records by a sort field.
///
/// Recognized fields: `created_at`, `size`, `access_count`,
/// `original_name`. Unrecognized fields fall back to `created_at`.
pub fn compare_records(a: &FileRecord, b: &FileRecord, sort: &SortField) -> Ordering {
    let ascending = match sort.field.as_str() {
        "size" => a.size_bytes.cmp(&b.size_bytes),
        "access_count" => a.access_count.cmp(&b.access_count),
        "original_name" => a.original_name.cmp(&b.original_name),
        _ => a.created_at.cmp(&b.created_at),
    };
    // Tie-break on id so ordering is total and pagination is stable.
    sort.direction.apply(ascending.then_with(|| a.id.cmp(&b.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagevault_entity::{CreateFileRecord, FileStatus};

    fn record(owner: Option<&str>, category: FileCategory, tags: &[&str]) -> FileRecord {
        FileRecord::new(CreateFileRecord {
            original_name: "a.png".to_string(),
            storage_name: uuid::Uuid::new_v4().to_string() + ".png",
            size_bytes: 10,
            declared_type: "image/png".to_string(),
            extension: ".png".to_string(),
            hash: uuid::Uuid::new_v4().to_string(),
            relative_path: "images/uploads/2026/08/a.png".to_string(),
            public_reference: "/storage/images/uploads/2026/08/a.png".to_string(),
            owner_id: owner.map(String::from),
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    #[test]
    fn test_default_query_matches_live_records() {
        let query = ListQuery::default();
        assert!(query.matches(&record(None, FileCategory::Uploads, &[])));
    }

    #[test]
    fn test_deleted_excluded_unless_included() {
        let mut rec = record(None, FileCategory::Uploads, &[]);
        rec.status = FileStatus::Deleted;

        assert!(!ListQuery::default().matches(&rec));
        let include = ListQuery {
            include_deleted: true,
            ..ListQuery::default()
        };
        assert!(include.matches(&rec));
    }

    #[test]
    fn test_owner_category_tag_filters() {
        let rec = record(Some("alice"), FileCategory::Processed, &["styled"]);

        let by_owner = ListQuery {
            owner_id: Some("alice".to_string()),
            ..ListQuery::default()
        };
        assert!(by_owner.matches(&rec));

        let wrong_owner = ListQuery {
            owner_id: Some("bob".to_string()),
            ..ListQuery::default()
        };
        assert!(!wrong_owner.matches(&rec));

        let by_category = ListQuery {
            category: Some(FileCategory::Processed),
            ..ListQuery::default()
        };
        assert!(by_category.matches(&rec));

        let by_tag = ListQuery {
            tags: vec!["styled".to_string()],
            ..ListQuery::default()
        };
        assert!(by_tag.matches(&rec));

        let missing_tag = ListQuery {
            tags: vec!["styled".to_string(), "raw".to_string()],
            ..ListQuery::default()
        };
        assert!(!missing_tag.matches(&rec));
    }

    #[test]
    fn test_compare_by_size() {
        let mut small = record(None, FileCategory::Uploads, &[]);
        small.size_bytes = 1;
        let mut large = record(None, FileCategory::Uploads, &[]);
        large.size_bytes = 100;

        let asc = SortField::asc("size");
        assert_eq!(compare_records(&small, &large, &asc), Ordering::Less);
        let desc = SortField::desc("size");
        assert_eq!(compare_records(&small, &large, &desc), Ordering::Greater);
    }
}
