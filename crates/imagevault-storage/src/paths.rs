//! Date-sharded path planning with storage-root containment.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};

use imagevault_core::config::storage::StorageConfig;
use imagevault_core::error::AppError;
use imagevault_core::result::AppResult;
use imagevault_entity::FileCategory;

/// The path forms derived for one stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPaths {
    /// Path relative to the storage root, forward slashes.
    pub relative_path: String,
    /// Absolute path under the storage root.
    pub absolute_path: PathBuf,
    /// Stable root-relative public reference.
    pub public_reference: String,
}

/// Maps a generated storage name plus a category to the sharded layout
/// `<root>/<media_dir>/<category>/<year>/<month>/<storage_name>`.
///
/// Every resolved path is checked to remain a strict descendant of the
/// configured root; anything else is rejected, never clamped.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    root: PathBuf,
    media_dir: String,
}

impl PathPlanner {
    /// Create a planner from the storage configuration.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root_path),
            media_dir: config.media_dir.clone(),
        }
    }

    /// The configured storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The media directory path under the root (e.g. `<root>/images`).
    pub fn media_root(&self) -> PathBuf {
        self.root.join(&self.media_dir)
    }

    /// Plan the paths for a storage name in a category, sharded by the
    /// year and zero-padded month of `now`.
    pub fn plan(
        &self,
        storage_name: &str,
        category: FileCategory,
        now: DateTime<Utc>,
    ) -> AppResult<PlannedPaths> {
        ensure_single_component(storage_name)?;

        let relative_path = format!(
            "{}/{}/{}/{:02}/{}",
            self.media_dir,
            category.as_str(),
            now.year(),
            now.month(),
            storage_name
        );

        let absolute_path = self.absolute_for(&relative_path)?;
        let public_reference = format!("/storage/{relative_path}");

        Ok(PlannedPaths {
            relative_path,
            absolute_path,
            public_reference,
        })
    }

    /// Resolve a stored relative path to an absolute path, enforcing that
    /// the result stays strictly inside the root.
    pub fn absolute_for(&self, relative_path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(relative_path);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Path '{relative_path}' escapes the storage root"
                    )))
                }
            }
        }

        let absolute = self.root.join(relative);
        if !absolute.starts_with(&self.root) || absolute == self.root {
            return Err(AppError::validation(format!(
                "Path '{relative_path}' resolves outside the storage root"
            )));
        }

        Ok(absolute)
    }
}

/// Reject storage names carrying separators or relative components.
fn ensure_single_component(storage_name: &str) -> AppResult<()> {
    let valid = !storage_name.is_empty()
        && !storage_name.contains('/')
        && !storage_name.contains('\\')
        && storage_name != "."
        && storage_name != "..";

    if !valid {
        return Err(AppError::validation(format!(
            "Invalid storage name '{storage_name}'"
        )));
    }
    Ok(())
}
