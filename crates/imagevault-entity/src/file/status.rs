//! File status enumeration and lifecycle rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a stored file.
///
/// Transitions are restricted: `Deleted` is terminal, and `Failed` may only
/// move to `Deleted` (retry means creating a new record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Bytes are being received; no durable write has completed yet.
    Uploading,
    /// Physical write and metadata record are both persisted.
    Uploaded,
    /// An external transformation pipeline is working on the file.
    Processing,
    /// A transformation artifact has been stored as a version.
    Processed,
    /// The transformation pipeline reported an error.
    Failed,
    /// Soft-deleted; excluded from default listings and statistics.
    Deleted,
}

impl FileStatus {
    /// Check whether a transition from `self` to `target` is allowed.
    ///
    /// Soft deletion is only reachable from the settled states
    /// (`Uploaded`, `Processed`); permanent deletion marks a record
    /// deleted from any live state, outside this rule.
    pub fn can_transition_to(&self, target: FileStatus) -> bool {
        match (self, target) {
            (Self::Uploading, Self::Uploaded) => true,
            (Self::Uploaded, Self::Processing) => true,
            (Self::Processing, Self::Processed) => true,
            (Self::Processing, Self::Failed) => true,
            (Self::Uploaded, Self::Deleted) => true,
            (Self::Processed, Self::Deleted) => true,
            _ => false,
        }
    }

    /// Check if the status is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Deleted)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
