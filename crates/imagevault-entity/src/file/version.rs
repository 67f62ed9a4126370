//! Derived-artifact version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of derived artifact attached to a primary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionKind {
    /// A reduced-size preview.
    Thumbnail,
    /// A recompressed copy.
    Compressed,
    /// A copy with a watermark applied.
    Watermarked,
    /// Output of the style-transformation pipeline.
    Styled,
}

impl VersionKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Compressed => "compressed",
            Self::Watermarked => "watermarked",
            Self::Styled => "styled",
        }
    }
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A derived file associated with a primary record. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVersion {
    /// What kind of artifact this is.
    pub kind: VersionKind,
    /// System-generated name of the version file.
    pub storage_name: String,
    /// Stable public reference for the version file.
    pub public_reference: String,
    /// Version file size in bytes.
    pub size_bytes: u64,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

impl FileVersion {
    /// Create a version descriptor stamped with the current time.
    pub fn new(
        kind: VersionKind,
        storage_name: impl Into<String>,
        public_reference: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            kind,
            storage_name: storage_name.into(),
            public_reference: public_reference.into(),
            size_bytes,
            created_at: Utc::now(),
        }
    }
}
