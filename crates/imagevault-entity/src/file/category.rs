//! Storage category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed classification of a file's role, driving its storage path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// User-submitted files (the default).
    Uploads,
    /// Outputs of the transformation pipeline.
    Processed,
    /// Preserved originals.
    Original,
    /// Generated thumbnails.
    Thumbnails,
    /// Short-lived files subject to the cleanup sweep.
    Temp,
}

impl FileCategory {
    /// Return the category as its directory-name string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploads => "uploads",
            Self::Processed => "processed",
            Self::Original => "original",
            Self::Thumbnails => "thumbnails",
            Self::Temp => "temp",
        }
    }

    /// All categories, in directory-layout order.
    pub fn all() -> [FileCategory; 5] {
        [
            Self::Uploads,
            Self::Processed,
            Self::Original,
            Self::Thumbnails,
            Self::Temp,
        ]
    }
}

impl Default for FileCategory {
    fn default() -> Self {
        Self::Uploads
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploads" => Ok(Self::Uploads),
            "processed" => Ok(Self::Processed),
            "original" => Ok(Self::Original),
            "thumbnails" => Ok(Self::Thumbnails),
            "temp" => Ok(Self::Temp),
            other => Err(format!("unknown file category: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for category in FileCategory::all() {
            assert_eq!(category.as_str().parse::<FileCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_unknown_rejected() {
        assert!("videos".parse::<FileCategory>().is_err());
    }
}
