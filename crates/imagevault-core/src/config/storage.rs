//! File storage configuration.

use serde::{Deserialize, Serialize};

/// Storage layout and upload limits.
///
/// The storage root, size limit, and allowed types are explicit values
/// injected into the services at construction so tests can run against
/// temporary roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory under which all files live.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Name of the media directory under the root.
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    /// Name of the temporary-files directory under the root.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
    /// Maximum upload size in bytes (default 10 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Allow-listed MIME types for uploads.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    /// Supported file extensions (lowercase, with leading dot).
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
}

impl StorageConfig {
    /// Check whether a MIME type is on the allow-list.
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }

    /// Check whether an extension (lowercase, with leading dot) is supported.
    pub fn is_extension_supported(&self, extension: &str) -> bool {
        self.supported_extensions.iter().any(|e| e == extension)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            media_dir: default_media_dir(),
            temp_dir: default_temp_dir(),
            max_file_size_bytes: default_max_file_size(),
            allowed_types: default_allowed_types(),
            supported_extensions: default_supported_extensions(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_media_dir() -> String {
    "images".to_string()
}

fn default_temp_dir() -> String {
    "temp".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/jpg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_supported_extensions() -> Vec<String> {
    vec![
        ".jpg".to_string(),
        ".jpeg".to_string(),
        ".png".to_string(),
        ".webp".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert!(config.is_type_allowed("image/png"));
        assert!(!config.is_type_allowed("application/pdf"));
        assert!(config.is_extension_supported(".webp"));
        assert!(!config.is_extension_supported(".gif"));
    }
}
