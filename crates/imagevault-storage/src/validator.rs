//! Upload validation — type allow-list and size limit.

use imagevault_core::config::storage::StorageConfig;
use imagevault_core::error::AppError;
use imagevault_core::result::AppResult;

/// Pure pre-flight check of a declared content type and byte length.
///
/// Runs before any hashing or filesystem work so invalid input never
/// causes I/O.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    config: StorageConfig,
}

impl UploadValidator {
    /// Create a validator over the given storage configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Accept or reject a `(declared_type, size)` pair.
    pub fn validate(&self, declared_type: &str, size_bytes: u64) -> AppResult<()> {
        if !self.config.is_type_allowed(declared_type) {
            return Err(AppError::validation(format!(
                "Unsupported content type '{declared_type}'. Allowed types: {}",
                self.config.allowed_types.join(", ")
            )));
        }

        if size_bytes > self.config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File of {size_bytes} bytes exceeds maximum upload size of {} bytes",
                self.config.max_file_size_bytes
            )));
        }

        Ok(())
    }
}
