//! Collision-resistant storage name generation.

use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};

use imagevault_core::config::storage::StorageConfig;
use imagevault_core::error::AppError;
use imagevault_core::result::AppResult;

/// Generates storage names independent of the caller-supplied file name.
///
/// A name is `{unix_millis}_{infix}{extension}` where the infix is the
/// first 16 hex characters of a SHA-256 over the owner hint, timestamp,
/// and 8 random bytes. The original base name never appears in the output,
/// so hostile names like `"../../etc/passwd.png"` contribute nothing but
/// their extension.
#[derive(Debug, Clone)]
pub struct SecureNamer {
    config: StorageConfig,
}

impl SecureNamer {
    /// Create a namer over the given storage configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Generate a unique storage name, taking only the extension from
    /// `original_name`.
    pub fn generate(&self, original_name: &str, owner_id: Option<&str>) -> AppResult<String> {
        let extension = self.extract_extension(original_name)?;

        let timestamp = Utc::now().timestamp_millis();
        let mut random = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut random);
        let random_hex = hex::encode(random);

        let seed = format!(
            "{}_{timestamp}_{random_hex}",
            owner_id.unwrap_or("anonymous")
        );
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        let infix = hex::encode(hasher.finalize());

        Ok(format!("{timestamp}_{}{extension}", &infix[..16]))
    }

    /// Extract and validate the lowercase extension of an original name.
    pub fn extract_extension(&self, original_name: &str) -> AppResult<String> {
        // Only the final component matters; separators in hostile names are
        // irrelevant because nothing else of the name is kept.
        let base = original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_name);

        let extension = match base.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                format!(".{}", ext.to_lowercase())
            }
            _ => {
                return Err(AppError::validation(format!(
                    "File name '{original_name}' has no extension"
                )))
            }
        };

        if !self.config.is_extension_supported(&extension) {
            return Err(AppError::validation(format!(
                "Unsupported extension '{extension}'. Supported: {}",
                self.config.supported_extensions.join(", ")
            )));
        }

        Ok(extension)
    }
}
