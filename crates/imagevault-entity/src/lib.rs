//! # imagevault-entity
//!
//! Domain entities for ImageVault: the file record, its status lifecycle,
//! storage categories, derived-artifact versions, and aggregate statistics.

pub mod file;
pub mod stats;

pub use file::category::FileCategory;
pub use file::model::{CreateFileRecord, FileDescriptor, FileRecord};
pub use file::status::FileStatus;
pub use file::version::{FileVersion, VersionKind};
pub use stats::{StatsBucket, StorageStats};
