//! # imagevault-storage
//!
//! The physical storage layer: upload validation, content hashing, secure
//! name generation, date-sharded path planning, and atomic local writes.

pub mod hash;
pub mod naming;
pub mod paths;
pub mod store;
pub mod validator;

pub use hash::sha256_hex;
pub use naming::SecureNamer;
pub use paths::{PathPlanner, PlannedPaths};
pub use store::{FileInfo, LocalStore};
pub use validator::UploadValidator;
