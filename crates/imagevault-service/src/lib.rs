//! # imagevault-service
//!
//! Orchestration layer: the [`FileService`] pipeline (validate → hash →
//! name → plan → write → record), deletion, listing, statistics, the
//! processing lifecycle, and the orphan reconciliation sweep.

pub mod file;
pub mod reconcile;

pub use file::service::{FileService, StoreOptions};
pub use reconcile::Reconciler;
