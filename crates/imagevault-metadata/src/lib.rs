//! # imagevault-metadata
//!
//! The persistent metadata record store: the [`MetadataRepository`] trait
//! that defines the record lifecycle operations, the list-query types, and
//! an in-memory reference backend.

pub mod memory;
pub mod query;
pub mod repository;

pub use memory::MemoryMetadataRepository;
pub use query::ListQuery;
pub use repository::MetadataRepository;
