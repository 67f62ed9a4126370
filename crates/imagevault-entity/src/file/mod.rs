//! File entities: record model, status lifecycle, categories, versions.

pub mod category;
pub mod model;
pub mod status;
pub mod version;
