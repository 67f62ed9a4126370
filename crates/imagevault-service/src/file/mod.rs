//! File orchestration: the store pipeline and the processing lifecycle.

pub mod lifecycle;
pub mod service;
