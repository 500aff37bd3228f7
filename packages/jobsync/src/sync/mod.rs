//! Synchronization engine: archival plus the single-cycle orchestrator.

pub mod archive;
pub mod engine;

pub use archive::archive_closed;
pub use engine::{run_cycle, sort_rows, CycleReport};
