//! Job posting aggregation and spreadsheet sync engine.
//!
//! Crawls several company career APIs, normalizes every posting into a
//! shared 10-column schema, and mirrors the result into a
//! spreadsheet-backed store. Postings that disappear between runs are
//! appended to a shared Archive tab before the live tab is rewritten.
//!
//! # Design
//!
//! - Each company is an independent [`JobSource`] adapter: a fetch, a
//!   pure posting-to-row mapper, and an optional filter. The shared
//!   engine owns every side effect.
//! - One cycle ends with a **full-replace write**: the tab always
//!   mirrors the latest fetch exactly, with no stale duplicates.
//! - Cycles are sequential and retry-free; an external scheduler
//!   re-runs them and owns retry policy.
//!
//! # Usage
//!
//! ```rust,ignore
//! use jobsync::{run_cycle, KakaoSource, SheetsConfig, SheetsStore};
//!
//! let config = KakaoSource::config();
//! let sheets = SheetsConfig::from_env(&config.spreadsheet_env_var)?;
//! let report = run_cycle(&config, &KakaoSource::new()?, &SheetsStore::new(sheets)?).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (JobSource, TabStore)
//! - [`schema`] - The canonical 10-column row
//! - [`dates`] - Date normalizers for heterogeneous source formats
//! - [`sync`] - Archive manager and the single-cycle orchestrator
//! - [`stores`] - Storage implementations (MemoryStore, SheetsStore)
//! - [`sources`] - Company adapters (Kakao, Naver, Toss, Daangn, Baemin, Coupang)
//! - [`testing`] - Mock implementations for tests

pub mod config;
pub mod dates;
pub mod error;
pub mod schema;
pub mod sources;
pub mod stores;
pub mod sync;
pub mod testing;
pub mod traits;

// Re-export core types at crate root
pub use config::{ServiceAccountKey, SheetsConfig, SourceConfig};
pub use dates::{normalize_compact, normalize_compact_or, normalize_iso, ROLLING};
pub use error::{Result, SyncError};
pub use schema::{collected_now, header_cells, Row, HEADER, POSTING_ID_COLUMN};
pub use sync::{archive_closed, run_cycle, sort_rows, CycleReport};
pub use traits::{
    source::{posting_id, JobSource, Posting},
    store::{Tab, TabStore, ARCHIVE_TAB},
};

// Re-export stores
pub use stores::{MemoryStore, SheetsStore};

// Re-export sources
pub use sources::{
    BaeminSource, CoupangSource, DaangnSource, KakaoSource, NaverSource, TossSource,
};
