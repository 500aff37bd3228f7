//! Tabular store trait, the seam to the external spreadsheet.
//!
//! The store is modeled as a set of named tabs, each a 2-D grid of
//! string cells with a fixed header row. Tabs are created on first
//! reference and never deleted; mutation happens through full-replace
//! writes or order-preserving appends.

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::Row;

/// Name of the shared tab holding historically closed rows.
pub const ARCHIVE_TAB: &str = "Archive";

/// Handle to a named tab within the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    name: String,
}

impl Tab {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Spreadsheet-like tabular storage.
///
/// Any authentication or connectivity failure is fatal for the cycle;
/// implementations propagate it instead of retrying, and the engine
/// attempts no further writes after a failure.
#[async_trait]
pub trait TabStore: Send + Sync {
    /// Return the named tab, creating it with the canonical header if
    /// absent. Idempotent.
    async fn get_or_create_tab(&self, name: &str) -> Result<Tab>;

    /// Ensure row 1 is the canonical header, rewriting it only when it
    /// differs. Idempotent.
    async fn ensure_header(&self, tab: &Tab) -> Result<()>;

    /// All rows in order; the first row is the header.
    async fn read_all_rows(&self, tab: &Tab) -> Result<Vec<Vec<String>>>;

    /// Destructive full replace: clear the tab, then write header +
    /// rows in one shot. An empty slice leaves the tab header-only.
    async fn write_rows(&self, tab: &Tab, rows: &[Row]) -> Result<()>;

    /// Non-destructive, order-preserving append of raw cell rows.
    async fn append_rows(&self, tab: &Tab, rows: &[Vec<String>]) -> Result<()>;
}
