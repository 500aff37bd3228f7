//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::Result;
use crate::schema::{header_cells, Row};
use crate::traits::store::{Tab, TabStore};

/// In-memory tab store.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
pub struct MemoryStore {
    tabs: RwLock<HashMap<String, Vec<Vec<String>>>>,
    header_writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            tabs: RwLock::new(HashMap::new()),
            header_writes: AtomicUsize::new(0),
        }
    }

    /// Number of tabs that exist.
    pub fn tab_count(&self) -> usize {
        self.tabs.read().unwrap().len()
    }

    /// All rows of a tab, header included, if the tab exists.
    pub fn rows(&self, name: &str) -> Option<Vec<Vec<String>>> {
        self.tabs.read().unwrap().get(name).cloned()
    }

    /// Data rows of a tab (header excluded); empty if the tab is absent.
    pub fn data_rows(&self, name: &str) -> Vec<Vec<String>> {
        self.rows(name)
            .map(|rows| rows.into_iter().skip(1).collect())
            .unwrap_or_default()
    }

    /// How many times a header row has actually been (re)written.
    pub fn header_writes(&self) -> usize {
        self.header_writes.load(Ordering::SeqCst)
    }

    /// Seed a tab with raw cell rows, replacing any existing content.
    /// Intended for test setup; no header is added implicitly.
    pub fn seed_tab(&self, name: &str, rows: Vec<Vec<String>>) {
        self.tabs.write().unwrap().insert(name.to_string(), rows);
    }
}

#[async_trait]
impl TabStore for MemoryStore {
    async fn get_or_create_tab(&self, name: &str) -> Result<Tab> {
        let mut tabs = self.tabs.write().unwrap();
        if !tabs.contains_key(name) {
            tabs.insert(name.to_string(), vec![header_cells()]);
            self.header_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(Tab::new(name))
    }

    async fn ensure_header(&self, tab: &Tab) -> Result<()> {
        let mut tabs = self.tabs.write().unwrap();
        let rows = tabs.entry(tab.name().to_string()).or_default();
        if rows.first() != Some(&header_cells()) {
            if rows.is_empty() {
                rows.push(header_cells());
            } else {
                rows[0] = header_cells();
            }
            self.header_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn read_all_rows(&self, tab: &Tab) -> Result<Vec<Vec<String>>> {
        Ok(self
            .tabs
            .read()
            .unwrap()
            .get(tab.name())
            .cloned()
            .unwrap_or_default())
    }

    async fn write_rows(&self, tab: &Tab, rows: &[Row]) -> Result<()> {
        let mut all = vec![header_cells()];
        all.extend(rows.iter().map(Row::to_cells));
        self.tabs
            .write()
            .unwrap()
            .insert(tab.name().to_string(), all);
        self.header_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn append_rows(&self, tab: &Tab, rows: &[Vec<String>]) -> Result<()> {
        let mut tabs = self.tabs.write().unwrap();
        let existing = tabs.entry(tab.name().to_string()).or_default();
        existing.extend(rows.iter().cloned());
        Ok(())
    }
}
