//! Testing utilities including mock implementations.
//!
//! Useful for exercising the sync engine without network calls or a
//! real spreadsheet. The mock source maps a small fixed set of JSON
//! keys to the canonical row so tests can construct postings with
//! `serde_json::json!`.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::schema::Row;
use crate::traits::source::{JobSource, Posting};
use crate::traits::store::{Tab, TabStore};

/// Filter hook type for [`MockSource`].
pub type FilterFn = Box<dyn Fn(Vec<Posting>) -> Vec<Posting> + Send + Sync>;

/// A scripted job source.
///
/// Postings use the flat keys `id`, `company`, `title`, `opened`,
/// `closed`, `url`, `category`, `location` and `employment_type`; all
/// are optional. `collected_at` is fixed for deterministic assertions.
#[derive(Default)]
pub struct MockSource {
    postings: Vec<Posting>,
    filter_fn: Option<FilterFn>,
    fail_fetch: bool,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a posting to the scripted fetch result.
    pub fn with_posting(mut self, posting: Value) -> Self {
        self.postings.push(posting);
        self
    }

    /// Install a filter hook.
    pub fn with_filter(
        mut self,
        filter: impl Fn(Vec<Posting>) -> Vec<Posting> + Send + Sync + 'static,
    ) -> Self {
        self.filter_fn = Some(Box::new(filter));
        self
    }

    /// Make fetch fail with a source API error.
    pub fn failing(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    fn field(posting: &Posting, key: &str) -> String {
        match posting.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

#[async_trait]
impl JobSource for MockSource {
    async fn fetch(&self) -> Result<Vec<Posting>> {
        if self.fail_fetch {
            return Err(SyncError::source_api("mock fetch failure"));
        }
        Ok(self.postings.clone())
    }

    fn to_row(&self, posting: &Posting) -> Row {
        Row {
            company: Self::field(posting, "company"),
            title: Self::field(posting, "title"),
            opened: Self::field(posting, "opened"),
            closed: Self::field(posting, "closed"),
            url: Self::field(posting, "url"),
            category: Self::field(posting, "category"),
            location: Self::field(posting, "location"),
            employment_type: Self::field(posting, "employment_type"),
            posting_id: Self::field(posting, "id"),
            collected_at: "2025-01-01 00:00:00".to_string(),
        }
    }

    fn filter(&self, postings: Vec<Posting>) -> Vec<Posting> {
        match &self.filter_fn {
            Some(f) => f(postings),
            None => postings,
        }
    }
}

/// A store that fails every operation.
///
/// Used to prove that a cycle which should not touch the store really
/// does not (e.g. when the source fetches nothing at all).
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }

    fn refuse<T>(&self, op: &str) -> Result<T> {
        Err(SyncError::store(format!("unexpected store call: {op}")))
    }
}

#[async_trait]
impl TabStore for FailingStore {
    async fn get_or_create_tab(&self, _name: &str) -> Result<Tab> {
        self.refuse("get_or_create_tab")
    }

    async fn ensure_header(&self, _tab: &Tab) -> Result<()> {
        self.refuse("ensure_header")
    }

    async fn read_all_rows(&self, _tab: &Tab) -> Result<Vec<Vec<String>>> {
        self.refuse("read_all_rows")
    }

    async fn write_rows(&self, _tab: &Tab, _rows: &[Row]) -> Result<()> {
        self.refuse("write_rows")
    }

    async fn append_rows(&self, _tab: &Tab, _rows: &[Vec<String>]) -> Result<()> {
        self.refuse("append_rows")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_source_roundtrip() {
        let source = MockSource::new().with_posting(json!({"id": "1", "company": "테스트"}));

        let postings = source.fetch().await.unwrap();
        assert_eq!(postings.len(), 1);

        let row = source.to_row(&postings[0]);
        assert_eq!(row.posting_id, "1");
        assert_eq!(row.company, "테스트");
        assert_eq!(row.to_cells().len(), 10);
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = MockSource::new().failing();
        assert!(source.fetch().await.is_err());
    }
}
