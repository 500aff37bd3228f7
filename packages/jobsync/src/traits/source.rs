//! Source adapter trait for pluggable company career APIs.
//!
//! Each company plugs into the sync engine through three capability
//! slots: a required fetch, a required row mapper, and an optional
//! filter. The engine never inspects posting fields itself beyond the
//! identifier named in `SourceConfig`.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::schema::Row;

/// A raw posting as returned by a company API.
///
/// Shape varies per source and is opaque to the sync engine.
pub type Posting = Value;

/// A company career API adapter.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch all postings, handling pagination internally.
    ///
    /// Adapters must raise [`crate::error::SyncError::SourceApi`] when the
    /// upstream signals failure through its envelope (success codes are
    /// compared permissively since some APIs return them as numbers and
    /// others as numeral strings).
    async fn fetch(&self) -> Result<Vec<Posting>>;

    /// Convert one posting into a canonical row.
    ///
    /// Pure and total: no I/O, and any missing field maps to an empty
    /// string rather than an error.
    fn to_row(&self, posting: &Posting) -> Row;

    /// Optional post-fetch filter. The default keeps everything.
    ///
    /// Dropped postings are invisible for the rest of the cycle: they do
    /// not count toward the active-id set and do not appear in the
    /// output, so their rows from a previous cycle become archive
    /// candidates.
    fn filter(&self, postings: Vec<Posting>) -> Vec<Posting> {
        postings
    }
}

/// Normalize a posting identifier to a string.
///
/// APIs are inconsistent about numeric versus string ids; both collapse
/// to their decimal form here so the active-id set has one comparable
/// type. Missing, null, or empty identifiers yield `None` and stay out
/// of the active set. An empty id must never collide with the empty-id
/// guard on archived rows.
pub fn posting_id(posting: &Posting, field: &str) -> Option<String> {
    match posting.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_posting_id_from_string() {
        let posting = json!({"id": "P-1023"});
        assert_eq!(posting_id(&posting, "id"), Some("P-1023".to_string()));
    }

    #[test]
    fn test_posting_id_normalizes_numbers() {
        let posting = json!({"annoId": 30001234});
        assert_eq!(posting_id(&posting, "annoId"), Some("30001234".to_string()));
    }

    #[test]
    fn test_posting_id_rejects_missing_and_empty() {
        assert_eq!(posting_id(&json!({}), "id"), None);
        assert_eq!(posting_id(&json!({"id": ""}), "id"), None);
        assert_eq!(posting_id(&json!({"id": null}), "id"), None);
        assert_eq!(posting_id(&json!({"id": ["nested"]}), "id"), None);
    }
}
