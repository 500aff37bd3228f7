//! Single-cycle sync orchestration: fetch, filter, archive, replace.
//!
//! One cycle makes the target tab an exact mirror of the latest fetch.
//! The full-replace write avoids stale duplicates and partial-update
//! drift, at the cost of losing manual edits made to the tab between
//! cycles. Cycles are independent and idempotent at convergence; an
//! external scheduler re-runs them periodically.

use std::collections::HashSet;

use tracing::info;

use crate::config::SourceConfig;
use crate::dates::ROLLING;
use crate::error::Result;
use crate::schema::Row;
use crate::sync::archive::archive_closed;
use crate::traits::source::{posting_id, JobSource};
use crate::traits::store::TabStore;

/// Counters from one completed sync cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Postings returned by the source before filtering.
    pub fetched: usize,

    /// Postings surviving the optional filter.
    pub matched: usize,

    /// Rows moved to the Archive tab.
    pub archived: usize,

    /// Data rows written back to the tab.
    pub written: usize,
}

/// Run one full synchronization cycle for a source.
///
/// Stage order is fixed. Two empty outcomes are distinct: when the
/// source fetches nothing at all the tab is left untouched, but when
/// postings were fetched and the filter drops them all, archival still
/// runs and the tab is cleared to header-only, so an empty result is
/// reflected exactly.
///
/// Any transport, auth, or store error aborts the cycle; no retries and
/// no partial writes after a failure.
pub async fn run_cycle<S, T>(
    config: &SourceConfig,
    source: &S,
    store: &T,
) -> Result<CycleReport>
where
    S: JobSource + ?Sized,
    T: TabStore + ?Sized,
{
    info!(company = %config.company_name, "sync cycle starting");

    let mut report = CycleReport::default();

    let postings = source.fetch().await?;
    report.fetched = postings.len();
    if postings.is_empty() {
        info!(company = %config.company_name, "no postings fetched, tab left untouched");
        return Ok(report);
    }

    let postings = source.filter(postings);
    report.matched = postings.len();

    // Postings without a usable identifier stay out of the active set so
    // they cannot shadow the empty-id guard on existing rows.
    let active_ids: HashSet<String> = postings
        .iter()
        .filter_map(|p| posting_id(p, &config.job_id_field))
        .collect();

    let tab = store.get_or_create_tab(&config.tab_name).await?;
    store.ensure_header(&tab).await?;

    report.archived = archive_closed(store, &tab, &active_ids).await?;
    if report.archived > 0 {
        info!(
            company = %config.company_name,
            archived = report.archived,
            "closed postings moved to the archive tab"
        );
    }

    if postings.is_empty() {
        info!(company = %config.company_name, "no postings matched the filter, tab cleared to header");
        store.write_rows(&tab, &[]).await?;
        return Ok(report);
    }

    let mut rows: Vec<Row> = postings.iter().map(|p| source.to_row(p)).collect();
    sort_rows(&mut rows);

    store.write_rows(&tab, &rows).await?;
    report.written = rows.len();

    info!(
        company = %config.company_name,
        fetched = report.fetched,
        matched = report.matched,
        archived = report.archived,
        written = report.written,
        "sync cycle complete"
    );

    Ok(report)
}

/// Deterministic row order, independent of source-API ordering.
///
/// Company ascending, then opened date newest-first within a company.
/// The rolling sentinel (and an empty opened date) sorts after every
/// real date. The sort is stable, so equal keys keep fetch order.
pub fn sort_rows(rows: &mut [Row]) {
    rows.sort_by(|a, b| {
        a.company
            .cmp(&b.company)
            .then_with(|| opened_sort_key(&b.opened).cmp(&opened_sort_key(&a.opened)))
    });
}

fn opened_sort_key(opened: &str) -> &str {
    // YYYY-MM-DD compares chronologically as a string; the sentinel and
    // blanks collapse to the minimum so descending order puts them last.
    if opened.is_empty() || opened == ROLLING {
        ""
    } else {
        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(company: &str, opened: &str, id: &str) -> Row {
        Row {
            company: company.to_string(),
            opened: opened.to_string(),
            posting_id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_groups_by_company_ascending() {
        let mut rows = vec![
            row("네이버", "2025-01-01", "n1"),
            row("카카오", "2025-01-01", "k1"),
            row("네이버", "2025-02-01", "n2"),
        ];
        sort_rows(&mut rows);

        let companies: Vec<&str> = rows.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, ["네이버", "네이버", "카카오"]);
    }

    #[test]
    fn test_sort_newest_first_within_company() {
        let mut rows = vec![
            row("토스", "2025-01-01", "a"),
            row("토스", "2025-03-01", "b"),
        ];
        sort_rows(&mut rows);

        assert_eq!(rows[0].opened, "2025-03-01");
        assert_eq!(rows[1].opened, "2025-01-01");
    }

    #[test]
    fn test_rolling_sentinel_sorts_after_real_dates() {
        let mut rows = vec![
            row("토스", ROLLING, "a"),
            row("토스", "2020-01-01", "b"),
            row("토스", "", "c"),
        ];
        sort_rows(&mut rows);

        assert_eq!(rows[0].posting_id, "b");
        // Sentinel and blank rank equal; stable sort keeps fetch order
        assert_eq!(rows[1].posting_id, "a");
        assert_eq!(rows[2].posting_id, "c");
    }
}
