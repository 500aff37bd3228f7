//! End-to-end sync cycle tests over the in-memory store.

use serde_json::json;

use jobsync::testing::{FailingStore, MockSource};
use jobsync::{
    header_cells, run_cycle, MemoryStore, SourceConfig, SyncError, TabStore, ARCHIVE_TAB,
    POSTING_ID_COLUMN,
};

fn config() -> SourceConfig {
    SourceConfig::new("테스트", "테스트", "TEST_SPREADSHEET_ID", "id")
}

/// Seed the target tab with data rows the way a previous cycle would
/// have left them.
async fn seed_previous_cycle(store: &MemoryStore, ids: &[&str]) {
    let tab = store.get_or_create_tab("테스트").await.unwrap();
    let rows: Vec<Vec<String>> = ids
        .iter()
        .map(|id| {
            let mut row = vec![String::new(); 10];
            row[0] = "테스트".to_string();
            row[POSTING_ID_COLUMN] = id.to_string();
            row
        })
        .collect();
    store.append_rows(&tab, &rows).await.unwrap();
}

#[tokio::test]
async fn full_replace_mirrors_the_latest_fetch() {
    let store = MemoryStore::new();
    seed_previous_cycle(&store, &["old-1", "keep-2"]).await;

    let source = MockSource::new()
        .with_posting(json!({"id": "keep-2", "company": "테스트", "opened": "2025-01-01"}))
        .with_posting(json!({"id": "new-3", "company": "테스트", "opened": "2025-03-01"}));

    let report = run_cycle(&config(), &source, &store).await.unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.matched, 2);
    assert_eq!(report.archived, 1);
    assert_eq!(report.written, 2);

    // Tab data corresponds 1:1 with the fetch, no leftovers
    let data = store.data_rows("테스트");
    let ids: Vec<&str> = data.iter().map(|r| r[POSTING_ID_COLUMN].as_str()).collect();
    assert_eq!(ids, ["new-3", "keep-2"]); // newest first within the company

    // The disappeared posting landed in the archive
    let archived = store.data_rows(ARCHIVE_TAB);
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0][POSTING_ID_COLUMN], "old-1");
}

#[tokio::test]
async fn rerunning_a_cycle_converges() {
    let store = MemoryStore::new();
    let source = MockSource::new()
        .with_posting(json!({"id": "1", "company": "a"}))
        .with_posting(json!({"id": "2", "company": "b"}));

    let first = run_cycle(&config(), &source, &store).await.unwrap();
    let after_first = store.rows("테스트").unwrap();

    let second = run_cycle(&config(), &source, &store).await.unwrap();

    assert_eq!(first.written, 2);
    assert_eq!(second.written, 2);
    assert_eq!(second.archived, 0);
    assert_eq!(store.rows("테스트").unwrap(), after_first);
    assert_eq!(store.rows(ARCHIVE_TAB), None);
}

#[tokio::test]
async fn nothing_fetched_leaves_the_store_untouched() {
    // FailingStore errors on any call, so success proves zero store I/O
    let store = FailingStore::new();
    let source = MockSource::new();

    let report = run_cycle(&config(), &source, &store).await.unwrap();

    assert_eq!(report.fetched, 0);
    assert_eq!(report.archived, 0);
    assert_eq!(report.written, 0);
}

#[tokio::test]
async fn all_filtered_out_archives_then_clears_to_header() {
    let store = MemoryStore::new();
    seed_previous_cycle(&store, &["1", "2", "3"]).await;

    let source = MockSource::new()
        .with_posting(json!({"id": "1"}))
        .with_posting(json!({"id": "2"}))
        .with_posting(json!({"id": "3"}))
        .with_filter(|_| Vec::new());

    let report = run_cycle(&config(), &source, &store).await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.matched, 0);
    // Empty active-id set: every tracked row became an archive candidate
    assert_eq!(report.archived, 3);
    assert_eq!(report.written, 0);

    assert_eq!(store.rows("테스트").unwrap(), vec![header_cells()]);
    assert_eq!(store.data_rows(ARCHIVE_TAB).len(), 3);
}

#[tokio::test]
async fn filtered_postings_become_archive_candidates() {
    let store = MemoryStore::new();
    seed_previous_cycle(&store, &["stays", "now-filtered"]).await;

    let source = MockSource::new()
        .with_posting(json!({"id": "stays", "category": "Sales"}))
        .with_posting(json!({"id": "now-filtered", "category": "Engineering"}))
        .with_filter(|postings| {
            postings
                .into_iter()
                .filter(|p| p["category"] == "Sales")
                .collect()
        });

    let report = run_cycle(&config(), &source, &store).await.unwrap();

    assert_eq!(report.matched, 1);
    assert_eq!(report.archived, 1);
    let archived = store.data_rows(ARCHIVE_TAB);
    assert_eq!(archived[0][POSTING_ID_COLUMN], "now-filtered");
}

#[tokio::test]
async fn postings_without_ids_do_not_protect_existing_rows() {
    let store = MemoryStore::new();
    seed_previous_cycle(&store, &["tracked"]).await;

    // The fetched posting has no usable id, so it contributes nothing
    // to the active set and the old row is archived.
    let source = MockSource::new().with_posting(json!({"company": "테스트"}));

    let report = run_cycle(&config(), &source, &store).await.unwrap();

    assert_eq!(report.archived, 1);
    assert_eq!(report.written, 1);
    assert_eq!(store.data_rows(ARCHIVE_TAB)[0][POSTING_ID_COLUMN], "tracked");
}

#[tokio::test]
async fn rows_are_sorted_by_company_then_newest_opened() {
    let store = MemoryStore::new();
    let source = MockSource::new()
        .with_posting(json!({"id": "1", "company": "나회사", "opened": "2025-01-01"}))
        .with_posting(json!({"id": "2", "company": "가회사", "opened": "2025-01-01"}))
        .with_posting(json!({"id": "3", "company": "가회사", "opened": "상시채용"}))
        .with_posting(json!({"id": "4", "company": "가회사", "opened": "2025-03-01"}));

    run_cycle(&config(), &source, &store).await.unwrap();

    // 가회사 group first (company ascending), newest first within it,
    // the rolling sentinel last; 나회사 follows
    let data = store.data_rows("테스트");
    let ids: Vec<&str> = data.iter().map(|r| r[POSTING_ID_COLUMN].as_str()).collect();
    assert_eq!(ids, ["4", "2", "3", "1"]);
}

#[tokio::test]
async fn fetch_failure_aborts_before_any_store_call() {
    let store = FailingStore::new();
    let source = MockSource::new().failing();

    let err = run_cycle(&config(), &source, &store).await.unwrap_err();
    assert!(matches!(err, SyncError::SourceApi { .. }));
}

#[tokio::test]
async fn store_failure_propagates() {
    let store = FailingStore::new();
    let source = MockSource::new().with_posting(json!({"id": "1"}));

    let err = run_cycle(&config(), &source, &store).await.unwrap_err();
    assert!(matches!(err, SyncError::Store { .. }));
}
