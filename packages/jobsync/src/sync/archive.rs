//! Closed-posting archival.
//!
//! Postings disappear from career APIs when they close. Rather than
//! losing them, rows that are no longer active are appended to a shared
//! append-only Archive tab before the live tab is rewritten.

use std::collections::HashSet;

use crate::error::Result;
use crate::schema::POSTING_ID_COLUMN;
use crate::traits::store::{Tab, TabStore, ARCHIVE_TAB};

/// Append rows whose posting id is no longer active to the Archive tab.
///
/// A data row is closed when its id cell is non-empty and absent from
/// `active_ids`. Rows with a missing or empty id cell are treated as
/// active and never archived; a malformed row must not be silently
/// moved out of the live tab. Closed rows keep their original relative
/// order.
///
/// This function does not remove anything from the source tab; the
/// orchestrator's full-replace write drops the archived rows in the
/// same cycle. Returns the number of rows appended.
pub async fn archive_closed<T>(
    store: &T,
    tab: &Tab,
    active_ids: &HashSet<String>,
) -> Result<usize>
where
    T: TabStore + ?Sized,
{
    let all_rows = store.read_all_rows(tab).await?;
    if all_rows.len() <= 1 {
        // Only header or empty
        return Ok(0);
    }

    let closed: Vec<Vec<String>> = all_rows
        .into_iter()
        .skip(1)
        .filter(|row| match row.get(POSTING_ID_COLUMN) {
            Some(id) if !id.is_empty() => !active_ids.contains(id),
            _ => false,
        })
        .collect();

    if closed.is_empty() {
        return Ok(0);
    }

    let archive = store.get_or_create_tab(ARCHIVE_TAB).await?;
    store.append_rows(&archive, &closed).await?;
    Ok(closed.len())
}
