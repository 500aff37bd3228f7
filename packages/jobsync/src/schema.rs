//! Canonical 10-column row schema shared by every source.
//!
//! All sources produce rows in this column order, so one tab (and the
//! shared Archive tab) can hold data from heterogeneous APIs. The posting
//! id column is the join key used for archiving and deduplication.

use chrono::Local;

/// Canonical column order. Every tab gets this as row 1.
pub const HEADER: [&str; 10] = [
    "회사",
    "직무명",
    "등록일",
    "마감일",
    "URL",
    "직군",
    "근무지",
    "고용형태",
    "공고ID",
    "수집일시",
];

/// Zero-based column index of 공고ID, the archiving join key.
pub const POSTING_ID_COLUMN: usize = 8;

/// One posting in canonical schema order.
///
/// Fields are plain strings; sources fill missing values with empty
/// strings rather than failing, so a `Row` always maps to exactly ten
/// cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub company: String,
    pub title: String,
    pub opened: String,
    pub closed: String,
    pub url: String,
    pub category: String,
    pub location: String,
    pub employment_type: String,
    pub posting_id: String,
    pub collected_at: String,
}

impl Row {
    /// The row as ordered cells matching [`HEADER`].
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.company.clone(),
            self.title.clone(),
            self.opened.clone(),
            self.closed.clone(),
            self.url.clone(),
            self.category.clone(),
            self.location.clone(),
            self.employment_type.clone(),
            self.posting_id.clone(),
            self.collected_at.clone(),
        ]
    }
}

/// The header row as owned cells.
pub fn header_cells() -> Vec<String> {
    HEADER.iter().map(|s| s.to_string()).collect()
}

/// Collection timestamp for the 수집일시 column.
pub fn collected_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_has_exactly_ten_cells() {
        let cells = Row::default().to_cells();
        assert_eq!(cells.len(), HEADER.len());
        assert_eq!(cells.len(), 10);
    }

    #[test]
    fn test_posting_id_column_matches_header() {
        assert_eq!(HEADER[POSTING_ID_COLUMN], "공고ID");
    }

    #[test]
    fn test_cell_order_matches_header() {
        let row = Row {
            company: "c".into(),
            title: "t".into(),
            opened: "o".into(),
            closed: "x".into(),
            url: "u".into(),
            category: "g".into(),
            location: "l".into(),
            employment_type: "e".into(),
            posting_id: "id".into(),
            collected_at: "now".into(),
        };
        let cells = row.to_cells();
        assert_eq!(cells[0], "c");
        assert_eq!(cells[POSTING_ID_COLUMN], "id");
        assert_eq!(cells[9], "now");
    }
}
