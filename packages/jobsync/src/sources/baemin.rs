//! Baemin (Woowahan Brothers) job source (career.woowahan.com).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::config::SourceConfig;
use crate::dates::ROLLING;
use crate::error::{Result, SyncError};
use crate::schema::{collected_now, Row};
use crate::sources::{expect_success, http_client, str_field, text};
use crate::traits::source::{JobSource, Posting};

const API_URL: &str = "https://career.woowahan.com/w1/recruits";

// Fixed query: Business & Sales 직군, 정규직
const JOB_GROUP_CODES: &str = "BA005010";
const EMPLOYMENT_TYPE_CODES: &str = "BA002001";

// The API returns 403 without a browser-like User-Agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct BaeminSource {
    client: Client,
}

impl BaeminSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }

    pub fn config() -> SourceConfig {
        SourceConfig::new("배민", "배민", "BAEMIN_SPREADSHEET_ID", "recruitNumber")
    }
}

/// Success is code 2000, compared as a string because the API returns
/// it inconsistently as int or string across versions.
fn check_envelope(data: &Value) -> Result<()> {
    if text(data, "code") != "2000" {
        return Err(SyncError::source_api(format!(
            "baemin API request failed: {}",
            text(data, "message")
        )));
    }
    Ok(())
}

/// Baemin dates come as `YYYY-MM-DD...` strings (with hyphens, unlike
/// the compact normalizer's input). Years 9999 and 2999 are the API's
/// own sentinels for 상시채용.
fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    if raw.starts_with("9999") || raw.starts_with("2999") {
        return ROLLING.to_string();
    }
    let prefix = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[async_trait]
impl JobSource for BaeminSource {
    async fn fetch(&self) -> Result<Vec<Posting>> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("jobGroupCodes", JOB_GROUP_CODES),
                ("employmentTypeCodes", EMPLOYMENT_TYPE_CODES),
            ])
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await?;
        let data: Value = expect_success(response).await?.json().await?;
        check_envelope(&data)?;

        let jobs = data
            .pointer("/data/list")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let total = data.pointer("/data/totalSize").and_then(Value::as_u64);
        info!(total, fetched = jobs.len(), "baemin postings fetched");
        Ok(jobs)
    }

    /// Company, 직군, and 고용형태 are fixed because the query params
    /// already filter to those values and the API does not echo them.
    fn to_row(&self, posting: &Posting) -> Row {
        let recruit_number = text(posting, "recruitNumber");
        let url = if recruit_number.is_empty() {
            String::new()
        } else {
            format!("https://career.woowahan.com/recruitment/{recruit_number}/detail")
        };

        Row {
            company: "우아한형제들".to_string(),
            title: text(posting, "recruitName"),
            opened: format_date(str_field(posting, "recruitOpenDate")),
            closed: format_date(str_field(posting, "recruitEndDate")),
            url,
            category: "Business & Sales".to_string(),
            location: String::new(),
            employment_type: "정규직".to_string(),
            posting_id: recruit_number,
            collected_at: collected_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> BaeminSource {
        BaeminSource::new().unwrap()
    }

    #[test]
    fn test_envelope_accepts_numeric_and_string_codes() {
        assert!(check_envelope(&json!({"code": 2000})).is_ok());
        assert!(check_envelope(&json!({"code": "2000"})).is_ok());
    }

    #[test]
    fn test_envelope_failure_attaches_message() {
        let err = check_envelope(&json!({"code": 4001, "message": "bad request"})).unwrap_err();
        assert!(err.to_string().contains("bad request"));
    }

    #[test]
    fn test_format_date_sentinel_years() {
        assert_eq!(format_date(Some("9999-12-31")), ROLLING);
        assert_eq!(format_date(Some("2999-12-31 23:59:59")), ROLLING);
    }

    #[test]
    fn test_format_date_truncates_time_part() {
        assert_eq!(format_date(Some("2025-01-15 10:00:00")), "2025-01-15");
        assert_eq!(format_date(Some("2025-01-15")), "2025-01-15");
    }

    #[test]
    fn test_format_date_edge_inputs() {
        assert_eq!(format_date(None), "");
        assert_eq!(format_date(Some("")), "");
        assert_eq!(format_date(Some("soon")), "soon");
    }

    #[test]
    fn test_to_row_hardcodes_unexposed_fields() {
        let posting = json!({
            "recruitNumber": "R2501001",
            "recruitName": "B2B 영업 담당자",
            "recruitOpenDate": "2025-01-10",
            "recruitEndDate": "9999-12-31"
        });

        let row = source().to_row(&posting);
        assert_eq!(row.company, "우아한형제들");
        assert_eq!(row.category, "Business & Sales");
        assert_eq!(row.employment_type, "정규직");
        assert_eq!(row.closed, ROLLING);
        assert_eq!(
            row.url,
            "https://career.woowahan.com/recruitment/R2501001/detail"
        );
        assert_eq!(row.to_cells().len(), 10);
    }

    #[test]
    fn test_to_row_with_everything_absent() {
        let row = source().to_row(&json!({}));
        assert_eq!(row.to_cells().len(), 10);
        assert_eq!(row.url, "");
        assert_eq!(row.posting_id, "");
    }
}
