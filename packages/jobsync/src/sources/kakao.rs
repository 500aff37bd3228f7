//! Kakao careers source (careers.kakao.com).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::dates::{normalize_iso, ROLLING};
use crate::error::Result;
use crate::schema::{collected_now, Row};
use crate::sources::{expect_success, http_client, str_field, text};
use crate::traits::source::{JobSource, Posting};

const API_URL: &str = "https://careers.kakao.com/public/api/job-list";

// Fixed query: 서비스비즈 직군, 정규직, all Kakao subsidiaries
const PART: &str = "BUSINESS_SERVICES";
const EMPLOYEE_TYPE: &str = "0";
const COMPANY: &str = "ALL";

pub struct KakaoSource {
    client: Client,
}

impl KakaoSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }

    pub fn config() -> SourceConfig {
        SourceConfig::new("카카오", "카카오", "SPREADSHEET_ID", "realId")
    }
}

#[async_trait]
impl JobSource for KakaoSource {
    /// Fetch every page via 1-based pagination. Each response carries
    /// `totalPage`; iteration stops once the current page reaches it.
    async fn fetch(&self) -> Result<Vec<Posting>> {
        let mut all = Vec::new();
        let mut page: u64 = 1;

        loop {
            let response = self
                .client
                .get(API_URL)
                .query(&[
                    ("part", PART),
                    ("employeeType", EMPLOYEE_TYPE),
                    ("company", COMPANY),
                    ("page", &page.to_string()),
                ])
                .send()
                .await?;
            let data: Value = expect_success(response).await?.json().await?;

            let jobs = data
                .get("jobList")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let total_page = data.get("totalPage").and_then(Value::as_u64).unwrap_or(1);
            debug!(page, total_page, count = jobs.len(), "kakao page fetched");
            all.extend(jobs);

            if page >= total_page {
                break;
            }
            page += 1;
        }

        info!(total = all.len(), "kakao postings fetched");
        Ok(all)
    }

    /// 직군 prefers jobPartName, falling back to jobTypeName for the
    /// cross-functional roles where the API returns null.
    fn to_row(&self, posting: &Posting) -> Row {
        let real_id = text(posting, "realId");
        let url = if real_id.is_empty() {
            String::new()
        } else {
            format!("https://careers.kakao.com/jobs/{real_id}")
        };
        let category = match text(posting, "jobPartName") {
            part if !part.is_empty() => part,
            _ => text(posting, "jobTypeName"),
        };

        Row {
            company: text(posting, "companyName"),
            title: text(posting, "jobOfferTitle"),
            opened: normalize_iso(str_field(posting, "regDate"), ROLLING),
            closed: normalize_iso(str_field(posting, "endDate"), ROLLING),
            url,
            category,
            location: text(posting, "locationName"),
            employment_type: text(posting, "employeeTypeName"),
            posting_id: real_id,
            collected_at: collected_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> KakaoSource {
        KakaoSource::new().unwrap()
    }

    #[test]
    fn test_to_row_maps_api_fields() {
        let posting = json!({
            "realId": "P-1023",
            "companyName": "카카오",
            "jobOfferTitle": "서비스 기획자",
            "regDate": "2025-01-15T09:00:00Z",
            "endDate": null,
            "jobPartName": "서비스비즈",
            "locationName": "판교",
            "employeeTypeName": "정규직"
        });

        let row = source().to_row(&posting);
        assert_eq!(row.company, "카카오");
        assert_eq!(row.opened, "2025-01-15");
        assert_eq!(row.closed, ROLLING);
        assert_eq!(row.url, "https://careers.kakao.com/jobs/P-1023");
        assert_eq!(row.category, "서비스비즈");
        assert_eq!(row.posting_id, "P-1023");
        assert_eq!(row.to_cells().len(), 10);
    }

    #[test]
    fn test_to_row_falls_back_to_job_type_name() {
        let posting = json!({
            "realId": "P-1",
            "jobPartName": null,
            "jobTypeName": "크로스 직군"
        });
        assert_eq!(source().to_row(&posting).category, "크로스 직군");
    }

    #[test]
    fn test_to_row_with_everything_absent() {
        let row = source().to_row(&json!({}));
        assert_eq!(row.to_cells().len(), 10);
        assert_eq!(row.url, "");
        assert_eq!(row.posting_id, "");
        assert_eq!(row.opened, ROLLING);
    }
}
