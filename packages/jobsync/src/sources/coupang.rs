//! Coupang job source (Greenhouse public board API).

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

const API_URL: &str = "https://api.greenhouse.io/v1/boards/coupang/jobs";

const TARGET_LOCATION: &str = "Seoul";
// Greenhouse has no job-category codes, so the 기획 (planning) filter
// can only approximate by keyword match on the title
const TARGET_KEYWORD: &str = "기획";

pub struct CoupangSource {
    client: Client,
}

impl CoupangSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }

    pub fn config() -> SourceConfig {
        SourceConfig::new("쿠팡", "쿠팡", "COUPANG_SPREADSHEET_ID", "id")
    }
}

#[async_trait]
impl JobSource for CoupangSource {
    /// Single request; the board API has no pagination and no envelope
    /// code to check beyond the HTTP status.
    async fn fetch(&self) -> Result<Vec<Posting>> {
        let response = self.client.get(API_URL).send().await?;
        let data: Value = expect_success(response).await?.json().await?;

        let jobs = data
            .get("jobs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        info!(total = jobs.len(), "coupang postings fetched");
        Ok(jobs)
    }

    /// Keep Seoul-based postings with the target keyword in the title.
    fn filter(&self, postings: Vec<Posting>) -> Vec<Posting> {
        let filtered: Vec<Posting> = postings
            .into_iter()
            .filter(|job| {
                let location = job
                    .get("location")
                    .map(|l| text(l, "name"))
                    .unwrap_or_default();
                let title = text(job, "title");
                location.contains(TARGET_LOCATION) && title.contains(TARGET_KEYWORD)
            })
            .collect();
        debug!(matched = filtered.len(), "coupang postings after filter");
        filtered
    }

    /// Company, 마감일, and 고용형태 are fixed; the public board API
    /// does not expose them.
    fn to_row(&self, posting: &Posting) -> Row {
        let department = posting
            .get("departments")
            .and_then(Value::as_array)
            .and_then(|d| d.first())
            .map(|d| text(d, "name"))
            .unwrap_or_default();

        Row {
            company: "쿠팡".to_string(),
            title: text(posting, "title"),
            opened: normalize_iso(str_field(posting, "first_published"), ""),
            closed: ROLLING.to_string(),
            url: text(posting, "absolute_url"),
            category: department,
            location: posting
                .get("location")
                .map(|l| text(l, "name"))
                .unwrap_or_default(),
            employment_type: "정규직".to_string(),
            posting_id: text(posting, "id"),
            collected_at: collected_now(),
        }
    }
}
