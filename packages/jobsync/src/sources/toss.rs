//! Toss career source (api-public.toss.im).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::dates::{normalize_iso, ROLLING};
use crate::error::{Result, SyncError};
use crate::schema::{collected_now, Row};
use crate::sources::{expect_success, http_client, str_field, text};
use crate::traits::source::{JobSource, Posting};

const API_URL: &str = "https://api-public.toss.im/api/v3/ipd-eggnog/career/jobs";

const TARGET_EMPLOYMENT_TYPE: &str = "정규직";
const TARGET_JOB_CATEGORIES: [&str; 2] = ["Sales", "Sales Support"];

pub struct TossSource {
    client: Client,
}

impl TossSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }

    pub fn config() -> SourceConfig {
        SourceConfig::new("토스", "토스", "TOSS_SPREADSHEET_ID", "id")
    }
}

/// The Toss envelope signals success with `resultType == "SUCCESS"`.
fn check_envelope(data: &Value) -> Result<()> {
    if data.get("resultType").and_then(Value::as_str) != Some("SUCCESS") {
        let error = data.get("error").cloned().unwrap_or(Value::Null);
        return Err(SyncError::source_api(format!(
            "toss API request failed: {error}"
        )));
    }
    Ok(())
}

/// Extract a value from the posting's metadata list by partial name
/// match. Toss metadata names are verbose and occasionally grow
/// suffixes (e.g. "Employment_Type_경력/신입"), so substring matching
/// survives those changes for the small known set of field names.
fn metadata_value<'a>(posting: &'a Value, name: &str) -> Option<&'a str> {
    posting
        .get("metadata")?
        .as_array()?
        .iter()
        .find_map(|meta| {
            let meta_name = meta.get("name")?.as_str()?;
            if meta_name.contains(name) {
                meta.get("value")?.as_str()
            } else {
                None
            }
        })
}

#[async_trait]
impl JobSource for TossSource {
    /// The Toss API returns all jobs in a single request; there is no
    /// pagination.
    async fn fetch(&self) -> Result<Vec<Posting>> {
        let response = self.client.get(API_URL).send().await?;
        let data: Value = expect_success(response).await?.json().await?;
        check_envelope(&data)?;

        let jobs = data
            .get("success")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        info!(total = jobs.len(), "toss postings fetched");
        Ok(jobs)
    }

    /// Keep only 정규직 postings in the Sales / Sales Support categories.
    fn filter(&self, postings: Vec<Posting>) -> Vec<Posting> {
        let filtered: Vec<Posting> = postings
            .into_iter()
            .filter(|job| {
                let employment = metadata_value(job, "Employment_Type");
                let category = metadata_value(job, "Job Category");
                employment == Some(TARGET_EMPLOYMENT_TYPE)
                    && category.is_some_and(|c| TARGET_JOB_CATEGORIES.contains(&c))
            })
            .collect();
        debug!(matched = filtered.len(), "toss postings after filter");
        filtered
    }

    /// The subsidiary (소속 자회사) is preferred over the parent company
    /// name since Toss spans several subsidiaries (토스뱅크, 토스증권, …).
    fn to_row(&self, posting: &Posting) -> Row {
        let company = metadata_value(posting, "소속 자회사")
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| text(posting, "company_name"));
        let closed = match metadata_value(posting, "클로징 일자") {
            Some(date) if !date.is_empty() => normalize_iso(Some(date), ROLLING),
            _ => ROLLING.to_string(),
        };

        Row {
            company,
            title: text(posting, "title"),
            opened: normalize_iso(str_field(posting, "first_published"), ""),
            closed,
            url: text(posting, "absolute_url"),
            category: metadata_value(posting, "Job Category")
                .unwrap_or_default()
                .to_string(),
            location: posting
                .get("location")
                .map(|l| text(l, "name"))
                .unwrap_or_default(),
            employment_type: metadata_value(posting, "Employment_Type")
                .unwrap_or_default()
                .to_string(),
            posting_id: text(posting, "id"),
            collected_at: collected_now(),
        }
    }
}
