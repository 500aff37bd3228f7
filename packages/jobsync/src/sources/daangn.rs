//! Daangn (Karrot) job source (about.daangn.com).
//!
//! Not a REST API: this reads Gatsby's static build output, a
//! pre-rendered GraphQL result, which is why the posting list sits at a
//! deep JSON path.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::dates::ROLLING;
use crate::error::Result;
use crate::schema::{collected_now, Row};
use crate::sources::{expect_success, http_client, text};
use crate::traits::source::{JobSource, Posting};

const API_URL: &str = "https://about.daangn.com/page-data/jobs/business/page-data.json";

const TARGET_EMPLOYMENT_TYPE: &str = "FULL_TIME";

/// Maps corporate English codes to their Korean display names.
fn corporate_display_name(code: &str) -> &str {
    match code {
        "KARROT_MARKET" => "당근마켓",
        "KARROT_PAY" => "당근페이",
        "KARROT" => "당근",
        other => other,
    }
}

pub struct DaangnSource {
    client: Client,
}

impl DaangnSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }

    pub fn config() -> SourceConfig {
        SourceConfig::new("당근", "당근", "DAANGN_SPREADSHEET_ID", "ghId")
    }
}

#[async_trait]
impl JobSource for DaangnSource {
    /// Fetch all Business postings from the pre-built page-data JSON.
    /// The nodes live under `result.data.allDepartmentFilteredJobPost`
    /// per Gatsby's serialized query structure.
    async fn fetch(&self) -> Result<Vec<Posting>> {
        let response = self.client.get(API_URL).send().await?;
        let data: Value = expect_success(response).await?.json().await?;

        let jobs = data
            .pointer("/result/data/allDepartmentFilteredJobPost/nodes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        info!(total = jobs.len(), "daangn business postings fetched");
        Ok(jobs)
    }

    /// Keep only 정규직 (FULL_TIME) postings.
    fn filter(&self, postings: Vec<Posting>) -> Vec<Posting> {
        let filtered: Vec<Posting> = postings
            .into_iter()
            .filter(|job| {
                job.get("employmentType").and_then(Value::as_str) == Some(TARGET_EMPLOYMENT_TYPE)
            })
            .collect();
        debug!(matched = filtered.len(), "daangn postings after filter");
        filtered
    }

    /// 직군 is fixed to Business because this endpoint only serves the
    /// business department feed; 등록일 and 근무지 are not provided.
    fn to_row(&self, posting: &Posting) -> Row {
        let corporate = text(posting, "corporate");
        let employment_type = match posting.get("employmentType").and_then(Value::as_str) {
            Some(TARGET_EMPLOYMENT_TYPE) => "정규직".to_string(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        Row {
            company: corporate_display_name(&corporate).to_string(),
            title: text(posting, "title"),
            opened: String::new(),
            closed: ROLLING.to_string(),
            url: text(posting, "absoluteUrl"),
            category: "Business".to_string(),
            location: String::new(),
            employment_type,
            posting_id: text(posting, "ghId"),
            collected_at: collected_now(),
        }
    }
}
