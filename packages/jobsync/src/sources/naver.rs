//! Naver recruit source (recruit.navercorp.com).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::dates::normalize_compact;
use crate::error::{Result, SyncError};
use crate::schema::{collected_now, Row};
use crate::sources::{expect_success, http_client, str_field, text};
use crate::traits::source::{JobSource, Posting};

const API_URL: &str = "https://recruit.navercorp.com/rcrt/loadJobList.do";

// Service & Business 하위 직군 코드 (기획, 마케팅, 사업개발 등)
const SUB_JOB_CODES: &str = "3010001,3020001,3030001,3040001,3060001,3070001";
// 0010 = 정규직
const EMP_TYPE_CODE: &str = "0010";

// API default page size, used to advance the offset
const PAGE_SIZE: usize = 10;

pub struct NaverSource {
    client: Client,
}

impl NaverSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }

    pub fn config() -> SourceConfig {
        SourceConfig::new("네이버", "네이버", "NAVER_SPREADSHEET_ID", "annoId")
    }
}

/// The Naver envelope signals success with `result == "Y"`.
fn check_envelope(data: &Value) -> Result<()> {
    if data.get("result").and_then(Value::as_str) != Some("Y") {
        return Err(SyncError::source_api(format!(
            "naver API request failed: {data}"
        )));
    }
    Ok(())
}

#[async_trait]
impl JobSource for NaverSource {
    /// Fetch all postings via offset-based pagination (`firstIndex`).
    ///
    /// Unlike page-based APIs, Naver uses an absolute offset; it is
    /// advanced by [`PAGE_SIZE`] until the accumulated results reach
    /// `totalSize`. An empty page also terminates, to guard against an
    /// inconsistent `totalSize`.
    async fn fetch(&self) -> Result<Vec<Posting>> {
        let mut all = Vec::new();
        let mut first_index = 0usize;

        loop {
            let response = self
                .client
                .get(API_URL)
                .query(&[
                    ("subJobCdArr", SUB_JOB_CODES),
                    ("empTypeCdArr", EMP_TYPE_CODE),
                    ("firstIndex", &first_index.to_string()),
                ])
                .send()
                .await?;
            let data: Value = expect_success(response).await?.json().await?;
            check_envelope(&data)?;

            let jobs = data
                .get("list")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let total_size = data.get("totalSize").and_then(Value::as_u64).unwrap_or(0) as usize;
            let page_count = jobs.len();
            all.extend(jobs);
            debug!(collected = all.len(), total_size, "naver postings collected");

            if all.len() >= total_size || page_count == 0 {
                break;
            }
            first_index += PAGE_SIZE;
        }

        info!(total = all.len(), "naver postings fetched");
        Ok(all)
    }

    /// Dates arrive as compact `YYYYMMDD` strings. The API does not
    /// expose a work location, so 근무지 stays empty.
    fn to_row(&self, posting: &Posting) -> Row {
        let anno_id = text(posting, "annoId");
        let url = if anno_id.is_empty() {
            String::new()
        } else {
            format!("https://recruit.navercorp.com/rcrt/view.do?annoId={anno_id}&lang=ko")
        };

        Row {
            company: text(posting, "sysCompanyCdNm"),
            title: text(posting, "annoSubject"),
            opened: normalize_compact(str_field(posting, "staYmd")),
            closed: normalize_compact(str_field(posting, "endYmd")),
            url,
            category: text(posting, "subJobCdNm"),
            location: String::new(),
            employment_type: text(posting, "empTypeCdNm"),
            posting_id: anno_id,
            collected_at: collected_now(),
        }
    }
}
