//! Google Sheets implementation of the tabular store.
//!
//! Talks to the Sheets API v4 directly with `reqwest`, authenticating
//! via a service-account JWT grant. The token is cached per store and
//! refreshed shortly before expiry. Every failure is fatal for the
//! cycle; there are no retries here.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::SheetsConfig;
use crate::error::{expect_success, Result, SyncError};
use crate::schema::{header_cells, Row, HEADER};
use crate::traits::store::{Tab, TabStore};

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// Drive scope required to open spreadsheets by key; the Sheets scope
// alone is insufficient.
const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tab store backed by a single Google spreadsheet.
pub struct SheetsStore {
    client: Client,
    config: SheetsConfig,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsStore {
    /// Create a store over the configured spreadsheet.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            token: Mutex::new(None),
        })
    }

    /// Exchange a signed service-account assertion for an access token,
    /// reusing the cached token while it has over a minute left.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(60) {
                return Ok(token.access_token.clone());
            }
        }

        let creds = &self.config.credentials;
        let now = Utc::now();
        let claims = Claims {
            iss: &creds.client_email,
            scope: SCOPES,
            aud: &creds.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(3600)).timestamp(),
        };
        let key = EncodingKey::from_rsa_pem(creds.private_key.as_bytes())
            .map_err(|e| SyncError::config(format!("invalid service-account private key: {e}")))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| SyncError::config(format!("failed to sign auth assertion: {e}")))?;

        debug!(client_email = %creds.client_email, "requesting access token");
        let response = self
            .client
            .post(&creds.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", &assertion)])
            .send()
            .await?;
        let response = expect_success(response).await?;
        let token: TokenResponse = response.json().await?;

        let expires_at = now + Duration::seconds(token.expires_in);
        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at,
        });

        Ok(access_token)
    }

    async fn get_json<R: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<R> {
        let token = self.access_token().await?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let response = expect_success(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<()> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn put_json(&self, url: &str, body: &Value) -> Result<()> {
        let token = self.access_token().await?;
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn tab_titles(&self) -> Result<Vec<String>> {
        let url = format!(
            "{}/{}?fields=sheets.properties.title",
            SHEETS_API_URL, self.config.spreadsheet_id
        );
        let meta: SpreadsheetMeta = self.get_json(&url).await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn add_tab(&self, title: &str) -> Result<()> {
        let url = format!(
            "{}/{}:batchUpdate",
            SHEETS_API_URL, self.config.spreadsheet_id
        );
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": 1000, "columnCount": HEADER.len() }
                    }
                }
            }]
        });
        self.post_json(&url, &body).await
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_API_URL, self.config.spreadsheet_id, range
        );
        let value_range: ValueRange = self.get_json(&url).await?;
        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn update_values(&self, range: &str, rows: Vec<Vec<String>>) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            SHEETS_API_URL, self.config.spreadsheet_id, range
        );
        let body = json!({ "majorDimension": "ROWS", "values": rows });
        self.put_json(&url, &body).await
    }

    async fn clear_values(&self, range: &str) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:clear",
            SHEETS_API_URL, self.config.spreadsheet_id, range
        );
        self.post_json(&url, &json!({})).await
    }

    async fn append_values(&self, range: &str, rows: Vec<Vec<String>>) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            SHEETS_API_URL, self.config.spreadsheet_id, range
        );
        let body = json!({ "majorDimension": "ROWS", "values": rows });
        self.post_json(&url, &body).await
    }
}

#[async_trait]
impl TabStore for SheetsStore {
    async fn get_or_create_tab(&self, name: &str) -> Result<Tab> {
        let titles = self.tab_titles().await?;
        if !titles.iter().any(|t| t == name) {
            self.add_tab(name).await?;
            self.update_values(&header_range(name), vec![header_cells()])
                .await?;
            info!(tab = name, "created tab with canonical header");
        }
        Ok(Tab::new(name))
    }

    async fn ensure_header(&self, tab: &Tab) -> Result<()> {
        let first = self
            .get_values(&header_range(tab.name()))
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();
        if first != header_cells() {
            self.update_values(&header_range(tab.name()), vec![header_cells()])
                .await?;
            info!(tab = tab.name(), "header row rewritten");
        }
        Ok(())
    }

    async fn read_all_rows(&self, tab: &Tab) -> Result<Vec<Vec<String>>> {
        self.get_values(&sheet_range(tab.name())).await
    }

    async fn write_rows(&self, tab: &Tab, rows: &[Row]) -> Result<()> {
        self.clear_values(&sheet_range(tab.name())).await?;

        let mut all = vec![header_cells()];
        all.extend(rows.iter().map(Row::to_cells));
        self.update_values(&format!("'{}'!A1", tab.name()), all)
            .await
    }

    async fn append_rows(&self, tab: &Tab, rows: &[Vec<String>]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.append_values(&sheet_range(tab.name()), rows.to_vec())
            .await
    }
}

/// A1-notation range covering the whole tab.
fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1-notation range covering the header row only.
fn header_range(title: &str) -> String {
    format!("{}!A1:J1", sheet_range(title))
}

/// Sheets returns cells as loosely typed JSON; numbers and booleans are
/// folded back into their display strings.
fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
