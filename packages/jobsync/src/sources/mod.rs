//! Company-specific source adapters.
//!
//! Each adapter owns its API endpoint, query constants, pagination
//! strategy, and field mapping. They share nothing beyond the small
//! JSON helpers below and the [`crate::traits::source::JobSource`]
//! contract.

pub mod baemin;
pub mod coupang;
pub mod daangn;
pub mod kakao;
pub mod naver;
pub mod toss;

pub use baemin::BaeminSource;
pub use coupang::CoupangSource;
pub use daangn::DaangnSource;
pub use kakao::KakaoSource;
pub use naver::NaverSource;
pub use toss::TossSource;

use reqwest::Client;
use serde_json::Value;

pub(crate) use crate::error::expect_success;
use crate::error::Result;

/// Shared HTTP client with the per-request timeout every source uses.
pub(crate) fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

/// Read a field as display text.
///
/// Strings pass through, numbers fold to their decimal form (some APIs
/// flip between the two for the same field), anything else is empty.
pub(crate) fn text(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Read a field as a borrowed string, treating empty as absent.
pub(crate) fn str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}
