use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::domain::{Study, StudyId, VariantRecord};
use crate::error::PepkbError;

/// Fixed page size of the variant feed.
pub const PAGE_SIZE: u32 = 500;

/// One entry of the study lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct StudyLookupEntry {
    #[serde(deserialize_with = "opaque_string")]
    pub study_id: String,
    pub study_name: String,
}

/// Raw variant row as the feed ships it. `POS` is kept unparsed so one
/// malformed row cannot fail the whole page envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVariant {
    #[serde(rename = "CHROM", default)]
    pub chromosome: String,
    #[serde(rename = "POS", default)]
    pub position: Value,
    #[serde(default)]
    pub variant_id: String,
    #[serde(rename = "REF", default)]
    pub reference_allele: String,
    #[serde(rename = "ALT", default)]
    pub alternate_allele: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Envelope of one page of the variant feed.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantPage {
    pub data: Vec<RawVariant>,
    pub pagination: Pagination,
}

/// Result of normalizing one raw page: canonical records in feed order plus
/// the number of rows rejected for an unparseable position.
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    pub records: Vec<VariantRecord>,
    pub rejected: usize,
}

pub trait StudyApi: Send + Sync {
    fn resolve_study(&self, name: &str) -> Result<Study, PepkbError>;
    fn fetch_page(
        &self,
        study_id: &StudyId,
        page: u32,
        page_size: u32,
    ) -> Result<VariantPage, PepkbError>;
}

#[derive(Clone)]
pub struct PepkbHttpClient {
    client: Client,
    base_url: String,
}

impl PepkbHttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, PepkbError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("pepkb-snp/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| PepkbError::ApiHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| PepkbError::ApiHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn studies_url(&self) -> String {
        format!("{}/studies", self.base_url)
    }

    fn snp_url(&self) -> String {
        format!("{}/snp", self.base_url)
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, PepkbError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "knowledge base request failed".to_string());
        Err(PepkbError::ApiStatus { status, message })
    }

    fn send_with_retries<F>(
        &self,
        mut make_req: F,
    ) -> Result<reqwest::blocking::Response, PepkbError>
    where
        F: FnMut() -> reqwest::blocking::RequestBuilder,
    {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            let response = make_req().send();
            match response {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Err(PepkbError::ApiHttp(err.to_string()));
                }
            }
        }
    }
}

impl StudyApi for PepkbHttpClient {
    fn resolve_study(&self, name: &str) -> Result<Study, PepkbError> {
        let url = self.studies_url();
        tracing::debug!(study = name, "resolving study");
        let response =
            self.send_with_retries(|| self.client.get(&url).query(&[("studyName", name)]))?;
        let response = Self::handle_status(response)?;
        let entries: Vec<StudyLookupEntry> = response
            .json()
            .map_err(|err| PepkbError::ApiHttp(err.to_string()))?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| PepkbError::StudyNotFound(name.to_string()))?;
        Ok(Study {
            id: StudyId::new(entry.study_id),
            name: entry.study_name,
        })
    }

    fn fetch_page(
        &self,
        study_id: &StudyId,
        page: u32,
        page_size: u32,
    ) -> Result<VariantPage, PepkbError> {
        let url = self.snp_url();
        tracing::debug!(study_id = study_id.as_str(), page, "fetching variant page");
        let page_param = page.to_string();
        let size_param = page_size.to_string();
        let response = self.send_with_retries(|| {
            self.client.get(&url).query(&[
                ("studyId", study_id.as_str()),
                ("page", page_param.as_str()),
                ("pageSize", size_param.as_str()),
            ])
        })?;
        let response = Self::handle_status(response)?;
        response
            .json()
            .map_err(|err| PepkbError::ApiHttp(err.to_string()))
    }
}

/// Maps raw feed rows into canonical records, preserving feed order. Rows
/// whose `POS` is not a non-negative integer are dropped and counted; the
/// feed performs no validation of its own, so this is the only gate between
/// upstream data and the dataset.
pub fn normalize_page(raw: &[RawVariant]) -> NormalizedPage {
    let mut records = Vec::with_capacity(raw.len());
    let mut rejected = 0usize;
    for row in raw {
        let Some(position) = parse_position(&row.position) else {
            rejected += 1;
            continue;
        };
        records.push(VariantRecord {
            chromosome: row.chromosome.clone(),
            position,
            variant_id: row.variant_id.clone(),
            reference_allele: row.reference_allele.clone(),
            alternate_alleles: vec![row.alternate_allele.clone()],
            quality: 0.0,
        });
    }
    NormalizedPage { records, rejected }
}

fn parse_position(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn opaque_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
