use serde::{Deserialize, Serialize};

use crate::error::PepkbError;

pub const DEFAULT_BASE_URL: &str = "https://pepperkb.org/api";

pub const BASE_URL_ENV: &str = "PEPKB_API_URL";

/// Where the knowledge-base API lives. Resolution order: explicit flag,
/// `PEPKB_API_URL`, then the public endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn resolve(flag: Option<&str>) -> Result<Self, PepkbError> {
        let raw = match flag {
            Some(value) => value.to_string(),
            None => std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        Self::from_base_url(&raw)
    }

    pub fn from_base_url(raw: &str) -> Result<Self, PepkbError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PepkbError::InvalidBaseUrl("empty url".to_string()));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(PepkbError::InvalidBaseUrl(trimmed.to_string()));
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn base_url_trims_trailing_slash() {
        let config = ApiConfig::from_base_url("https://pepperkb.org/api/").unwrap();
        assert_eq!(config.base_url, "https://pepperkb.org/api");
    }

    #[test]
    fn base_url_requires_http_scheme() {
        let err = ApiConfig::from_base_url("ftp://pepperkb.org").unwrap_err();
        assert_matches!(err, PepkbError::InvalidBaseUrl(_));
        let err = ApiConfig::from_base_url("  ").unwrap_err();
        assert_matches!(err, PepkbError::InvalidBaseUrl(_));
    }

    #[test]
    fn explicit_flag_wins() {
        let config = ApiConfig::resolve(Some("http://localhost:3000/api")).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000/api");
    }
}
