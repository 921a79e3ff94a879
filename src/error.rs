use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PepkbError {
    #[error("study not found: {0}")]
    StudyNotFound(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),

    #[error("knowledge base request failed: {0}")]
    ApiHttp(String),

    #[error("knowledge base returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },
}
