use serde_json::Value;
use std::future::Future;
use thiserror::Error;

pub mod client;

pub use client::GeminiService;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("transport error: {0}")]
    Http(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_decode() {
            ServiceError::Malformed(e.to_string())
        } else {
            ServiceError::Http(e.to_string())
        }
    }
}

/// The hosted text-generation backend, treated as a black box.
///
/// `analyze_transcript` returns the raw structured object; turning it into a
/// usable result (and defaulting bad fields) is the kernel's job.
pub trait AssistantService: Clone + Send + Sync + 'static {
    fn analyze_transcript(
        &self,
        text: String,
    ) -> impl Future<Output = Result<Value, ServiceError>> + Send;

    fn generate_notification(
        &self,
        zone: String,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}
