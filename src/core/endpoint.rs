use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{GenerateRequest, GenerateResponse};
use crate::utils::url::{construct_generate_url, redact_key};

/// Ways a generation request can fail.
#[derive(Debug)]
pub enum EndpointError {
    /// The HTTP request could not be sent or the body could not be read.
    Transport(reqwest::Error),

    /// The endpoint answered with a non-success status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Short summary of the error body.
        summary: String,
    },

    /// The body was not the expected JSON document.
    Decode(serde_json::Error),

    /// The JSON had no `candidates[0].content.parts[0].text`.
    MissingText,
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::Transport(source) => write!(f, "request failed: {source}"),
            EndpointError::Status { status, summary } => {
                write!(f, "endpoint returned HTTP {status}: {summary}")
            }
            EndpointError::Decode(source) => write!(f, "malformed response body: {source}"),
            EndpointError::MissingText => write!(f, "response contained no candidate text"),
        }
    }
}

impl StdError for EndpointError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EndpointError::Transport(source) => Some(source),
            EndpointError::Decode(source) => Some(source),
            EndpointError::Status { .. } | EndpointError::MissingText => None,
        }
    }
}

impl From<reqwest::Error> for EndpointError {
    fn from(value: reqwest::Error) -> Self {
        EndpointError::Transport(value)
    }
}

/// A text-generation backend that answers one query at a time.
#[async_trait]
pub trait GenerateEndpoint: Send + Sync {
    /// Sends `query` on its own, without prior turns, and returns the reply text.
    async fn generate(&self, query: &str) -> Result<String, EndpointError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, Box<dyn StdError>> {
        Self::with_client(reqwest::Client::new(), base_url, model, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        model: &str,
        api_key: &str,
    ) -> Result<Self, Box<dyn StdError>> {
        Ok(Self {
            client,
            url: construct_generate_url(base_url, model, api_key)?,
        })
    }
}

#[async_trait]
impl GenerateEndpoint for GeminiClient {
    async fn generate(&self, query: &str) -> Result<String, EndpointError> {
        debug!(url = %redact_key(&self.url), chars = query.chars().count(), "sending query");

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .json(&GenerateRequest::single_turn(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EndpointError::Status {
                status: status.as_u16(),
                summary: summarize_error_body(&body),
            });
        }

        parse_generate_body(&body)
    }
}

/// Pulls the reply text out of a success body.
pub fn parse_generate_body(body: &str) -> Result<String, EndpointError> {
    let parsed: GenerateResponse = serde_json::from_str(body).map_err(EndpointError::Decode)?;
    parsed
        .first_text()
        .map(str::to_owned)
        .ok_or(EndpointError::MissingText)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    const MAX_CHARS: usize = 200;
    let mut collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some((cut, _)) = collapsed.char_indices().nth(MAX_CHARS) {
        collapsed.truncate(cut);
        collapsed.push('…');
    }
    collapsed
}
