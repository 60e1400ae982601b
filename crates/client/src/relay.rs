use std::time::Duration;

use async_trait::async_trait;
use portfolio_shared::{CONTACT_PATH, ContactSubmission, ErrorBody};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("relay unreachable: {0}")]
    Unreachable(String),
}

/// Status and raw body of a completed relay exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: u16,
    pub body: String,
}

impl RelayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The non-empty `error` string of a JSON error body, if there is one.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.is_empty())
    }
}

/// Transport used by the contact form to reach the relay.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn post_contact(&self, submission: &ContactSubmission) -> Result<RelayReply, RelayError>;
}

/// JSON-over-HTTP relay client.
#[derive(Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(base_url: &str) -> Result<Self, RelayError> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CONTACT_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn post_contact(&self, submission: &ContactSubmission) -> Result<RelayReply, RelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    RelayError::Unreachable(e.to_string())
                } else {
                    RelayError::Http(e)
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RelayReply { status, body })
    }
}
