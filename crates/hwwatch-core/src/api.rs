use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::PollError;

/// Anything that can answer "what changed since `from_date`".
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError>;
}

#[derive(Debug, Clone)]
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        let from_date = if from_date == 0 {
            Utc::now().timestamp()
        } else {
            from_date
        };
        tracing::debug!(from_date, endpoint = %self.endpoint, "requesting homework statuses");

        let resp = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|err| PollError::Connection {
                cause: err.to_string(),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(PollError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|err| PollError::Connection {
            cause: err.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|_| PollError::Decode)
    }
}
