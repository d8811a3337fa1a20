//! HTTP client for the resume endpoint.

use crate::api::common::ApiResponse;
use crate::client::pager::PageSource;
use crate::services::resume::ResumePage;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Response carried no data")]
    EmptyResponse,
}

/// Fetches resume pages from a running server.
#[derive(Debug, Clone)]
pub struct ResumeClient {
    http: reqwest::Client,
    base_url: String,
    bearer: String,
}

impl ResumeClient {
    pub fn new(
        base_url: impl Into<String>,
        bearer: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer: bearer.into(),
        })
    }
}

#[async_trait]
impl PageSource for ResumeClient {
    type Error = ClientError;

    async fn fetch_page(&self, token: Option<&str>) -> Result<ResumePage, ClientError> {
        let mut request = self
            .http
            .get(format!("{}/api/transactions/resume", self.base_url))
            .bearer_auth(&self.bearer);
        if let Some(token) = token {
            request = request.query(&[("token", token)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: ApiResponse<ResumePage> = response.json().await?;

        if !status.is_success() || !body.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body.message,
            });
        }

        body.data.ok_or(ClientError::EmptyResponse)
    }
}
