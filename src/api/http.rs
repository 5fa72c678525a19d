use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api::{
    models::{ChatReply, ChatRequest, HealthResponse},
    ApiError, ChatBackend,
};

/// `ChatBackend` over plain HTTP. No timeout and no retry are applied.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        debug!("POST {}/chat for session {}", self.base_url, request.session_id);

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        ChatReply::from_body(body)
    }
}
