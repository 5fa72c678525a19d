pub mod http;
pub mod models;

pub use http::HttpBackend;

use async_trait::async_trait;
use thiserror::Error;

use models::{ChatReply, ChatRequest, HealthResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("Decode Error: {0}")]
    Decode(String),
}

/// The remote support service as seen by the chat client.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}
