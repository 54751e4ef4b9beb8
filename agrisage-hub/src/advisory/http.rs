use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::{GenerationError, GenerationRequest, Generator};

/// Generator that forwards requests to an HTTP structured generation
/// service.
///
/// The service receives the [`GenerationRequest`] as JSON and must answer
/// with `{"output": <value>}`.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GenerationReply {
    output: Option<serde_json::Value>,
}

impl HttpGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GenerationError::Transport)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<serde_json::Value, GenerationError> {
        let flow = request.flow;
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(GenerationError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(flow, %status, body = %body, "Generation service rejected request");
            return Err(GenerationError::Rejected(status));
        }

        let reply: GenerationReply = response
            .json()
            .await
            .map_err(GenerationError::Transport)?;

        reply.output.ok_or(GenerationError::MissingOutput)
    }
}
