//! reqwest-backed client for the forwarded Ollama port.

use async_trait::async_trait;
use std::time::Duration;

use super::{InferenceApi, TEMPERATURE, TOP_P};
use crate::config::{EndpointConfig, SessionSettings};
use crate::error::ClientError;
use crate::types::{
    ChatRequest, ChatResponse, GenerateRequest, GenerateResponse, Message, TagsResponse,
};

/// Client bound to one local base URL, normally `http://localhost:<local_port>`.
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    probe_timeout: Duration,
    list_timeout: Duration,
    chat_timeout: Duration,
    generate_timeout: Duration,
}

impl InferenceClient {
    pub fn new(base_url: impl Into<String>, settings: &SessionSettings) -> Self {
        Self {
            http: build_http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            probe_timeout: settings.probe_timeout,
            list_timeout: settings.probe_timeout,
            chat_timeout: settings.chat_timeout,
            generate_timeout: settings.generate_timeout,
        }
    }

    /// Client for the local end of `endpoint`'s tunnel.
    pub fn for_endpoint(endpoint: &EndpointConfig, settings: &SessionSettings) -> Self {
        Self::new(endpoint.local_base_url(), settings)
    }

    /// Override the timeout used by [`InferenceApi::list_models`].
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_tags(&self, timeout: Duration) -> Result<TagsResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(timeout)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<TagsResponse>().await?)
    }
}

#[async_trait]
impl InferenceApi for InferenceClient {
    async fn probe_endpoint(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.probe_timeout)
            .send()
            .await;
        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, timeout = e.is_timeout(), "endpoint probe failed");
                false
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, ClientError> {
        let tags = self.fetch_tags(self.list_timeout).await?;
        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }

    async fn chat_completion(
        &self,
        messages: &[Message],
        model: &str,
    ) -> Result<String, ClientError> {
        let request = ChatRequest {
            model,
            messages,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(self.chat_timeout)
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        response
            .json::<ChatResponse>()
            .await?
            .first_content()
            .ok_or_else(|| ClientError::InvalidResponse("completion has no choices".to_string()))
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ClientError> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };
        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.generate_timeout)
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<GenerateResponse>().await?.response)
    }
}

fn build_http_client() -> reqwest::Client {
    // Timeouts are applied per request.
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let code = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { code, body })
}
