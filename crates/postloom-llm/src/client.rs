//! HTTP client for OpenAI-compatible chat-completions APIs.
//!
//! Wraps `reqwest` with typed request construction, optional bearer
//! authentication, and response extraction down to the first choice's
//! message content. Retry policy is deliberately left to callers.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GatewayError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, GenerationParams};

/// Client for an OpenAI-compatible `POST {base}/chat/completions` endpoint.
///
/// The base URL is always explicit, which doubles as the test seam: point it
/// at a wiremock server to exercise the full request path without a provider.
pub struct ChatClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
}

impl ChatClient {
    /// Creates a new client for the given API base (e.g.
    /// `https://api.openai.com/v1`). When `api_key` is `None`, requests are
    /// sent without an `Authorization` header, which suits local inference
    /// gateways.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::InvalidBaseUrl`] if
    /// `api_base` is not a valid URL.
    pub fn new(
        api_base: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("postloom/0.1 (content-pipeline)")
            .build()?;

        // Normalise: ensure the base ends with exactly one slash so that
        // Url::join appends the endpoint path instead of replacing the last
        // path segment.
        let normalised = format!("{}/", api_base.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|_| GatewayError::InvalidBaseUrl(api_base.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.map(str::to_owned),
            endpoint,
        })
    }

    /// Sends one chat completion with a system and a user message and returns
    /// the first choice's message content.
    ///
    /// One call, one answer: no retries, no caching. Callers that want
    /// resilience wrap this in [`crate::retry_with_backoff`].
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure.
    /// - [`GatewayError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GatewayError::Deserialize`] if the body does not match the
    ///   chat-completions shape.
    /// - [`GatewayError::EmptyCompletion`] if `choices` is empty.
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: params.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let mut builder = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus { status });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
                context: format!("chat completions (model={})", params.model),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(api_base: &str) -> ChatClient {
        ChatClient::new(api_base, Some("test-key"), 30)
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_appends_chat_completions_path() {
        let client = test_client("https://api.openai.com/v1");
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = test_client("https://api.openai.com/v1/");
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ChatClient::new("not a url", None, 30);
        assert!(matches!(result, Err(GatewayError::InvalidBaseUrl(_))));
    }

    #[test]
    fn client_without_key_is_allowed() {
        let client = ChatClient::new("http://localhost:4000", None, 30)
            .expect("keyless client should construct");
        assert!(client.api_key.is_none());
    }
}
