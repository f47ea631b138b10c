//! Thin HTTP wrapper around the upstream completion API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    response: String,
}

/// Client for the completion endpoint. Cheap to clone; the inner
/// `reqwest::Client` shares its connection pool across clones.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CompletionClient {
    /// Builds a client for the given endpoint.
    ///
    /// `timeout` bounds the whole request; extraction calls can be slow, so
    /// this is configured separately from server-side timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_owned),
        })
    }

    /// Sends a prompt and returns the model's raw text reply.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] when the API is unreachable, replies
    /// with a non-success status, or replies with an unexpected body.
    pub async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let mut request = self
            .http
            .post(&self.base_url)
            .json(&CompletionRequest { message: prompt });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("AI service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "AI service returned status {status}"
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("unexpected AI service reply: {e}")))?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(url: &str) -> CompletionClient {
        CompletionClient::new(url, None, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn complete_returns_response_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "[{\"amount\": 50}]"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let reply = client.complete("extract this").await.unwrap();
        assert_eq!(reply, r#"[{"amount": 50}]"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bearer_key_is_sent_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer sekrit")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": "ok"}"#)
            .create_async()
            .await;

        let client =
            CompletionClient::new(&server.url(), Some("sekrit"), Duration::from_secs(5)).unwrap();
        client.complete("hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_error_status_maps_to_upstream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server.url());
        assert!(matches!(
            client.complete("hello").await,
            Err(ApiError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_upstream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server.url());
        assert!(matches!(
            client.complete("hello").await,
            Err(ApiError::Upstream(_))
        ));
    }
}
