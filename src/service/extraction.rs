//! Text-extraction service: turns free-form text into transaction drafts
//! via the AI completion API.

use chrono::Utc;

use crate::ai::CompletionClient;
use crate::domain::{build_prompt, parse_extraction_response, ExtractedTransaction};
use crate::error::ApiError;

/// Longest input text accepted by the extraction endpoint.
pub const MAX_INPUT_LENGTH: usize = 2000;

/// Drives one extraction round trip: prompt, completion, parse, validate.
#[derive(Debug, Clone)]
pub struct ExtractionService {
    client: CompletionClient,
}

impl ExtractionService {
    /// Creates the service.
    #[must_use]
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Extracts transaction drafts from free-form text.
    ///
    /// The reply is cleaned of markdown fences, comments, and trailing
    /// commas before parsing; individual invalid drafts are dropped
    /// silently and only an unusable reply is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for empty or oversized input and
    /// for an unusable AI reply, and [`ApiError::Upstream`] when the AI
    /// service fails.
    pub async fn extract(&self, text: &str) -> Result<Vec<ExtractedTransaction>, ApiError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ApiError::Validation("text must not be empty".to_string()));
        }
        if trimmed.len() > MAX_INPUT_LENGTH {
            return Err(ApiError::Validation(format!(
                "text must be at most {MAX_INPUT_LENGTH} characters"
            )));
        }

        let today = Utc::now().date_naive();
        let prompt = build_prompt(trimmed, today);
        let reply = self.client.complete(&prompt).await?;
        let drafts = parse_extraction_response(&reply, today)?;
        tracing::info!(count = drafts.len(), "text extraction");
        Ok(drafts)
    }
}
