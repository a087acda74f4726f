//! Generative Language API client
//!
//! Calls `models/{model}:generateContent` and converts the candidate text and
//! search grounding metadata into [`LocationDetails`].

use super::{Citation, LocationDetails, NarrativeProvider, prompts};
use crate::config::AiConfig;
use crate::{GuideError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Client for the hosted language model
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateContentRequest {
    fn prompt(text: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(text) }],
            }],
            tools: Vec::new(),
        }
    }

    fn with_search_grounding(mut self) -> Self {
        self.tools.push(Tool {
            google_search: GoogleSearch {},
        });
        self
    }
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.first_candidate()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn citations(&self) -> Vec<Citation> {
        self.first_candidate()
            .and_then(|candidate| candidate.grounding_metadata.as_ref())
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter(|web| !web.uri.is_empty())
                    .map(|web| Citation {
                        uri: web.uri.clone(),
                        title: web.title.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn into_details(self) -> Result<LocationDetails> {
        let text = self
            .text()
            .ok_or_else(|| GuideError::api("AI response contained no text"))?;
        Ok(LocationDetails {
            text,
            citations: self.citations(),
        })
    }
}

impl GeminiClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, config: &AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TourGuide/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GuideError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let start_time = Instant::now();
        debug!("Sending generateContent request to {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GuideError::api(format!("AI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);

            return match status.as_u16() {
                401 | 403 => {
                    error!("AI service rejected the API key (HTTP {})", status.as_u16());
                    Err(GuideError::api(
                        "The AI service rejected the configured API key",
                    ))
                }
                429 => {
                    warn!("AI service rate limit exceeded");
                    Err(GuideError::api("AI service rate limit exceeded"))
                }
                _ => Err(GuideError::api(format!("AI service error {status}: {detail}"))),
            };
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GuideError::api(format!("Failed to parse AI response: {e}")))?;

        let elapsed = start_time.elapsed();
        info!(
            "AI response with {} candidates in {:.3}s",
            parsed.candidates.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 10 {
            warn!("Slow AI response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(parsed)
    }
}

#[async_trait]
impl NarrativeProvider for GeminiClient {
    #[instrument(skip(self, known_facts))]
    async fn location_details(
        &self,
        location_name: &str,
        known_facts: &[String],
    ) -> Result<LocationDetails> {
        let request =
            GenerateContentRequest::prompt(prompts::location_details(location_name, known_facts))
                .with_search_grounding();
        let details = self.generate(&request).await?.into_details()?;
        debug!(
            "Received {} characters and {} citations",
            details.text.len(),
            details.citations.len()
        );
        Ok(details)
    }

    #[instrument(skip_all)]
    async fn suggest_tour(
        &self,
        existing_themes: &[String],
        existing_tour_names: &[String],
    ) -> Result<String> {
        let prompt = prompts::tour_idea(existing_themes, existing_tour_names);
        let request = GenerateContentRequest::prompt(prompt);
        self.generate(&request)
            .await?
            .text()
            .ok_or_else(|| GuideError::api("AI response contained no text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_with_grounding() {
        let request = GenerateContentRequest::prompt("hello".to_string()).with_search_grounding();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["tools"][0]["googleSearch"], serde_json::json!({}));
    }

    #[test]
    fn test_request_body_without_tools() {
        let request = GenerateContentRequest::prompt("hello".to_string());
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_response_with_citations() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "The ravens "}, {"text": "must stay."}]},
                    "groundingMetadata": {
                        "groundingChunks": [
                            {"web": {"uri": "https://example.com/ravens", "title": "Ravens"}},
                            {"web": {"uri": "https://example.com/tower"}},
                            {"retrievedContext": {}}
                        ]
                    }
                }]
            }"#,
        );

        let details = response.into_details().unwrap();
        assert_eq!(details.text, "The ravens must stay.");
        assert_eq!(details.citations.len(), 2);
        assert_eq!(details.citations[0].title, "Ravens");
        assert_eq!(details.citations[1].label(), "https://example.com/tower");
    }

    #[test]
    fn test_response_without_grounding() {
        let response = parse(r#"{"candidates": [{"content": {"parts": [{"text": "A fact."}]}}]}"#);
        let details = response.into_details().unwrap();
        assert_eq!(details.text, "A fact.");
        assert!(details.citations.is_empty());
    }

    #[test]
    fn test_response_without_candidates() {
        let response = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        let err = response.into_details().unwrap_err();
        assert!(matches!(err, GuideError::Api { .. }));
    }

    #[test]
    fn test_error_envelope() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.message, "API key not valid.");
    }

    #[test]
    fn test_endpoint() {
        let config = AiConfig {
            base_url: "https://example.com/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..AiConfig::default()
        };
        let client = GeminiClient::new("key", &config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.com/v1beta/models/gemini-test:generateContent"
        );
    }
}
