//! AI narration
//!
//! The language model is an external collaborator reached through the
//! [`NarrativeProvider`] trait. [`AiService`] wraps an optional provider:
//! without a credential every request resolves to the fixed configuration
//! message instead of making a call, and provider failures are folded into
//! user-visible outcomes rather than returned as errors.

pub mod gemini;
pub mod prompts;

use crate::config::GuideConfig;
use crate::error::API_KEY_ERROR_MESSAGE;
use crate::{GuideError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub use gemini::GeminiClient;

/// Prefix that marks a failure message, distinguishing it from content
pub const ERROR_PREFIX: &str = "Error: ";

/// A web source backing AI-generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

impl Citation {
    /// Title for display, falling back to the uri
    #[must_use]
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.uri
        } else {
            &self.title
        }
    }
}

/// Supplementary text about a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDetails {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Generates narrative text for the guide
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// A story or lesser-known fact about a location, avoiding `known_facts`
    async fn location_details(
        &self,
        location_name: &str,
        known_facts: &[String],
    ) -> Result<LocationDetails>;

    /// One new tour idea, formatted as `Tour Name: ...` / `Description: ...`
    async fn suggest_tour(
        &self,
        existing_themes: &[String],
        existing_tour_names: &[String],
    ) -> Result<String>;
}

/// Result of a detail request as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Text(String),
    TextWithCitations {
        text: String,
        citations: Vec<Citation>,
    },
    /// Message already prefixed with [`ERROR_PREFIX`]
    Failed(String),
}

impl DetailOutcome {
    fn failed(message: impl AsRef<str>) -> Self {
        Self::Failed(format!("{ERROR_PREFIX}{}", message.as_ref()))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl From<LocationDetails> for DetailOutcome {
    fn from(details: LocationDetails) -> Self {
        if details.citations.is_empty() {
            Self::Text(details.text)
        } else {
            Self::TextWithCitations {
                text: details.text,
                citations: details.citations,
            }
        }
    }
}

/// A suggested tour parsed from the model's reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourIdea {
    pub name: Option<String>,
    pub description: String,
}

impl TourIdea {
    /// Parse `Tour Name: ...` / `Description: ...` text.
    ///
    /// Without a recognisable description line the whole reply becomes the
    /// description.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut name = None;
        let mut description: Option<Vec<&str>> = None;

        for line in text.lines() {
            let cleaned = line.trim().trim_matches('*').trim();
            if let Some(rest) = strip_label(cleaned, "Tour Name:") {
                name = Some(rest.to_string()).filter(|n| !n.is_empty());
            } else if let Some(rest) = strip_label(cleaned, "Description:") {
                description = Some(vec![rest]);
            } else if let Some(lines) = description.as_mut() {
                if !cleaned.is_empty() {
                    lines.push(cleaned);
                }
            }
        }

        let description = match description {
            Some(lines) => lines
                .into_iter()
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            None => text.trim().to_string(),
        };

        Self { name, description }
    }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label)
        .map(|rest| rest.trim().trim_start_matches('*').trim())
}

/// Result of a tour suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Idea(TourIdea),
    /// Message already prefixed with [`ERROR_PREFIX`]
    Failed(String),
}

/// Entry point for AI features, gated on a configured credential
#[derive(Clone, Default)]
pub struct AiService {
    provider: Option<Arc<dyn NarrativeProvider>>,
}

impl AiService {
    #[must_use]
    pub fn new(provider: Arc<dyn NarrativeProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A service with every AI feature switched off
    #[must_use]
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Build the production service; disabled when no credential is configured
    pub fn from_config(config: &GuideConfig) -> Result<Self> {
        match config.api_key() {
            Some(api_key) => {
                let client = GeminiClient::new(api_key, &config.ai)?;
                info!("AI narration enabled with model {}", config.ai.model);
                Ok(Self::new(Arc::new(client)))
            }
            None => {
                warn!("{}", API_KEY_ERROR_MESSAGE);
                Ok(Self::disabled())
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Why AI actions are inert, if they are
    #[must_use]
    pub fn unavailable_reason(&self) -> Option<&'static str> {
        (!self.is_enabled()).then_some(API_KEY_ERROR_MESSAGE)
    }

    fn provider(&self) -> Result<&Arc<dyn NarrativeProvider>> {
        self.provider
            .as_ref()
            .ok_or_else(|| GuideError::config(API_KEY_ERROR_MESSAGE))
    }

    /// Fetch supplementary text for a location. Never fails; errors become
    /// [`DetailOutcome::Failed`].
    pub async fn fetch_details(
        &self,
        location_name: &str,
        known_facts: &[String],
    ) -> DetailOutcome {
        let provider = match self.provider() {
            Ok(provider) => provider,
            Err(e) => return DetailOutcome::failed(e.user_message()),
        };
        if location_name.trim().is_empty() {
            return DetailOutcome::failed(
                GuideError::validation("location name cannot be empty").user_message(),
            );
        }

        match provider.location_details(location_name, known_facts).await {
            Ok(details) => details.into(),
            Err(e) => {
                warn!("Error getting more details for {}: {}", location_name, e);
                DetailOutcome::failed(format!(
                    "Could not fetch additional details for {location_name} from AI."
                ))
            }
        }
    }

    /// Ask for a new tour idea. Never fails; errors become
    /// [`SuggestionOutcome::Failed`].
    pub async fn suggest_tour(
        &self,
        existing_themes: &[String],
        existing_tour_names: &[String],
    ) -> SuggestionOutcome {
        let provider = match self.provider() {
            Ok(provider) => provider,
            Err(e) => {
                return SuggestionOutcome::Failed(format!("{ERROR_PREFIX}{}", e.user_message()));
            }
        };

        match provider
            .suggest_tour(existing_themes, existing_tour_names)
            .await
        {
            Ok(text) => SuggestionOutcome::Idea(TourIdea::parse(&text)),
            Err(e) => {
                warn!("Error suggesting tour idea: {}", e);
                SuggestionOutcome::Failed(format!(
                    "{ERROR_PREFIX}Could not generate tour suggestion from AI."
                ))
            }
        }
    }
}
