//! Insight Adapter
//!
//! Boundary to an external narrative-insight generator.
//!
//! ## Architecture
//!
//! - **InsightGenerator**: trait implemented by every generator
//! - **RemoteInsightClient**: HTTP client for a hosted text-generation model
//! - **RuleBasedInsight**: offline generator built on the analytics engine
//! - **InsightSession**: one-shot-per-session cache with failure normalization
//!
//! ## Failure Policy
//!
//! Generators may fail; the adapter never propagates that failure. A failed
//! or empty generation resolves to `None`, and consumers display
//! [`INSIGHT_PLACEHOLDER`] instead.

mod client;
mod rules;
mod session;

pub use client::{build_prompt, RemoteInsightClient, RemoteInsightConfig};
pub use rules::RuleBasedInsight;
pub use session::{InsightSession, InsightState};

use crate::storage::DailyLogEntry;
use async_trait::async_trait;
use thiserror::Error;

/// Text shown when no insight is available
pub const INSIGHT_PLACEHOLDER: &str = "INSUFFICIENT DATA FOR ANALYSIS. CONTINUE LOGGING.";

/// Produces a narrative summary of the log history
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Generate text from the history, newest entry first.
    ///
    /// `Ok(None)` means the generator had nothing to say.
    async fn generate(&self, history: &[DailyLogEntry]) -> Result<Option<String>, InsightError>;
}

/// Single attempt at an insight; failures are logged and become `None`
pub async fn fetch_insight(
    generator: &dyn InsightGenerator,
    history: &[DailyLogEntry],
) -> Option<String> {
    match generator.generate(history).await {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => {
            tracing::debug!(generator = generator.name(), "Insight generator returned no text");
            None
        }
        Err(e) => {
            tracing::warn!(generator = generator.name(), error = %e, "Insight generation failed");
            None
        }
    }
}

/// Errors that can occur while generating an insight
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Insight service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Insight generator not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Fixed {
        Text(Option<String>),
        Fails,
    }

    #[async_trait]
    impl InsightGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _history: &[DailyLogEntry]) -> Result<Option<String>, InsightError> {
            match self {
                Fixed::Text(text) => Ok(text.clone()),
                Fixed::Fails => Err(InsightError::Timeout),
            }
        }
    }

    #[tokio::test]
    async fn test_failure_becomes_none() {
        assert_eq!(fetch_insight(&Fixed::Fails, &[]).await, None);
    }

    #[tokio::test]
    async fn test_blank_text_becomes_none() {
        let generator = Fixed::Text(Some("   ".to_string()));
        assert_eq!(fetch_insight(&generator, &[]).await, None);

        let generator = Fixed::Text(Some(" Keep going. \n".to_string()));
        assert_eq!(fetch_insight(&generator, &[]).await.as_deref(), Some("Keep going."));
    }

    #[test]
    fn test_error_display() {
        let err = InsightError::ApiError {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: overloaded");
    }
}
