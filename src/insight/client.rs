//! Remote insight client
//!
//! HTTP client for a hosted text-generation model exposing a
//! `generateContent` endpoint. The prompt is built from the full history,
//! newest entry first.

use crate::catalog;
use crate::insight::{InsightError, InsightGenerator};
use crate::storage::DailyLogEntry;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Remote text-generation client
pub struct RemoteInsightClient {
    client: Client,
    config: RemoteInsightConfig,
}

/// Configuration for the remote insight client
#[derive(Debug, Clone)]
pub struct RemoteInsightConfig {
    /// Base URL of the generation API
    pub base_url: String,
    /// Model name inserted into the endpoint path
    pub model: String,
    /// API key; without one no request is made
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RemoteInsightConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            request_timeout_ms: 15_000,
        }
    }
}

impl RemoteInsightClient {
    /// Create a new client with the given configuration
    pub fn new(config: RemoteInsightConfig) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &RemoteInsightConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl InsightGenerator for RemoteInsightClient {
    fn name(&self) -> &str {
        "remote"
    }

    async fn generate(&self, history: &[DailyLogEntry]) -> Result<Option<String>, InsightError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InsightError::NotConfigured("missing API key".to_string()))?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(history),
                }],
            }],
        };

        tracing::debug!(entries = history.len(), model = %self.config.model, "Requesting insight");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InsightError::Timeout
                } else if e.is_connect() {
                    InsightError::Unavailable
                } else {
                    InsightError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(InsightError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::MalformedResponse(e.to_string()))?;

        Ok(result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .filter(|text| !text.trim().is_empty()))
    }
}

/// Build the model prompt from the history, preserving its order
pub fn build_prompt(history: &[DailyLogEntry]) -> String {
    let mut prompt = String::from(
        "You are a supportive health assistant reviewing a personal journal of \
         benzodiazepine use, alcohol intake and mood. Entries are listed newest first. \
         Write a short, encouraging analysis (under 80 words) of the recent trend. \
         Do not give medical advice.\n\nJournal:\n",
    );

    for entry in history {
        let _ = write!(prompt, "- {}", entry.date);

        if entry.alcohol_consumed {
            let _ = write!(prompt, " | alcohol: {} units", entry.alcohol_units);
        } else {
            prompt.push_str(" | alcohol: none");
        }

        if !entry.medications.is_empty() {
            let doses: Vec<String> = entry
                .medications
                .iter()
                .map(|m| {
                    format!(
                        "{} {}{}",
                        catalog::dose_label(&m.substance_id, m.custom_name.as_deref()),
                        m.amount,
                        catalog::unit_for(&m.substance_id)
                    )
                })
                .collect();
            let _ = write!(prompt, " | meds: {}", doses.join(", "));
        }

        if let Some(mood) = entry.mood {
            let _ = write!(prompt, " | mood: {}/10", mood);
        }

        if let Some(notes) = entry.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            let _ = write!(prompt, " | notes: {}", notes.replace('\n', " "));
        }

        prompt.push('\n');
    }

    prompt
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TakenMedicationEntry;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn history() -> Vec<DailyLogEntry> {
        vec![
            DailyLogEntry::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
                .medication(TakenMedicationEntry::new("diazepam", 10.0))
                .medication(TakenMedicationEntry::other("Gabapentin", 300.0))
                .mood(7)
                .notes("slept\nwell"),
            DailyLogEntry::new(NaiveDate::from_ymd_opt(2024, 6, 29).unwrap()).alcohol(true, 3.0),
        ]
    }

    fn client_for(server: &MockServer, api_key: Option<&str>) -> RemoteInsightClient {
        RemoteInsightClient::new(RemoteInsightConfig {
            base_url: server.uri(),
            model: "test-model".to_string(),
            api_key: api_key.map(str::to_string),
            request_timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = RemoteInsightConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_prompt_keeps_history_order() {
        let prompt = build_prompt(&history());

        let newest = prompt.find("2024-06-30").unwrap();
        let older = prompt.find("2024-06-29").unwrap();
        assert!(newest < older);
        assert!(prompt.contains("Diazepam (Valium) 10mg"));
        assert!(prompt.contains("Gabapentin (Other) 300mg"));
        assert!(prompt.contains("mood: 7/10"));
        assert!(prompt.contains("notes: slept well"));
        assert!(prompt.contains("alcohol: 3 units"));
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Steady progress."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let text = client.generate(&history()).await.unwrap();
        assert_eq!(text.as_deref(), Some("Steady progress."));
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let err = client.generate(&history()).await.unwrap_err();
        assert!(matches!(err, InsightError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        assert_eq!(client.generate(&history()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.generate(&history()).await.unwrap_err();
        assert!(matches!(err, InsightError::NotConfigured(_)));
    }
}
