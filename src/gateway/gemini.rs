//! Remote gateway over the Gemini `generateContent` REST endpoint

use super::config::GeminiConfig;
use super::media::MediaFile;
use super::prompts::{
    decisions_prompt, minutes_prompt, query_prompt, transcription_prompt, ANSWER_FALLBACK,
    DECISIONS_FALLBACK, MINUTES_FALLBACK,
};
use super::{text_or_fallback, AiGateway, QueryContext};
use crate::{Result, StudioError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

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
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn media(media: &MediaFile) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: media.mime_type.clone(),
                data: BASE64.encode(&media.data),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
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

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gateway backed by a hosted Gemini model
pub struct GeminiGateway {
    config: GeminiConfig,
    client: reqwest::Client,
    runtime: Runtime,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StudioError::Config(format!("Failed to create runtime: {}", e)))?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StudioError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Gemini gateway using model {}", config.model);

        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or(StudioError::MissingCredential)
    }

    async fn generate(&self, parts: Vec<Part>) -> Result<Option<String>> {
        let api_key = self.api_key()?;
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudioError::Gateway(format!("request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StudioError::Gateway(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(StudioError::Gateway(format!("{}: {}", status, message)));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| StudioError::Gateway(format!("unexpected response: {}", e)))?;

        Ok(parsed.text())
    }

    fn generate_blocking(&self, what: &str, parts: Vec<Part>) -> Result<Option<String>> {
        debug!("Sending {} request", what);
        self.runtime
            .block_on(self.generate(parts))
            .inspect_err(|e| error!("{} error: {}", what, e))
    }
}

impl AiGateway for GeminiGateway {
    fn transcribe(&self, media: &MediaFile) -> Result<String> {
        let parts = vec![
            Part::media(media),
            Part::text(transcription_prompt(&self.config.transcription_language)),
        ];

        self.generate_blocking("Transcription", parts)?
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| StudioError::EmptyResult("no transcription generated".to_string()))
    }

    fn summarize(&self, transcription: &str) -> Result<String> {
        let text =
            self.generate_blocking("Minutes", vec![Part::text(minutes_prompt(transcription))])?;
        Ok(text_or_fallback(text, MINUTES_FALLBACK))
    }

    fn extract_decisions(&self, transcription: &str) -> Result<String> {
        let text = self.generate_blocking(
            "Decision extraction",
            vec![Part::text(decisions_prompt(transcription))],
        )?;
        Ok(text_or_fallback(text, DECISIONS_FALLBACK))
    }

    fn answer_query(&self, query: &str, context: &QueryContext) -> Result<String> {
        let text =
            self.generate_blocking("Chat", vec![Part::text(query_prompt(query, context))])?;
        Ok(text_or_fallback(text, ANSWER_FALLBACK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_request_shape() {
        let media = MediaFile::new("a.wav", "audio/wav", vec![0, 1, 2]);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::media(&media), Part::text("transcribe")],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "audio/wav");
        assert_eq!(parts[0]["inlineData"]["data"], "AAEC");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "transcribe");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"Hello "},{"text":"world"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_response_without_text() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(response.text().is_none());

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_missing_api_key_fails_before_any_request() {
        let gateway = GeminiGateway::new(GeminiConfig::default()).unwrap();
        let media = MediaFile::new("a.mp3", "audio/mpeg", vec![1]);

        assert!(matches!(
            gateway.transcribe(&media),
            Err(StudioError::MissingCredential)
        ));
        assert!(matches!(
            gateway.summarize("text"),
            Err(StudioError::MissingCredential)
        ));
    }
}
