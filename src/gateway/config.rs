//! Configuration for the AI gateway backends

use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TRANSCRIPTION_LANGUAGE: &str = "Brazilian Portuguese";

/// Configuration for the remote Gemini gateway
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key; calls fail with a missing-credential error when absent
    pub api_key: Option<String>,

    /// Model identifier used for every request
    pub model: String,

    /// REST endpoint root, without a trailing slash
    pub api_base: String,

    /// Language the transcription is written in
    pub transcription_language: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            transcription_language: DEFAULT_TRANSCRIPTION_LANGUAGE.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_transcription_language(mut self, language: impl Into<String>) -> Self {
        self.transcription_language = language.into();
        self
    }

    /// Full URL of the generateContent endpoint for the configured model
    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Configuration for the offline gateway (Whisper + mistral.rs)
#[derive(Clone, Debug)]
pub struct LocalModelConfig {
    /// Path to the Whisper ggml model file
    pub whisper_model: PathBuf,

    /// Language hint for Whisper (None for auto-detection)
    pub whisper_language: Option<String>,

    /// Number of threads Whisper may use
    pub whisper_threads: i32,

    /// HuggingFace model id or local path for the text model
    pub llm_model_id: String,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            whisper_model: PathBuf::from("models/ggml-base.bin"),
            whisper_language: Some("pt".to_string()),
            whisper_threads: 4,
            llm_model_id: "microsoft/Phi-3.5-mini-instruct".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.transcription_language, "Brazilian Portuguese");
    }

    #[test]
    fn test_generate_url_strips_trailing_slash() {
        let config = GeminiConfig::default()
            .with_api_base("http://localhost:9999/v1beta/")
            .with_model("test-model");

        assert_eq!(
            config.generate_url(),
            "http://localhost:9999/v1beta/models/test-model:generateContent"
        );
    }
}
