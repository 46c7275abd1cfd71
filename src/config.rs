//! Application configuration
//!
//! Everything is read from the environment (optionally seeded from a `.env`
//! file) with defaults that let the app start without any setup. The only
//! credential is the gateway API key, and its absence is reported when a
//! request is made rather than at startup.

use crate::gateway::config::{GeminiConfig, LocalModelConfig};
use crate::{Result, StudioError};
use std::path::PathBuf;

/// Which gateway implementation answers requests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    Local,
}

impl std::str::FromStr for BackendKind {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "remote" => Ok(BackendKind::Gemini),
            "local" => Ok(BackendKind::Local),
            other => Err(StudioError::Config(format!("unknown backend '{other}'"))),
        }
    }
}

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Directory holding the project and meeting collections
    pub data_dir: PathBuf,

    /// Selected gateway backend
    pub backend: BackendKind,

    /// Remote gateway settings
    pub gemini: GeminiConfig,

    /// Offline gateway settings
    pub local: LocalModelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendKind::Gemini,
            gemini: GeminiConfig::default(),
            local: LocalModelConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("minutes-studio")
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("STUDIO_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(backend) = lookup("STUDIO_BACKEND") {
            config.backend = backend.parse()?;
        }

        config.gemini.api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(model) = lookup("STUDIO_MODEL") {
            config.gemini = config.gemini.with_model(model);
        }
        if let Some(base) = lookup("STUDIO_API_BASE") {
            config.gemini = config.gemini.with_api_base(base);
        }
        if let Some(language) = lookup("STUDIO_TRANSCRIPTION_LANGUAGE") {
            config.gemini = config.gemini.with_transcription_language(language);
        }

        if let Some(path) = lookup("STUDIO_WHISPER_MODEL") {
            config.local.whisper_model = PathBuf::from(path);
        }
        if let Some(model_id) = lookup("STUDIO_LOCAL_LLM") {
            config.local.llm_model_id = model_id;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the gateway backend
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(StudioError::Config("model name must not be empty".to_string()));
        }

        if self.backend == BackendKind::Local {
            if !cfg!(feature = "local-models") {
                return Err(StudioError::Config(
                    "the local backend requires the `local-models` feature".to_string(),
                ));
            }
            if !self.local.whisper_model.exists() {
                return Err(StudioError::Config(format!(
                    "Whisper model not found: {:?}",
                    self.local.whisper_model
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend, BackendKind::Gemini);
        assert!(config.gemini.api_key.is_none());
        assert!(config.data_dir.ends_with("minutes-studio"));
    }

    #[test]
    fn test_api_key_falls_back_to_generic_variable() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_KEY", "abc")])).unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("abc"));

        let config = AppConfig::from_lookup(lookup_from(&[
            ("API_KEY", "abc"),
            ("GEMINI_API_KEY", "preferred"),
        ]))
        .unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("preferred"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("STUDIO_DATA_DIR", "/tmp/studio"),
            ("STUDIO_MODEL", "gemini-2.5-flash"),
            ("STUDIO_TRANSCRIPTION_LANGUAGE", "English"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/studio"));
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.transcription_language, "English");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("STUDIO_BACKEND", "carrier-pigeon")]))
            .unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }
}
